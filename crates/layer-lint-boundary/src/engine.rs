//! Boundary rule engine.
//!
//! Resolves every import of a file, classifies both endpoints and
//! evaluates the edge against the rule table, producing at most one
//! violation per import.

use layer_lint_core::utils::paths::{normalize, parent};
use layer_lint_core::{Label, Location, Severity, Suggestion, Violation};

use crate::config::BoundaryConfig;
use crate::extractor::{FileAnalysis, ImportInfo};
use crate::layer::{ClassifiedPath, Layer, LayerConfig};
use crate::resolver::{ResolveConfig, ResolvedImport};
use crate::rules::{Denial, RuleId, RuleTable, Verdict};

/// A refused import edge, before severity and location are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryViolation {
    /// Normalized path of the importing file.
    pub file_path: String,
    /// Specifier as written.
    pub import_specifier: String,
    /// Path the specifier resolved to.
    pub resolved_path: String,
    /// Why the edge was refused.
    pub denial: Denial,
    /// Index entry the import should target instead, if any.
    pub suggested_entry: Option<String>,
}

impl BoundaryViolation {
    /// Stable rule id.
    #[must_use]
    pub fn rule_id(&self) -> RuleId {
        self.denial.rule_id
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.denial.message
    }

    /// Converts into a reportable [`Violation`].
    #[must_use]
    pub fn into_violation(self, severity: Severity, location: Location) -> Violation {
        let label = Label::new(location.clone(), format!("resolves to {}", self.resolved_path));
        let mut violation = Violation::new(
            self.denial.rule_id.code(),
            self.denial.name,
            severity,
            location,
            self.denial.message,
        )
        .with_specifier(self.import_specifier)
        .with_label(label);

        if let Some(entry) = self.suggested_entry {
            violation =
                violation.with_suggestion(Suggestion::new(format!("import from {entry} instead")));
        }
        violation
    }
}

/// Evaluates boundary rules against file imports.
///
/// Holds only immutable data, so one engine can be shared across threads
/// for a whole lint pass.
pub struct BoundaryEngine {
    config: BoundaryConfig,
    layers: LayerConfig,
    resolve: ResolveConfig,
    table: RuleTable,
}

impl BoundaryEngine {
    /// Create a new engine from config.
    #[must_use]
    pub fn new(config: BoundaryConfig) -> Self {
        let layers = config.layer_config();
        let resolve = config.resolve_config();
        let table = config.rule_table();
        Self {
            config,
            layers,
            resolve,
            table,
        }
    }

    /// Classifies a project-relative path.
    #[must_use]
    pub fn classify(&self, path: &str) -> ClassifiedPath {
        self.layers.classify(path)
    }

    /// Resolves a specifier found in `file_location`.
    #[must_use]
    pub fn resolve(&self, specifier: &str, file_location: &str) -> ResolvedImport {
        ResolvedImport::new(specifier, file_location, &self.resolve)
    }

    /// Evaluates one import of an already classified file.
    ///
    /// Returns `None` for external specifiers, self-imports, and allowed
    /// edges.
    #[must_use]
    pub fn evaluate_import(&self, from: &ClassifiedPath, specifier: &str) -> Option<BoundaryViolation> {
        let resolved = self.resolve(specifier, &from.normalized_path);
        let Some(target) = resolved.resolved_path else {
            tracing::trace!(specifier, "external import skipped");
            return None;
        };
        if target == from.normalized_path {
            return None;
        }

        let to = self.classify(&target);

        let denial = match self.table.evaluate(from, &to) {
            Verdict::Allowed => return self.unclassified_source(from, &to, specifier, &target),
            Verdict::Denied(denial) | Verdict::RequiresIndex(denial) => denial,
        };

        tracing::debug!(
            file = %from.normalized_path,
            specifier,
            from_layer = %from.layer,
            to_layer = %to.layer,
            rule = %denial.name,
            "boundary violation"
        );

        let suggested_entry = match denial.rule_id {
            RuleId::SharedImportsFeature => None,
            _ => index_entry_for(&to),
        };

        Some(BoundaryViolation {
            file_path: from.normalized_path.clone(),
            import_specifier: specifier.to_owned(),
            resolved_path: target,
            denial,
            suggested_entry,
        })
    }

    fn unclassified_source(
        &self,
        from: &ClassifiedPath,
        to: &ClassifiedPath,
        specifier: &str,
        target: &str,
    ) -> Option<BoundaryViolation> {
        let gap = self.config.report_unclassified
            && from.layer == Layer::Unclassified
            && to.layer.is_managed()
            && self.layers.is_under_source_root(&from.normalized_path);

        gap.then(|| BoundaryViolation {
            file_path: from.normalized_path.clone(),
            import_specifier: specifier.to_owned(),
            resolved_path: target.to_owned(),
            denial: Denial::builtin(RuleId::UnclassifiedSource),
            suggested_entry: None,
        })
    }

    /// Evaluates all specifiers of one file.
    #[must_use]
    pub fn check_specifiers<'a>(
        &self,
        file_path: &str,
        specifiers: impl IntoIterator<Item = &'a str>,
    ) -> Vec<BoundaryViolation> {
        let from = self.classify(file_path);
        tracing::trace!(file = %from.normalized_path, layer = %from.layer, "classified importer");
        specifiers
            .into_iter()
            .filter_map(|s| self.evaluate_import(&from, s))
            .collect()
    }

    /// Check a single file analysis for boundary violations.
    #[must_use]
    pub fn check(&self, analysis: &FileAnalysis) -> Vec<Violation> {
        let file_path = analysis.file_path.to_string_lossy();
        let from = self.classify(&file_path);

        analysis
            .imports
            .iter()
            .filter_map(|imp| {
                let violation = self.evaluate_import(&from, &imp.specifier)?;
                let severity = self.config.severity_for(&violation.denial)?;
                Some(violation.into_violation(severity, location(analysis, imp)))
            })
            .collect()
    }
}

fn location(analysis: &FileAnalysis, imp: &ImportInfo) -> Location {
    Location::new(analysis.file_path.clone(), imp.line, imp.column + 1)
        .with_span(imp.offset, imp.length)
}

/// Index entry that would make an import of `to` legal.
fn index_entry_for(to: &ClassifiedPath) -> Option<String> {
    let root = to.layer_root.as_deref()?;
    let dir = match (&to.layer, &to.feature_name) {
        (Layer::Feature, Some(feature)) => format!("{root}/{feature}"),
        (Layer::Feature, None) => root.to_owned(),
        _ => {
            let dir = parent(&to.normalized_path);
            if dir.len() >= root.len() {
                dir.to_owned()
            } else {
                root.to_owned()
            }
        }
    };
    Some(normalize(&format!("{dir}/index")))
}
