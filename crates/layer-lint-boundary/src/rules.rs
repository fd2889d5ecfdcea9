//! Boundary rule table.
//!
//! The dependency-direction policy is one ordered list of
//! [`BoundaryRule`] rows. [`RuleTable::evaluate`] returns the outcome of
//! the first row matching an edge; edges no row matches are allowed.

use serde::Deserialize;

use layer_lint_core::Severity;

use crate::layer::{ClassifiedPath, Layer};

/// Stable identifiers of the built-in boundary rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    /// Feature importing another feature's internals.
    CrossFeatureDeepImport,
    /// Feature importing a shared module around its index.
    SharedRequiresIndex,
    /// Shared code importing feature code.
    SharedImportsFeature,
    /// App shell importing feature internals.
    AppFeatureDeepImport,
    /// Importer inside the source root that no layer claims.
    UnclassifiedSource,
    /// A `[[boundaries]]` row from configuration.
    CustomBoundary,
}

impl RuleId {
    /// All rule ids, in code order.
    pub const ALL: [Self; 6] = [
        Self::CrossFeatureDeepImport,
        Self::SharedRequiresIndex,
        Self::SharedImportsFeature,
        Self::AppFeatureDeepImport,
        Self::UnclassifiedSource,
        Self::CustomBoundary,
    ];

    /// Short rule code (e.g. `LB001`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::CrossFeatureDeepImport => "LB001",
            Self::SharedRequiresIndex => "LB002",
            Self::SharedImportsFeature => "LB003",
            Self::AppFeatureDeepImport => "LB004",
            Self::UnclassifiedSource => "LB005",
            Self::CustomBoundary => "LB100",
        }
    }

    /// Kebab-case rule name used in config and output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CrossFeatureDeepImport => "cross-feature-deep-import",
            Self::SharedRequiresIndex => "shared-requires-index",
            Self::SharedImportsFeature => "shared-imports-feature",
            Self::AppFeatureDeepImport => "app-feature-deep-import",
            Self::UnclassifiedSource => "unclassified-source",
            Self::CustomBoundary => "custom-boundary",
        }
    }

    /// Fixed user-facing message.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::CrossFeatureDeepImport => "cross-feature deep import forbidden",
            Self::SharedRequiresIndex => "must import shared module via its index",
            Self::SharedImportsFeature => "shared code may not depend on feature code",
            Self::AppFeatureDeepImport => "app layer must import features via their index",
            Self::UnclassifiedSource => "file inside the source root is not covered by any layer",
            Self::CustomBoundary => "import crosses a configured boundary",
        }
    }

    /// One-line description for `list-rules`.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::CrossFeatureDeepImport => "Features import other features only through their index",
            Self::SharedRequiresIndex => "Features import shared modules only through their index",
            Self::SharedImportsFeature => "Shared layers never depend on features",
            Self::AppFeatureDeepImport => "The app layer imports features only through their index",
            Self::UnclassifiedSource => "Reports unlayered files under the source root (opt-in)",
            Self::CustomBoundary => "Rows declared in [[boundaries]]",
        }
    }

    /// Severity when the configuration does not override it.
    #[must_use]
    pub fn default_severity(self) -> Severity {
        match self {
            Self::UnclassifiedSource => Severity::Info,
            _ => Severity::Error,
        }
    }

    /// Looks up a rule by its name or code.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.name() == name || id.code() == name)
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which layers a row side applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerPattern {
    /// Every layer, including unclassified.
    Any,
    /// Every layer except unclassified.
    Managed,
    /// Only unclassified paths.
    Unclassified,
    /// Either shared layer.
    Shared,
    /// [`Layer::App`].
    App,
    /// [`Layer::Feature`].
    Feature,
    /// [`Layer::SharedUi`].
    SharedUi,
    /// [`Layer::SharedUtil`].
    SharedUtil,
    /// [`Layer::Component`].
    Component,
}

impl LayerPattern {
    /// Returns `true` if `layer` is covered by this pattern.
    #[must_use]
    pub fn matches(self, layer: Layer) -> bool {
        match self {
            Self::Any => true,
            Self::Managed => layer.is_managed(),
            Self::Unclassified => layer == Layer::Unclassified,
            Self::Shared => layer.is_shared(),
            Self::App => layer == Layer::App,
            Self::Feature => layer == Layer::Feature,
            Self::SharedUi => layer == Layer::SharedUi,
            Self::SharedUtil => layer == Layer::SharedUtil,
            Self::Component => layer == Layer::Component,
        }
    }
}

impl std::fmt::Display for LayerPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::Managed => "managed",
            Self::Unclassified => "unclassified",
            Self::Shared => "shared",
            Self::App => "app",
            Self::Feature => "feature",
            Self::SharedUi => "shared-ui",
            Self::SharedUtil => "shared-util",
            Self::Component => "component",
        })
    }
}

/// Feature relationship between the two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureRelation {
    /// No condition.
    Any,
    /// Both endpoints carry the same feature.
    Same,
    /// The endpoints carry different features.
    Different,
}

impl FeatureRelation {
    fn matches(self, from: &ClassifiedPath, to: &ClassifiedPath) -> bool {
        match self {
            Self::Any => true,
            Self::Same => from.same_feature(to),
            Self::Different => !from.same_feature(to),
        }
    }
}

/// Why an edge was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    /// Stable rule id.
    pub rule_id: RuleId,
    /// Rule name; the row id for custom rows.
    pub name: String,
    /// User-facing message.
    pub message: String,
}

impl Denial {
    /// Denial for a built-in rule with its fixed message.
    #[must_use]
    pub fn builtin(rule_id: RuleId) -> Self {
        Self {
            rule_id,
            name: rule_id.name().to_owned(),
            message: rule_id.message().to_owned(),
        }
    }

    /// Denial for a configured row.
    #[must_use]
    pub fn custom(id: &str, message: &str) -> Self {
        let message = if message.trim().is_empty() {
            RuleId::CustomBoundary.message()
        } else {
            message
        };
        Self {
            rule_id: RuleId::CustomBoundary,
            name: id.to_owned(),
            message: message.to_owned(),
        }
    }
}

/// What a matching row decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The edge is permitted.
    Allow,
    /// The edge is refused unconditionally.
    Deny(Denial),
    /// The edge is permitted only when it targets an index entry, or the
    /// target layer does not require one.
    RequireIndex(Denial),
}

/// Final decision for one import edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Permitted.
    Allowed,
    /// Forbidden regardless of the target file.
    Denied(Denial),
    /// Forbidden because the import bypasses the target's index entry.
    RequiresIndex(Denial),
}

impl Verdict {
    /// `true` for [`Verdict::Allowed`].
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// The denial, if the edge was refused.
    #[must_use]
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Self::Allowed => None,
            Self::Denied(d) | Self::RequiresIndex(d) => Some(d),
        }
    }
}

/// A directed edge predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryRule {
    /// Importing side.
    pub from: LayerPattern,
    /// Imported side.
    pub to: LayerPattern,
    /// Feature condition between both sides.
    pub relation: FeatureRelation,
    /// Decision when the row matches.
    pub outcome: Outcome,
}

impl BoundaryRule {
    fn new(from: LayerPattern, to: LayerPattern, relation: FeatureRelation, outcome: Outcome) -> Self {
        Self {
            from,
            to,
            relation,
            outcome,
        }
    }

    /// Returns `true` if the row applies to the edge.
    #[must_use]
    pub fn matches(&self, from: &ClassifiedPath, to: &ClassifiedPath) -> bool {
        self.from.matches(from.layer)
            && self.to.matches(to.layer)
            && self.relation.matches(from, to)
    }
}

impl std::fmt::Display for BoundaryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)?;
        match self.relation {
            FeatureRelation::Any => {}
            FeatureRelation::Same => f.write_str(" (same feature)")?,
            FeatureRelation::Different => f.write_str(" (other feature)")?,
        }
        match &self.outcome {
            Outcome::Allow => f.write_str(": allow"),
            Outcome::Deny(d) => write!(f, ": deny [{}]", d.name),
            Outcome::RequireIndex(d) => write!(f, ": requires index [{}]", d.name),
        }
    }
}

/// Ordered rule rows. First match wins.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rows: Vec<BoundaryRule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            rows: Self::default_rows(),
        }
    }
}

impl RuleTable {
    /// Table with `custom` rows placed before the defaults.
    #[must_use]
    pub fn with_custom(custom: Vec<BoundaryRule>) -> Self {
        let mut rows = custom;
        rows.extend(Self::default_rows());
        Self { rows }
    }

    /// The built-in dependency-direction policy.
    #[must_use]
    pub fn default_rows() -> Vec<BoundaryRule> {
        use FeatureRelation as R;
        use LayerPattern as P;

        vec![
            // Unmanaged endpoints are never constrained.
            BoundaryRule::new(P::Any, P::Unclassified, R::Any, Outcome::Allow),
            BoundaryRule::new(P::Unclassified, P::Any, R::Any, Outcome::Allow),
            // Features.
            BoundaryRule::new(P::Feature, P::Feature, R::Same, Outcome::Allow),
            BoundaryRule::new(
                P::Feature,
                P::Feature,
                R::Different,
                Outcome::RequireIndex(Denial::builtin(RuleId::CrossFeatureDeepImport)),
            ),
            BoundaryRule::new(
                P::Feature,
                P::Shared,
                R::Any,
                Outcome::RequireIndex(Denial::builtin(RuleId::SharedRequiresIndex)),
            ),
            // Shared.
            BoundaryRule::new(
                P::Shared,
                P::Feature,
                R::Any,
                Outcome::Deny(Denial::builtin(RuleId::SharedImportsFeature)),
            ),
            // App.
            BoundaryRule::new(
                P::App,
                P::Feature,
                R::Any,
                Outcome::RequireIndex(Denial::builtin(RuleId::AppFeatureDeepImport)),
            ),
        ]
    }

    /// Rows in evaluation order.
    #[must_use]
    pub fn rows(&self) -> &[BoundaryRule] {
        &self.rows
    }

    /// Decides an edge. Pure and total.
    #[must_use]
    pub fn evaluate(&self, from: &ClassifiedPath, to: &ClassifiedPath) -> Verdict {
        let Some(row) = self.rows.iter().find(|row| row.matches(from, to)) else {
            return Verdict::Allowed;
        };

        match &row.outcome {
            Outcome::Allow => Verdict::Allowed,
            Outcome::Deny(denial) => Verdict::Denied(denial.clone()),
            Outcome::RequireIndex(denial) => {
                if to.is_index_entry || !to.requires_index {
                    Verdict::Allowed
                } else {
                    Verdict::RequiresIndex(denial.clone())
                }
            }
        }
    }
}

/// Evaluates an edge against the default table.
#[must_use]
pub fn evaluate(from: &ClassifiedPath, to: &ClassifiedPath) -> Verdict {
    RuleTable::default().evaluate(from, to)
}
