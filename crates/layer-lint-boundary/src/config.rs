//! TOML configuration for layer boundary enforcement.
//!
//! Sections: `[analyzer]` (source root, alias, matching options),
//! `[[layers]]`, `[rules.<id>]` and `[[boundaries]]`.
//!
//! Values of the wrong type or with an unknown name are logged and
//! replaced by their default; a `[[layers]]` or `[[boundaries]]` row that
//! cannot be understood is dropped.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use layer_lint_core::utils::paths::{has_segment_prefix, normalize, segments};
use layer_lint_core::Severity;

use crate::layer::{default_entries, Layer, LayerConfig, LayerEntry};
use crate::resolver::ResolveConfig;
use crate::rules::{
    BoundaryRule, Denial, FeatureRelation, LayerPattern, Outcome, RuleId, RuleTable,
};

const DEFAULT_SOURCE_ROOT: &str = "src";
const DEFAULT_ALIAS: &str = "@";

/// Top-level boundary lint configuration.
///
/// Loaded once per run and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct BoundaryConfig {
    /// Project directory to walk.
    pub root: PathBuf,
    /// Patterns to exclude from the walk.
    pub exclude: Vec<String>,
    /// Source root every layer lives under.
    pub source_root: String,
    /// Alias token standing in for the source root in specifiers.
    pub alias: String,
    /// Require whole-segment matches when searching specifiers for the root.
    pub strict_root_match: bool,
    /// Treat imports of a feature directory or layer root as index imports.
    pub directory_index: bool,
    /// Report importers under the source root that no layer claims.
    pub report_unclassified: bool,
    /// Layer roots in priority order.
    pub layers: Vec<LayerDef>,
    /// Per-rule overrides keyed by rule name, code, or custom row id.
    pub rules: BTreeMap<String, RuleSetting>,
    /// Extra rows evaluated before the default table.
    pub boundaries: Vec<BoundaryDef>,
}

/// A configured layer root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayerDef {
    /// Layer kind (`app`, `feature`, `shared-ui`, `shared-util`, `component`).
    pub kind: Layer,
    /// Root directory relative to the source root.
    pub root: String,
    /// Whether outside imports must target the index entry.
    #[serde(default, deserialize_with = "lenient")]
    pub requires_index: Option<bool>,
}

impl LayerDef {
    /// Creates a definition using the layer's default index requirement.
    #[must_use]
    pub fn new(kind: Layer, root: impl Into<String>) -> Self {
        Self {
            kind,
            root: root.into(),
            requires_index: None,
        }
    }

    /// Effective index requirement.
    #[must_use]
    pub fn requires_index(&self) -> bool {
        self.requires_index
            .unwrap_or_else(|| self.kind.default_requires_index())
    }
}

/// Override for a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRuleSetting")]
pub struct RuleSetting {
    /// Severity replacing the rule default.
    pub severity: Option<Severity>,
    /// Set to `false` to silence the rule.
    pub enabled: bool,
}

#[derive(Deserialize)]
struct RawRuleSetting {
    #[serde(default, deserialize_with = "lenient")]
    severity: Option<Severity>,
    #[serde(default, deserialize_with = "lenient")]
    enabled: Option<bool>,
}

impl From<RawRuleSetting> for RuleSetting {
    fn from(raw: RawRuleSetting) -> Self {
        Self {
            severity: raw.severity,
            enabled: raw.enabled.unwrap_or(true),
        }
    }
}

/// Decision of a configured boundary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryVerdict {
    /// Permit the edge.
    Allow,
    /// Refuse the edge.
    Deny,
    /// Permit the edge only through an index entry.
    RequiresIndex,
}

/// A `[[boundaries]]` row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BoundaryDef {
    /// Row id, reported as the rule name.
    pub id: String,
    /// Importing side.
    pub from: LayerPattern,
    /// Imported side.
    pub to: LayerPattern,
    /// Restrict to same (`true`) or different (`false`) features.
    #[serde(default, deserialize_with = "lenient")]
    pub same_feature: Option<bool>,
    /// Decision.
    pub verdict: BoundaryVerdict,
    /// Message for denials.
    #[serde(default)]
    pub message: String,
    /// Severity for denials.
    #[serde(default = "default_severity", deserialize_with = "lenient_severity")]
    pub severity: Severity,
}

impl BoundaryDef {
    /// Converts the row into a rule table entry.
    #[must_use]
    pub fn to_rule(&self) -> BoundaryRule {
        let relation = match self.same_feature {
            None => FeatureRelation::Any,
            Some(true) => FeatureRelation::Same,
            Some(false) => FeatureRelation::Different,
        };
        let outcome = match self.verdict {
            BoundaryVerdict::Allow => Outcome::Allow,
            BoundaryVerdict::Deny => Outcome::Deny(Denial::custom(&self.id, &self.message)),
            BoundaryVerdict::RequiresIndex => {
                Outcome::RequireIndex(Denial::custom(&self.id, &self.message))
            }
        };
        BoundaryRule {
            from: self.from,
            to: self.to,
            relation,
            outcome,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_severity() -> Severity {
    Severity::Error
}

/// Deserializes `T`, treating a value it does not recognize as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = toml::Value::deserialize(deserializer)?;
    Ok(recognized(value, "value"))
}

fn lenient_severity<'de, D>(deserializer: D) -> Result<Severity, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient(deserializer)?.unwrap_or_else(default_severity))
}

fn recognized<T: DeserializeOwned>(value: toml::Value, what: &str) -> Option<T> {
    match value.clone().try_into() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("Ignoring unrecognized {what} `{value}`: {}", e.message());
            None
        }
    }
}

fn rows<T: DeserializeOwned>(values: Option<Vec<toml::Value>>, what: &str) -> Vec<T> {
    values
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| recognized(v, what))
        .collect()
}

/// Default layer definitions, mirroring [`default_entries`].
#[must_use]
pub fn default_layers() -> Vec<LayerDef> {
    default_entries()
        .into_iter()
        .map(|e| LayerDef {
            kind: e.layer,
            root: e.root,
            requires_index: Some(e.requires_index),
        })
        .collect()
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: Vec::new(),
            source_root: DEFAULT_SOURCE_ROOT.to_owned(),
            alias: DEFAULT_ALIAS.to_owned(),
            strict_root_match: false,
            directory_index: false,
            report_unclassified: false,
            layers: default_layers(),
            rules: BTreeMap::new(),
            boundaries: Vec::new(),
        }
    }
}

/// Errors when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },
    /// Failed to parse TOML.
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },
    /// Config is structurally invalid.
    #[error("config validation: {0}")]
    Validation(String),
}

impl BoundaryConfig {
    /// Load from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse from a TOML string. Missing or unrecognized values take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the text is not TOML.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct RawConfig {
            #[serde(default, deserialize_with = "lenient")]
            analyzer: Option<AnalyzerSection>,
            #[serde(default, deserialize_with = "lenient")]
            layers: Option<Vec<toml::Value>>,
            #[serde(default, deserialize_with = "lenient")]
            rules: Option<BTreeMap<String, toml::Value>>,
            #[serde(default, deserialize_with = "lenient")]
            boundaries: Option<Vec<toml::Value>>,
        }

        #[derive(Deserialize, Default)]
        struct AnalyzerSection {
            #[serde(default, deserialize_with = "lenient")]
            root: Option<PathBuf>,
            #[serde(default, deserialize_with = "lenient")]
            exclude: Option<Vec<String>>,
            #[serde(default, deserialize_with = "lenient")]
            source_root: Option<String>,
            #[serde(default, deserialize_with = "lenient")]
            alias: Option<String>,
            #[serde(default, deserialize_with = "lenient")]
            strict_root_match: Option<bool>,
            #[serde(default, deserialize_with = "lenient")]
            directory_index: Option<bool>,
            #[serde(default, deserialize_with = "lenient")]
            report_unclassified: Option<bool>,
        }

        let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        let or_default = |value: Option<String>, default: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_owned())
        };

        let analyzer = raw.analyzer.unwrap_or_default();

        let mut layers: Vec<LayerDef> = rows(raw.layers, "[[layers]] row");
        if layers.is_empty() {
            layers = default_layers();
        }

        let rules: BTreeMap<String, RuleSetting> = raw
            .rules
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, v)| recognized(v, &format!("[rules.{name}]")).map(|s| (name, s)))
            .collect();

        Ok(Self {
            root: analyzer
                .root
                .filter(|r| !r.as_os_str().is_empty())
                .unwrap_or_else(default_root),
            exclude: analyzer.exclude.unwrap_or_default(),
            source_root: or_default(analyzer.source_root, DEFAULT_SOURCE_ROOT),
            alias: or_default(analyzer.alias, DEFAULT_ALIAS),
            strict_root_match: analyzer.strict_root_match.unwrap_or(false),
            directory_index: analyzer.directory_index.unwrap_or(false),
            report_unclassified: analyzer.report_unclassified.unwrap_or(false),
            layers,
            rules,
            boundaries: rows(raw.boundaries, "[[boundaries]] row"),
        })
    }

    /// Validate config consistency.
    ///
    /// Layer roots are matched in the order given, so a root listed after a
    /// broader root that contains it can never match.
    ///
    /// # Errors
    ///
    /// Returns error describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: Vec<(String, String)> = Vec::new();
        for (i, layer) in self.layers.iter().enumerate() {
            let root = normalize(&layer.root);
            if root.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "layers[{i}] ({}): empty root",
                    layer.kind
                )));
            }
            let segs: Vec<&str> = segments(&root).collect();
            for (earlier, earlier_kind) in &seen {
                if *earlier == root {
                    return Err(ConfigError::Validation(format!(
                        "layers[{i}]: duplicate root '{root}'"
                    )));
                }
                let earlier_segs: Vec<&str> = segments(earlier).collect();
                if has_segment_prefix(&segs, &earlier_segs) {
                    return Err(ConfigError::Validation(format!(
                        "layers[{i}]: root '{root}' is shadowed by earlier root '{earlier}' \
                         ({earlier_kind}); list more specific roots first"
                    )));
                }
            }
            seen.push((root, layer.kind.to_string()));
        }

        let mut ids: HashSet<&str> = HashSet::new();
        for (i, b) in self.boundaries.iter().enumerate() {
            if b.id.trim().is_empty() {
                return Err(ConfigError::Validation(format!("boundaries[{i}]: missing id")));
            }
            if RuleId::from_name(&b.id).is_some() {
                return Err(ConfigError::Validation(format!(
                    "boundaries[{i}]: id '{}' collides with a built-in rule",
                    b.id
                )));
            }
            if !ids.insert(b.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "boundaries[{i}]: duplicate id '{}'",
                    b.id
                )));
            }
        }

        for name in self.rules.keys() {
            if RuleId::from_name(name).is_none() && !ids.contains(name.as_str()) {
                return Err(ConfigError::Validation(format!("rules.{name}: unknown rule")));
            }
        }

        Ok(())
    }

    /// Layer classification settings.
    #[must_use]
    pub fn layer_config(&self) -> LayerConfig {
        let entries = self
            .layers
            .iter()
            .map(|l| LayerEntry::new(l.kind, &l.root, l.requires_index()))
            .collect();
        LayerConfig::new(&self.source_root, entries).with_directory_index(self.directory_index)
    }

    /// Specifier resolution settings.
    #[must_use]
    pub fn resolve_config(&self) -> ResolveConfig {
        ResolveConfig::new(&self.source_root, &self.alias)
            .with_strict_root_match(self.strict_root_match)
    }

    /// Rule table: configured rows first, then the defaults.
    #[must_use]
    pub fn rule_table(&self) -> RuleTable {
        RuleTable::with_custom(self.boundaries.iter().map(BoundaryDef::to_rule).collect())
    }

    /// Severity for a denial, or `None` if its rule is disabled.
    #[must_use]
    pub fn severity_for(&self, denial: &Denial) -> Option<Severity> {
        let fallback = if denial.rule_id == RuleId::CustomBoundary {
            self.boundaries
                .iter()
                .find(|b| b.id == denial.name)
                .map_or(Severity::Error, |b| b.severity)
        } else {
            denial.rule_id.default_severity()
        };

        let setting = self
            .rules
            .get(&denial.name)
            .or_else(|| self.rules.get(denial.rule_id.code()));

        match setting {
            Some(s) if !s.enabled => None,
            Some(s) => Some(s.severity.unwrap_or(fallback)),
            None => Some(fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = BoundaryConfig::parse("").expect("parse failed");
        assert_eq!(config.source_root, "src");
        assert_eq!(config.alias, "@");
        assert_eq!(config.layers, default_layers());
        assert!(!config.strict_root_match);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let toml = r#"
[analyzer]
source_root = "  "
alias = ""
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert_eq!(config.source_root, "src");
        assert_eq!(config.alias, "@");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let toml = r#"
[analyzer]
source_root = "app-src"
colour = "blue"
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert_eq!(config.source_root, "app-src");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[analyzer]
root = "./web"
exclude = ["**/node_modules/**"]
source_root = "src"
alias = "~"
strict_root_match = true
directory_index = true
report_unclassified = true

[[layers]]
kind = "feature"
root = "modules"

[[layers]]
kind = "shared-ui"
root = "shared/ui"
requires_index = false

[[layers]]
kind = "app"
root = "app"

[rules.shared-requires-index]
severity = "warning"

[rules.LB004]
enabled = false

[[boundaries]]
id = "feature-imports-app"
from = "feature"
to = "app"
verdict = "deny"
message = "features may not import the app shell"
severity = "warning"
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert_eq!(config.root, PathBuf::from("./web"));
        assert_eq!(config.alias, "~");
        assert!(config.strict_root_match && config.directory_index && config.report_unclassified);
        assert_eq!(config.layers.len(), 3);
        assert_eq!(config.layers[0].kind, Layer::Feature);
        assert!(config.layers[0].requires_index());
        assert!(!config.layers[1].requires_index());
        assert!(!config.layers[2].requires_index());
        assert_eq!(config.boundaries[0].to, LayerPattern::App);
        assert!(config.validate().is_ok());

        assert_eq!(
            config.severity_for(&Denial::builtin(RuleId::SharedRequiresIndex)),
            Some(Severity::Warning)
        );
        assert_eq!(config.severity_for(&Denial::builtin(RuleId::AppFeatureDeepImport)), None);
        assert_eq!(
            config.severity_for(&Denial::builtin(RuleId::CrossFeatureDeepImport)),
            Some(Severity::Error)
        );
        assert_eq!(
            config.severity_for(&Denial::custom("feature-imports-app", "")),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn unknown_layer_kind_drops_the_row() {
        let toml = r#"
[[layers]]
kind = "widgets"
root = "widgets"

[[layers]]
kind = "feature"
root = "modules"
requires_index = "sometimes"
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert_eq!(config.layers, vec![LayerDef::new(Layer::Feature, "modules")]);
        assert!(config.layers[0].requires_index());
    }

    #[test]
    fn only_unknown_layers_falls_back_to_defaults() {
        let toml = "[[layers]]\nkind = \"widgets\"\nroot = \"widgets\"\n";
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert_eq!(config.layers, default_layers());
    }

    #[test]
    fn unrecognized_values_fall_back_to_defaults() {
        let toml = r#"
[analyzer]
alias = 5
source_root = ["src"]
strict_root_match = "yes"
exclude = "dist"

[rules.shared-requires-index]
severity = "fatal"
enabled = "no"

[[boundaries]]
id = "feature-imports-app"
from = "feature"
to = "app"
verdict = "deny"
severity = "loud"

[[boundaries]]
id = "widgets-row"
from = "widgets"
to = "app"
verdict = "deny"
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert_eq!(config.alias, "@");
        assert_eq!(config.source_root, "src");
        assert!(!config.strict_root_match);
        assert!(config.exclude.is_empty());
        assert_eq!(
            config.rules.get("shared-requires-index"),
            Some(&RuleSetting {
                severity: None,
                enabled: true
            })
        );
        assert_eq!(config.boundaries.len(), 1);
        assert_eq!(config.boundaries[0].severity, Severity::Error);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.severity_for(&Denial::builtin(RuleId::SharedRequiresIndex)),
            Some(Severity::Error)
        );
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            BoundaryConfig::parse("[analyzer\nalias = "),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn validate_catches_shadowed_root() {
        let toml = r#"
[[layers]]
kind = "shared-util"
root = "shared"

[[layers]]
kind = "shared-ui"
root = "shared/ui"
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("shadowed"));
    }

    #[test]
    fn validate_allows_sibling_prefix_names() {
        let toml = r#"
[[layers]]
kind = "feature"
root = "features"

[[layers]]
kind = "feature"
root = "features-legacy"
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_catches_duplicate_and_empty_roots() {
        let mut config = BoundaryConfig::default();
        config.layers.push(LayerDef::new(Layer::App, "./app/"));
        assert!(config.validate().unwrap_err().to_string().contains("duplicate"));

        let mut config = BoundaryConfig::default();
        config.layers.insert(0, LayerDef::new(Layer::App, " / "));
        assert!(config.validate().unwrap_err().to_string().contains("empty root"));
    }

    #[test]
    fn validate_catches_unknown_rule() {
        let toml = r#"
[rules.no-such-rule]
severity = "info"
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert!(config.validate().unwrap_err().to_string().contains("no-such-rule"));
    }

    #[test]
    fn validate_catches_bad_boundary_ids() {
        let toml = r#"
[[boundaries]]
id = "shared-imports-feature"
from = "shared"
to = "feature"
verdict = "allow"
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert!(config.validate().unwrap_err().to_string().contains("collides"));

        let toml = r#"
[[boundaries]]
id = "x"
from = "any"
to = "app"
verdict = "deny"

[[boundaries]]
id = "x"
from = "any"
to = "component"
verdict = "deny"
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert!(config.validate().unwrap_err().to_string().contains("duplicate id"));
    }

    #[test]
    fn rules_may_reference_custom_rows() {
        let toml = r#"
[[boundaries]]
id = "no-components-in-shared"
from = "shared"
to = "component"
verdict = "deny"

[rules.no-components-in-shared]
enabled = false
"#;
        let config = BoundaryConfig::parse(toml).expect("parse failed");
        assert!(config.validate().is_ok());
        assert_eq!(
            config.severity_for(&Denial::custom("no-components-in-shared", "")),
            None
        );
    }

    #[test]
    fn boundary_def_converts_relation() {
        let def = BoundaryDef {
            id: "x".into(),
            from: LayerPattern::Feature,
            to: LayerPattern::Feature,
            same_feature: Some(false),
            verdict: BoundaryVerdict::RequiresIndex,
            message: String::new(),
            severity: Severity::Error,
        };
        let rule = def.to_rule();
        assert_eq!(rule.relation, FeatureRelation::Different);
        assert!(matches!(rule.outcome, Outcome::RequireIndex(_)));
    }
}
