//! Layer classification: maps project-relative paths to architecture layers.

use serde::{Deserialize, Serialize};

use layer_lint_core::utils::paths::{file_stem, has_extension, has_segment_prefix, normalize, segments};

/// Architectural role of a directory subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    /// Application shell (routing, bootstrap).
    App,
    /// A named, self-contained feature.
    Feature,
    /// Shared UI building blocks.
    SharedUi,
    /// Shared non-visual helpers.
    SharedUtil,
    /// Generic presentational components.
    Component,
    /// Outside every configured layer root.
    #[serde(skip)]
    Unclassified,
}

impl Layer {
    /// Stable kebab-case name, as used in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Feature => "feature",
            Self::SharedUi => "shared-ui",
            Self::SharedUtil => "shared-util",
            Self::Component => "component",
            Self::Unclassified => "unclassified",
        }
    }

    /// `true` for the two shared layers.
    #[must_use]
    pub fn is_shared(self) -> bool {
        matches!(self, Self::SharedUi | Self::SharedUtil)
    }

    /// `true` for every layer except [`Layer::Unclassified`].
    #[must_use]
    pub fn is_managed(self) -> bool {
        self != Self::Unclassified
    }

    /// Whether imports from outside the layer must target an index entry
    /// when the configuration does not say otherwise.
    #[must_use]
    pub fn default_requires_index(self) -> bool {
        matches!(self, Self::Feature | Self::SharedUi | Self::SharedUtil)
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured layer root, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerEntry {
    /// Layer this root belongs to.
    pub layer: Layer,
    /// Normalized root relative to the source root (e.g. `shared/ui`).
    pub root: String,
    /// Whether outside imports must go through an index entry.
    pub requires_index: bool,
}

impl LayerEntry {
    /// Creates an entry, normalizing the root.
    #[must_use]
    pub fn new(layer: Layer, root: &str, requires_index: bool) -> Self {
        Self {
            layer,
            root: normalize(root),
            requires_index,
        }
    }
}

/// Classification of a single path. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPath {
    /// Path as given by the caller.
    pub raw_path: String,
    /// Canonical form of `raw_path`.
    pub normalized_path: String,
    /// Layer the path belongs to.
    pub layer: Layer,
    /// Feature directory name, only for [`Layer::Feature`].
    pub feature_name: Option<String>,
    /// `true` if the path designates an index entry.
    pub is_index_entry: bool,
    /// Full normalized root of the matched layer (e.g. `src/shared/ui`).
    pub layer_root: Option<String>,
    /// Copied from the matched entry.
    pub requires_index: bool,
}

impl ClassifiedPath {
    /// Returns `true` if both paths belong to the same feature or,
    /// outside the feature layer, carry no feature at all.
    #[must_use]
    pub fn same_feature(&self, other: &Self) -> bool {
        self.feature_name == other.feature_name
    }
}

/// Ordered layer roots plus the source root they live under.
///
/// Roots are checked in the order given; configuration authors must list
/// more specific roots (`shared/ui`) before broader ones (`shared`).
#[derive(Debug, Clone)]
pub struct LayerConfig {
    source_root: String,
    entries: Vec<LayerEntry>,
    directory_index: bool,
}

impl LayerConfig {
    /// Builds a layer config.
    #[must_use]
    pub fn new(source_root: &str, entries: Vec<LayerEntry>) -> Self {
        Self {
            source_root: normalize(source_root),
            entries,
            directory_index: false,
        }
    }

    /// Treat imports that stop at a feature directory or a layer root as
    /// index entries (`@/features/cart` resolves to `features/cart/index`).
    #[must_use]
    pub fn with_directory_index(mut self, enabled: bool) -> Self {
        self.directory_index = enabled;
        self
    }

    /// `true` if the path lies under the source root.
    #[must_use]
    pub fn is_under_source_root(&self, path: &str) -> bool {
        let normalized = normalize(path);
        let segs: Vec<&str> = segments(&normalized).collect();
        let src: Vec<&str> = segments(&self.source_root).collect();
        has_segment_prefix(&segs, &src)
    }

    /// Classifies a path. Total: every input yields exactly one result.
    #[must_use]
    pub fn classify(&self, path: &str) -> ClassifiedPath {
        let normalized = normalize(path);
        let segs: Vec<&str> = segments(&normalized).collect();
        let index_by_name = segs.last().is_some_and(|s| file_stem(s) == "index");

        let mut classified = ClassifiedPath {
            raw_path: path.to_owned(),
            normalized_path: normalized.clone(),
            layer: Layer::Unclassified,
            feature_name: None,
            is_index_entry: index_by_name,
            layer_root: None,
            requires_index: false,
        };

        let src: Vec<&str> = segments(&self.source_root).collect();
        if !has_segment_prefix(&segs, &src) {
            return classified;
        }
        let rest = &segs[src.len()..];

        for entry in &self.entries {
            let root: Vec<&str> = segments(&entry.root).collect();
            if root.is_empty() || !has_segment_prefix(rest, &root) {
                continue;
            }
            let tail = &rest[root.len()..];

            let (feature_name, is_index_entry) = if entry.layer == Layer::Feature {
                match tail {
                    // The features root itself.
                    [] => (None, true),
                    // A file sitting directly under the features root, or
                    // its extensionless index.
                    [file] if has_extension(file) || index_by_name => (None, index_by_name),
                    [name, ..] => (
                        Some((*name).to_owned()),
                        index_by_name || (self.directory_index && tail.len() == 1),
                    ),
                }
            } else {
                (None, index_by_name || (self.directory_index && tail.is_empty()))
            };

            classified.layer = entry.layer;
            classified.feature_name = feature_name;
            classified.is_index_entry = is_index_entry;
            classified.layer_root = Some(
                src.iter()
                    .chain(root.iter())
                    .copied()
                    .collect::<Vec<_>>()
                    .join("/"),
            );
            classified.requires_index = entry.requires_index;
            break;
        }

        classified
    }
}

/// Classifies `normalized_path` against `config`.
#[must_use]
pub fn classify(normalized_path: &str, config: &LayerConfig) -> ClassifiedPath {
    config.classify(normalized_path)
}

/// Default layer roots, most specific first.
#[must_use]
pub fn default_entries() -> Vec<LayerEntry> {
    vec![
        LayerEntry::new(Layer::Feature, "features", true),
        LayerEntry::new(Layer::SharedUi, "shared/ui", true),
        LayerEntry::new(Layer::SharedUtil, "shared/utils", true),
        LayerEntry::new(Layer::SharedUtil, "shared", true),
        LayerEntry::new(Layer::App, "app", false),
        LayerEntry::new(Layer::Component, "components", false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LayerConfig {
        LayerConfig::new("src", default_entries())
    }

    #[test]
    fn classifies_feature_file() {
        let c = config().classify("src/features/cart/view.ts");
        assert_eq!(c.layer, Layer::Feature);
        assert_eq!(c.feature_name.as_deref(), Some("cart"));
        assert!(!c.is_index_entry);
        assert_eq!(c.layer_root.as_deref(), Some("src/features"));
        assert!(c.requires_index);
    }

    #[test]
    fn classifies_feature_index() {
        let c = config().classify("src/features/checkout/index.ts");
        assert_eq!(c.feature_name.as_deref(), Some("checkout"));
        assert!(c.is_index_entry);
    }

    #[test]
    fn extensionless_index_is_index() {
        let c = config().classify("src/features/checkout/index");
        assert!(c.is_index_entry);
    }

    #[test]
    fn feature_root_itself_is_index() {
        let c = config().classify("src/features");
        assert_eq!(c.layer, Layer::Feature);
        assert_eq!(c.feature_name, None);
        assert!(c.is_index_entry);
    }

    #[test]
    fn file_directly_under_features_has_no_feature() {
        let c = config().classify("src/features/index.ts");
        assert_eq!(c.layer, Layer::Feature);
        assert_eq!(c.feature_name, None);
        assert!(c.is_index_entry);
    }

    #[test]
    fn extensionless_features_index_has_no_feature() {
        let by_file = config().classify("src/features/index.ts");
        let by_specifier = config().classify("src/features/index");
        assert_eq!(by_specifier.layer, Layer::Feature);
        assert_eq!(by_specifier.feature_name, None);
        assert!(by_specifier.is_index_entry);
        assert_eq!(by_specifier.feature_name, by_file.feature_name);
    }

    #[test]
    fn specific_shared_root_wins() {
        let c = config().classify("src/shared/ui/Button.vue");
        assert_eq!(c.layer, Layer::SharedUi);
        assert_eq!(c.feature_name, None);
        let c = config().classify("src/shared/utils/format.ts");
        assert_eq!(c.layer, Layer::SharedUtil);
        assert_eq!(c.layer_root.as_deref(), Some("src/shared/utils"));
        let c = config().classify("src/shared/lib/x.ts");
        assert_eq!(c.layer, Layer::SharedUtil);
        assert_eq!(c.layer_root.as_deref(), Some("src/shared"));
    }

    #[test]
    fn priority_order_is_respected() {
        // Broad root listed first shadows the specific one.
        let cfg = LayerConfig::new(
            "src",
            vec![
                LayerEntry::new(Layer::SharedUtil, "shared", true),
                LayerEntry::new(Layer::SharedUi, "shared/ui", true),
            ],
        );
        assert_eq!(cfg.classify("src/shared/ui/Button.vue").layer, Layer::SharedUtil);
    }

    #[test]
    fn app_and_components() {
        assert_eq!(config().classify("src/app/main.ts").layer, Layer::App);
        let c = config().classify("src/components/Card.vue");
        assert_eq!(c.layer, Layer::Component);
        assert!(!c.requires_index);
    }

    #[test]
    fn no_partial_segment_match() {
        assert_eq!(config().classify("src/featuresX/cart/a.ts").layer, Layer::Unclassified);
        assert_eq!(config().classify("src/application/a.ts").layer, Layer::Unclassified);
    }

    #[test]
    fn outside_source_root_is_unclassified() {
        assert_eq!(config().classify("features/cart/a.ts").layer, Layer::Unclassified);
        assert_eq!(config().classify("test/features/cart/a.ts").layer, Layer::Unclassified);
    }

    #[test]
    fn garbage_and_empty_are_unclassified() {
        for p in ["", "   ", "///", "..", r"\\?\weird"] {
            assert_eq!(config().classify(p).layer, Layer::Unclassified, "{p:?}");
        }
    }

    #[test]
    fn classify_normalizes_os_paths() {
        let c = config().classify(r".\src\features\cart\..\checkout\index.ts");
        assert_eq!(c.normalized_path, "src/features/checkout/index.ts");
        assert_eq!(c.feature_name.as_deref(), Some("checkout"));
        assert!(c.is_index_entry);
    }

    #[test]
    fn empty_source_root_matches_top_level() {
        let cfg = LayerConfig::new("", default_entries());
        assert_eq!(cfg.classify("features/cart/a.ts").layer, Layer::Feature);
        assert_eq!(cfg.classify("features/cart/a.ts").layer_root.as_deref(), Some("features"));
    }

    #[test]
    fn directory_index_mode() {
        let cfg = config().with_directory_index(true);
        assert!(cfg.classify("src/features/checkout").is_index_entry);
        assert!(cfg.classify("src/shared/ui").is_index_entry);
        assert!(!cfg.classify("src/features/checkout/helpers").is_index_entry);
        assert!(!config().classify("src/features/checkout").is_index_entry);
    }

    #[test]
    fn source_root_membership() {
        assert!(config().is_under_source_root("src/legacy/a.ts"));
        assert!(!config().is_under_source_root("scripts/build.ts"));
    }
}
