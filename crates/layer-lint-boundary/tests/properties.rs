//! Property tests for the classifier, resolver and rule table.

use layer_lint_boundary::layer::default_entries;
use layer_lint_boundary::{evaluate, resolve, Layer, LayerConfig, ResolveConfig, Verdict};
use proptest::prelude::*;

fn layers() -> LayerConfig {
    LayerConfig::new("src", default_entries())
}

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("src".to_string()),
        Just("features".to_string()),
        Just("shared".to_string()),
        Just("ui".to_string()),
        Just("utils".to_string()),
        Just("app".to_string()),
        Just("components".to_string()),
        Just("index.ts".to_string()),
        Just("..".to_string()),
        Just(".".to_string()),
        "[a-z]{1,8}(\\.ts)?",
    ]
}

fn path() -> impl Strategy<Value = String> {
    (prop::collection::vec(segment(), 0..7), prop::bool::ANY)
        .prop_map(|(segs, windows)| segs.join(if windows { "\\" } else { "/" }))
}

proptest! {
    #[test]
    fn classification_is_deterministic(p in path()) {
        let cfg = layers();
        prop_assert_eq!(cfg.classify(&p), cfg.classify(&p));
    }

    #[test]
    fn classification_is_total(p in ".{0,60}") {
        let c = layers().classify(&p);
        if c.layer != Layer::Feature {
            prop_assert!(c.feature_name.is_none());
        }
        if c.layer == Layer::Unclassified {
            prop_assert!(c.layer_root.is_none());
        }
    }

    #[test]
    fn separator_style_does_not_change_classification(segs in prop::collection::vec(segment(), 0..7)) {
        let cfg = layers();
        let unix = cfg.classify(&segs.join("/"));
        let windows = cfg.classify(&segs.join("\\"));
        prop_assert_eq!(unix.layer, windows.layer);
        prop_assert_eq!(unix.feature_name, windows.feature_name);
        prop_assert_eq!(unix.is_index_entry, windows.is_index_entry);
    }

    #[test]
    fn intra_feature_always_allowed(
        feature in "[a-z]{1,8}",
        a in "[a-z]{1,8}(/[a-z]{1,8}){0,3}\\.ts",
        b in "[a-z]{1,8}(/[a-z]{1,8}){0,3}\\.ts",
    ) {
        let cfg = layers();
        let from = cfg.classify(&format!("src/features/{feature}/{a}"));
        let to = cfg.classify(&format!("src/features/{feature}/{b}"));
        prop_assert_eq!(evaluate(&from, &to), Verdict::Allowed);
    }

    #[test]
    fn unclassified_endpoints_never_violate(p in path(), q in "[a-z]{1,8}(/[a-z]{1,8}){0,3}") {
        let cfg = layers();
        let managed = cfg.classify(&p);
        let outside = cfg.classify(&format!("vendor/{q}"));
        prop_assert_eq!(evaluate(&managed, &outside), Verdict::Allowed);
        prop_assert_eq!(evaluate(&outside, &managed), Verdict::Allowed);
    }

    #[test]
    fn resolve_never_panics(specifier in ".{0,60}", file in ".{0,60}") {
        let cfg = ResolveConfig::new("src", "@");
        let _ = resolve(&specifier, &file, &cfg);
    }

    #[test]
    fn alias_substitution(rest in "[a-z]{1,8}(/[a-z]{1,8}){0,4}") {
        let cfg = ResolveConfig::new("src", "@");
        prop_assert_eq!(resolve(&format!("@/{rest}"), "", &cfg), Some(format!("src/{rest}")));
    }
}
