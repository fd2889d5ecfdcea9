//! Property tests for path normalization.

use layer_lint_core::utils::normalize;
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalize_is_idempotent(s in ".{0,80}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_on_path_like_input(s in r"[ ./\\a-z@]{0,40}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalized_output_shape(s in r"[ ./\\a-zA-Z0-9_-]{0,60}") {
        let out = normalize(&s);
        prop_assert!(!out.starts_with('/'));
        prop_assert!(!out.contains('\\'));
        prop_assert!(!out.contains("//"));
        prop_assert!(!out.starts_with("./"));
        prop_assert!(out.split('/').all(|seg| seg != "." && seg != ".."));
    }
}
