//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "layer-lint.toml";

const DEFAULT_CONFIG: &str = r#"# layer-lint configuration

[analyzer]
# Project directory to walk, relative to this file
# root = "."

# Glob patterns to exclude from analysis
exclude = [
    "node_modules/**",
    "dist/**",
    "**/*.d.ts",
]

# Directory every layer lives under
source_root = "src"

# Specifier prefix standing in for the source root (`@/features/cart`)
alias = "@"

# Match the source root in specifiers by whole path segments only
# strict_root_match = false

# Treat `@/features/cart` (a directory import) as its index entry
# directory_index = false

# Report files under the source root that no layer claims (LB005)
# report_unclassified = false

# Layer roots, matched in order. Omit to use the defaults below.
#
# [[layers]]
# kind = "feature"
# root = "features"
#
# [[layers]]
# kind = "shared-ui"
# root = "shared/ui"
#
# [[layers]]
# kind = "shared-util"
# root = "shared/utils"
#
# [[layers]]
# kind = "app"
# root = "app"
#
# [[layers]]
# kind = "component"
# root = "components"
# requires_index = false

# Rule overrides, keyed by name or code

[rules.shared-requires-index]
enabled = true
# severity = "warning"

# [rules.unclassified-source]
# severity = "warning"

# Extra boundaries, evaluated before the built-in rules
#
# [[boundaries]]
# id = "components-no-features"
# from = "component"
# to = "feature"
# verdict = "deny"
# message = "components must stay feature-agnostic"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("."), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to match your source layout");
    println!("  2. Run: layer-lint check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_lint_boundary::BoundaryConfig;
    use tempfile::TempDir;

    #[test]
    fn template_is_a_valid_config() {
        let config = BoundaryConfig::parse(DEFAULT_CONFIG).unwrap();
        config.validate().unwrap();
        assert_eq!(config.source_root, "src");
        assert_eq!(config.exclude.len(), 3);
        assert_eq!(config.layers, layer_lint_boundary::config::default_layers());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE), "# mine\n").unwrap();

        let err = write_config(tmp.path(), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap(),
            "# mine\n"
        );

        write_config(tmp.path(), true).unwrap();
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap(),
            DEFAULT_CONFIG
        );
    }
}
