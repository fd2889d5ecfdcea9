//! List rules command implementation.

use anyhow::Result;
use layer_lint_boundary::RuleId;

use crate::config_resolver::ConfigSource;

/// Runs the list-rules command.
///
/// Prints the rule ids, then the boundary table the resolved config
/// evaluates, custom rows first.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = source.load()?;

    println!("Available rules:\n");
    println!("{:<10} {:<28} {:<9} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(100));

    for rule in RuleId::ALL {
        println!(
            "{:<10} {:<28} {:<9} {}",
            rule.code(),
            rule.name(),
            rule.default_severity().to_string(),
            rule.description()
        );
    }

    println!("\nBoundary table (first match wins):\n");
    for (i, row) in config.rule_table().rows().iter().enumerate() {
        println!("  {:>2}. {row}", i + 1);
    }
    println!("  Anything else is allowed.");

    println!("\nOverride a rule in layer-lint.toml, e.g.:");
    println!("  [rules.shared-requires-index]");
    println!("  severity = \"warning\"");
    println!("\n  [rules.LB001]");
    println!("  enabled = false");

    Ok(())
}
