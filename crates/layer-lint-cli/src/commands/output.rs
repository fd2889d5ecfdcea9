//! Shared output formatting for lint results.

use anyhow::Result;
use layer_lint_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use miette::{NamedSource, Report};
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is where violation paths are relative to; rich output reads
/// source snippets from there.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Rich => print_rich(result, root),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!(
            "  {}: {}",
            severity_indicator(violation.severity),
            violation.message
        );
        if let Some(specifier) = &violation.specifier {
            println!("  = import: {specifier}");
        }
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }

    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
}

fn print_rich(result: &LintResult, root: &Path) {
    for violation in &result.violations {
        match rich_report(violation, root) {
            Some(report) => println!("{report:?}"),
            None => println!("{}\n", violation.format()),
        }
    }

    print_summary(result);
}

/// Renders a violation against its source file.
///
/// Returns `None` when the file can no longer be read.
fn rich_report(violation: &Violation, root: &Path) -> Option<Report> {
    let file = &violation.location.file;
    let source = std::fs::read_to_string(root.join(file)).ok()?;
    let name = file.to_string_lossy().replace('\\', "/");
    let diagnostic = ViolationDiagnostic::from(violation);
    Some(Report::new(diagnostic).with_source_code(NamedSource::new(name, source)))
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_lint_core::Location;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn violation(file: &str, offset: usize, length: usize) -> Violation {
        Violation::new(
            "LB001",
            "cross-feature-deep-import",
            Severity::Error,
            Location::new(PathBuf::from(file), 1, 1).with_span(offset, length),
            "cross-feature deep import forbidden",
        )
    }

    #[test]
    fn rich_report_reads_source_from_root() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        let src = "import x from '@/features/checkout/helpers';\n";
        fs::write(tmp.path().join("src/view.ts"), src).unwrap();

        let report = rich_report(&violation("src/view.ts", 14, 29), tmp.path()).unwrap();
        assert!(report.to_string().contains("[LB001]"));
    }

    #[test]
    fn rich_report_missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(rich_report(&violation("src/gone.ts", 0, 0), tmp.path()).is_none());
    }

    #[test]
    fn json_output_serializes() {
        let mut result = LintResult::new();
        result.violations.push(violation("src/view.ts", 0, 0));
        result.files_checked = 1;
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["violations"][0]["code"], "LB001");
        assert_eq!(json["violations"][0]["severity"], "error");
        assert_eq!(json["files_checked"], 1);
    }
}
