//! Check command implementation.

use anyhow::{Context, Result};
use ignore::overrides::OverrideBuilder;
use layer_lint_boundary::{
    BoundaryConfig, BoundaryEngine, LanguageExtractor, TypeScriptExtractor, VueExtractor,
};
use layer_lint_core::LintResult;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
///
/// Returns `true` when no error-severity violation was found.
pub fn run(
    path: &Path,
    format: OutputFormat,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<bool> {
    let (result, root) = lint(path, exclude, source)?;
    super::output::print(&result, format, &root)?;
    Ok(!result.has_errors())
}

/// Lints every supported file under `path`.
///
/// Violation paths are relative to the returned project root, which may
/// lie above `path`.
fn lint(path: &Path, exclude: Vec<String>, source: &ConfigSource) -> Result<(LintResult, PathBuf)> {
    let config = source.load()?;

    let path = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    let root = project_root(&path, source, &config)?;
    let scope = if path.starts_with(&root) {
        path
    } else {
        tracing::debug!("{} is outside the project, checking {}", path.display(), root.display());
        root.clone()
    };

    let mut patterns = config.exclude.clone();
    patterns.extend(exclude);

    let engine = BoundaryEngine::new(config);
    let extractors: Vec<Box<dyn LanguageExtractor>> = vec![
        Box::new(TypeScriptExtractor::new()),
        Box::new(VueExtractor::new()),
    ];

    let files = discover_files(&root, &scope, &patterns, &extractors)?;
    tracing::info!("Analyzing {} files in {}", files.len(), scope.display());

    let per_file = files
        .par_iter()
        .map(|file| check_file(&engine, &extractors, &root, file))
        .collect::<Result<Vec<_>>>()?;

    let mut result = LintResult::new();
    for file_result in per_file {
        result.extend(file_result);
    }
    result.sort();

    Ok((result, root))
}

/// Directory layer paths are classified from.
///
/// A project config anchors it at the config's directory. Otherwise it is
/// the nearest ancestor of `path` holding the source root, or `path`
/// itself. The configured `root` is applied on top.
fn project_root(path: &Path, source: &ConfigSource, config: &BoundaryConfig) -> Result<PathBuf> {
    let base = match source.base_dir() {
        Some(dir) => dir.to_path_buf(),
        None => path
            .ancestors()
            .find(|dir| dir.join(&config.source_root).is_dir())
            .unwrap_or(path)
            .to_path_buf(),
    };

    let root = if config.root.is_absolute() {
        config.root.clone()
    } else {
        base.join(&config.root)
    };
    root.canonicalize()
        .with_context(|| format!("Project root not found: {}", root.display()))
}

/// Checks one file.
///
/// Files no extractor handles, or that cannot be parsed, yield an empty
/// result that does not count as checked.
fn check_file(
    engine: &BoundaryEngine,
    extractors: &[Box<dyn LanguageExtractor>],
    root: &Path,
    file: &Path,
) -> Result<LintResult> {
    let mut result = LintResult::new();
    let Some(extractor) = extractors.iter().find(|e| e.handles(file)) else {
        return Ok(result);
    };

    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let rel = file.strip_prefix(root).unwrap_or(file);

    match extractor.analyze(rel, &source) {
        Ok(analysis) => {
            result.violations = engine.check(&analysis);
            result.files_checked = 1;
        }
        Err(e) => tracing::warn!("Skipping {}: {e}", file.display()),
    }
    Ok(result)
}

/// Walks `scope`, applying exclude patterns relative to `root`.
fn discover_files(
    root: &Path,
    scope: &Path,
    exclude: &[String],
    extractors: &[Box<dyn LanguageExtractor>],
) -> Result<Vec<PathBuf>> {
    let mut overrides = OverrideBuilder::new(root);
    for pattern in exclude {
        overrides
            .add(&format!("!{pattern}"))
            .with_context(|| format!("Invalid exclude pattern: {pattern}"))?;
    }
    let overrides = overrides.build().context("Invalid exclude patterns")?;

    let mut builder = ignore::WalkBuilder::new(scope);
    builder.hidden(false).git_ignore(true).overrides(overrides);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() || !extractors.iter().any(|e| e.handles(path)) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}
