//! Configuration discovery and loading.
//!
//! The configuration file is picked in this order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `layer-lint.toml` or `.layer-lint.toml` in the project directory or
//!    the nearest ancestor that has one
//! 3. `~/.layer-lint/config.toml` (global fallback)
//! 4. No config found → built-in defaults

use anyhow::{Context, Result};
use layer_lint_boundary::BoundaryConfig;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory or one of its ancestors.
    Project(PathBuf),
    /// Loaded from the global config directory (`~/.layer-lint/`).
    Global(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Loads and validates the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, parsed, or validated.
    pub fn load(&self) -> Result<BoundaryConfig> {
        let config = match self.path() {
            None => {
                tracing::info!("No layer-lint.toml found, using default layers");
                BoundaryConfig::default()
            }
            Some(p) => {
                if matches!(self, Self::Global(_)) {
                    tracing::info!("Using global config: {}", p.display());
                }
                BoundaryConfig::from_file(p)
                    .with_context(|| format!("Failed to load {}", p.display()))?
            }
        };
        config.validate().context("Config validation failed")?;
        Ok(config)
    }

    /// Directory of a project config, which anchors its relative `root`.
    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        match self {
            Self::Project(p) => p.parent(),
            _ => None,
        }
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["layer-lint.toml", ".layer-lint.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file path.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    // Ancestors of a relative `.` stop at the working directory.
    let project_dir =
        std::path::absolute(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());
    resolve_inner(&project_dir, explicit, global_config_dir())
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    for dir in project_dir.ancestors() {
        for name in PROJECT_CONFIG_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                tracing::debug!("Found project config: {}", candidate.display());
                return ConfigSource::Project(candidate);
            }
        }
    }

    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.is_file() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

/// Returns the global config directory path.
///
/// Resolution: `$LAYER_LINT_CONFIG_DIR` > `~/.layer-lint/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("LAYER_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".layer-lint"))
}
