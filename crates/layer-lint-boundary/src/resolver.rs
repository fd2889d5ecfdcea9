//! Import specifier resolution.
//!
//! Maps the textual specifier of an import onto a project-relative path
//! anchored at the source root, or reports it as external.

use layer_lint_core::utils::paths::{find_segments, normalize, parent, segments};

/// Source root and alias used to anchor specifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveConfig {
    root: String,
    alias: String,
    strict_root_match: bool,
}

impl ResolveConfig {
    /// Creates a config; both values are normalized.
    #[must_use]
    pub fn new(root: &str, alias: &str) -> Self {
        Self {
            root: normalize(root),
            alias: normalize(alias),
            strict_root_match: false,
        }
    }

    /// Only accept the source root as a whole run of path segments when
    /// searching specifiers for it.
    #[must_use]
    pub fn with_strict_root_match(mut self, strict: bool) -> Self {
        self.strict_root_match = strict;
        self
    }
}

/// An import specifier together with its resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImport {
    /// Specifier as written in the source.
    pub raw_specifier: String,
    /// Project-relative path, `None` for external packages.
    pub resolved_path: Option<String>,
}

impl ResolvedImport {
    /// Resolves `specifier` as seen from `file_location`.
    #[must_use]
    pub fn new(specifier: &str, file_location: &str, config: &ResolveConfig) -> Self {
        Self {
            raw_specifier: specifier.to_owned(),
            resolved_path: resolve(specifier, file_location, config),
        }
    }

    /// `true` when the import points outside the project.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.resolved_path.is_none()
    }
}

/// Resolves an import specifier to a project-relative path.
///
/// 1. Relative specifiers (`./x`, `../x`) are joined onto the directory
///    of `file_location` first.
/// 2. `alias/rest` becomes `root/rest`. The alias must be a whole segment,
///    so `@` matches `@/x` but not `@vue/x`.
/// 3. Otherwise the suffix starting at the first occurrence of the root is
///    returned. By default this is a plain substring search; with
///    [`ResolveConfig::with_strict_root_match`] the root must appear as
///    whole segments.
/// 4. Anything else is external and yields `None`. A relative specifier is
///    never external and falls back to its joined path.
///
/// # Examples
///
/// ```
/// use layer_lint_boundary::resolver::{resolve, ResolveConfig};
///
/// let cfg = ResolveConfig::new("src", "@");
/// assert_eq!(
///     resolve("@/features/a/x.ts", "", &cfg).as_deref(),
///     Some("src/features/a/x.ts")
/// );
/// assert_eq!(resolve("lodash", "", &cfg), None);
/// ```
#[must_use]
pub fn resolve(specifier: &str, file_location: &str, config: &ResolveConfig) -> Option<String> {
    let unified = specifier.trim().replace('\\', "/");
    let relative = is_relative(&unified);

    let path = if relative {
        let base = normalize(file_location);
        normalize(&format!("{}/{unified}", parent(&base)))
    } else {
        normalize(&unified)
    };

    if path.is_empty() {
        return None;
    }

    if let Some(rest) = strip_alias(&path, &config.alias) {
        return Some(if config.root.is_empty() {
            rest.to_owned()
        } else {
            format!("{}/{rest}", config.root)
        });
    }

    if let Some(anchored) = anchor_at_root(&path, &config.root, config.strict_root_match) {
        return Some(anchored);
    }

    relative.then_some(path)
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

fn strip_alias<'a>(path: &'a str, alias: &str) -> Option<&'a str> {
    if alias.is_empty() {
        return None;
    }
    path.strip_prefix(alias)?.strip_prefix('/')
}

fn anchor_at_root(path: &str, root: &str, strict: bool) -> Option<String> {
    if root.is_empty() {
        return None;
    }
    if strict {
        let segs: Vec<&str> = segments(path).collect();
        let needle: Vec<&str> = segments(root).collect();
        let at = find_segments(&segs, &needle)?;
        Some(segs[at..].join("/"))
    } else {
        path.find(root).map(|at| path[at..].to_owned())
    }
}
