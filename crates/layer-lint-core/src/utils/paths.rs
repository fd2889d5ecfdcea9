//! Path utilities shared by the resolver and classifier.
//!
//! Every path handled by layer-lint is first brought into one canonical
//! shape: forward slashes, no empty or `.` segments, `..` collapsed, and
//! no leading slash. All other helpers here assume that shape.

/// Canonicalizes an OS-style path into a project-relative string.
///
/// - backslashes become `/`, runs of separators collapse to one
/// - surrounding whitespace is trimmed (per segment)
/// - `.` segments are dropped, `..` removes the previous segment
/// - excess `..` segments at the start are dropped, never an error
/// - the result has no leading `/` and no leading `./`
///
/// The function is idempotent.
///
/// # Examples
///
/// ```
/// use layer_lint_core::utils::paths::normalize;
///
/// assert_eq!(normalize(r"src\features\..\shared\\ui"), "src/shared/ui");
/// assert_eq!(normalize("./a/./b/"), "a/b");
/// assert_eq!(normalize("../../x"), "x");
/// assert_eq!(normalize("   "), "");
/// ```
#[must_use]
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut stack: Vec<&str> = Vec::new();

    for segment in unified.split('/').map(str::trim) {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            real => stack.push(real),
        }
    }

    stack.join("/")
}

/// Splits a normalized path into its segments.
///
/// The empty path has no segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Returns `true` if `path` starts with all segments of `prefix`.
///
/// Matching is segment-aware: `features` is a prefix of
/// `features/cart` but not of `featuresX/cart`.
#[must_use]
pub fn has_segment_prefix(path: &[&str], prefix: &[&str]) -> bool {
    path.len() >= prefix.len() && path.iter().zip(prefix).all(|(a, b)| a == b)
}

/// Finds the first position where `needle` occurs as a whole segment run.
#[must_use]
pub fn find_segments(path: &[&str], needle: &[&str]) -> Option<usize> {
    if needle.is_empty() || needle.len() > path.len() {
        return None;
    }
    (0..=path.len() - needle.len()).find(|&i| has_segment_prefix(&path[i..], needle))
}

/// Directory portion of a normalized path (empty for a bare name).
#[must_use]
pub fn parent(path: &str) -> &str {
    path.rfind('/').map_or("", |i| &path[..i])
}

/// File name without its final extension.
///
/// A leading dot is part of the name, so `.eslintrc` keeps its stem.
#[must_use]
pub fn file_stem(segment: &str) -> &str {
    match segment.rfind('.') {
        Some(0) | None => segment,
        Some(i) => &segment[..i],
    }
}

/// Returns `true` if the segment carries a file extension.
#[must_use]
pub fn has_extension(segment: &str) -> bool {
    file_stem(segment).len() != segment.len()
}
