//! Language-agnostic extraction types and trait.
//!
//! `LanguageExtractor` is the extension point for adding new languages.
//! Implement it to teach layer-lint how to pull import specifiers out of
//! a source file. The boundary engine only ever sees the result.

use std::path::{Path, PathBuf};

/// How an import was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import x from 'y'`, `import 'y'`, `import x = require('y')`
    Static,
    /// `export { x } from 'y'`, `export * from 'y'`
    ReExport,
    /// `import('y')`
    Dynamic,
    /// `require('y')`
    Require,
}

/// A single import specifier extracted from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    /// Line number of the statement (1-indexed).
    pub line: usize,
    /// Column of the statement (0-indexed byte offset within line).
    pub column: usize,
    /// Byte offset of the specifier literal in the file.
    pub offset: usize,
    /// Byte length of the specifier literal, quotes included.
    pub length: usize,
    /// Specifier text without quotes (e.g., `@/features/cart`).
    pub specifier: String,
    /// Syntax used.
    pub kind: ImportKind,
}

impl ImportInfo {
    /// Creates a static import at the given position with no span.
    #[must_use]
    pub fn new(line: usize, column: usize, specifier: impl Into<String>) -> Self {
        Self {
            line,
            column,
            offset: 0,
            length: 0,
            specifier: specifier.into(),
            kind: ImportKind::Static,
        }
    }
}

/// Result of analyzing a single source file.
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    /// Path relative to project root.
    pub file_path: PathBuf,
    /// All import specifiers found, in source order.
    pub imports: Vec<ImportInfo>,
}

/// Errors raised while extracting imports.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language id.
        language: &'static str,
        /// Underlying error.
        message: String,
    },
    /// The parser produced no tree.
    #[error("failed to parse {path} as {language}")]
    Parse {
        /// Language id.
        language: &'static str,
        /// File being parsed.
        path: PathBuf,
    },
}

/// Trait for language-specific import extraction.
///
/// The extractor receives raw source text and returns a [`FileAnalysis`]
/// containing the language-agnostic intermediate representation.
pub trait LanguageExtractor: Send + Sync {
    /// Language identifier (e.g., `"typescript"`, `"vue"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".ts", ".tsx"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extract import specifiers from source code.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if the grammar cannot be loaded or the
    /// source cannot be parsed.
    fn analyze(&self, path: &Path, source: &str) -> Result<FileAnalysis, ExtractError>;

    /// Returns `true` if this extractor handles `path`.
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().iter().any(|x| x.strip_prefix('.') == Some(ext)))
    }
}
