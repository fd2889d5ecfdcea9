//! Vue single-file component extractor.
//!
//! Locates `<script>` blocks and runs their bodies through the
//! TypeScript grammar, shifting positions back into SFC coordinates.

use std::path::{Path, PathBuf};

use crate::extractor::{ExtractError, FileAnalysis, ImportInfo, ImportKind, LanguageExtractor};
use crate::typescript::{Dialect, TypeScriptExtractor};

/// A `<script>` block inside an SFC.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScriptBlock<'a> {
    /// Byte offset of the body in the SFC.
    start: usize,
    body: &'a str,
    dialect: Dialect,
}

/// Extracts import specifiers from `.vue` files.
#[derive(Default)]
pub struct VueExtractor {
    script: TypeScriptExtractor,
}

impl VueExtractor {
    /// Creates a new Vue extractor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn script_blocks(source: &str) -> Vec<ScriptBlock<'_>> {
    const OPEN: &str = "<script";
    const CLOSE: &str = "</script>";

    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(found) = source[pos..].find(OPEN) {
        let open = pos + found;
        let after = open + OPEN.len();
        pos = after;

        // `<scripts>` and friends are not script tags.
        if !source[after..].starts_with(|c: char| c == '>' || c.is_whitespace()) {
            continue;
        }
        let Some(tag_len) = source[after..].find('>') else {
            break;
        };
        let attrs = &source[after..after + tag_len];
        let start = after + tag_len + 1;
        pos = start;

        if attrs.trim_end().ends_with('/') {
            continue;
        }
        let Some(body_len) = source[start..].find(CLOSE) else {
            break;
        };
        pos = start + body_len + CLOSE.len();

        let dialect = if ["tsx", "jsx"]
            .iter()
            .any(|l| attrs.contains(&format!("lang=\"{l}\"")) || attrs.contains(&format!("lang='{l}'")))
        {
            Dialect::Tsx
        } else {
            Dialect::TypeScript
        };

        blocks.push(ScriptBlock {
            start,
            body: &source[start..start + body_len],
            dialect,
        });
    }

    blocks
}

/// `src` attribute of a `<script src="...">` tag, which is an import too.
fn script_src_imports(source: &str) -> Vec<ImportInfo> {
    let mut imports = Vec::new();
    let mut pos = 0;
    while let Some(found) = source[pos..].find("<script") {
        let open = pos + found;
        let Some(tag_len) = source[open..].find('>') else {
            break;
        };
        let tag = &source[open..open + tag_len];
        pos = open + tag_len;

        for quote in ['"', '\''] {
            let needle = format!("src={quote}");
            // `data-src=` and friends are other attributes.
            let Some(at) = tag
                .match_indices(&needle)
                .map(|(at, _)| at)
                .find(|&at| tag[..at].ends_with(char::is_whitespace))
            else {
                continue;
            };
            let value_start = at + needle.len();
            let Some(value_len) = tag[value_start..].find(quote) else {
                continue;
            };
            let (line, column) = position(source, open);
            imports.push(ImportInfo {
                line,
                column,
                offset: open + at + needle.len() - 1,
                length: value_len + 2,
                specifier: tag[value_start..value_start + value_len].trim().to_owned(),
                kind: ImportKind::Static,
            });
        }
    }
    imports
}

/// 1-indexed line and 0-indexed column of a byte offset.
fn position(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(offset, |nl| offset - nl - 1);
    (line, column)
}

impl LanguageExtractor for VueExtractor {
    fn language_id(&self) -> &'static str {
        "vue"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".vue"]
    }

    fn analyze(&self, path: &Path, source: &str) -> Result<FileAnalysis, ExtractError> {
        let mut imports = script_src_imports(source);

        for block in script_blocks(source) {
            let (base_line, base_column) = position(source, block.start);
            for mut import in self.script.imports(path, block.body, block.dialect)? {
                if import.line == 1 {
                    import.column += base_column;
                }
                import.line += base_line - 1;
                import.offset += block.start;
                imports.push(import);
            }
        }

        imports.retain(|i| !i.specifier.is_empty());
        imports.sort_by_key(|i| i.offset);
        Ok(FileAnalysis {
            file_path: PathBuf::from(path),
            imports,
        })
    }
}
