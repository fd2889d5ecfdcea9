//! TypeScript/JavaScript import extractor using Tree-sitter.

use std::path::{Path, PathBuf};
use tree_sitter::{Language, Node, Parser};

use crate::extractor::{ExtractError, FileAnalysis, ImportInfo, ImportKind, LanguageExtractor};

/// Grammar flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Plain TypeScript (no JSX, allows `<T>expr` assertions).
    TypeScript,
    /// TSX grammar, also used for JavaScript and JSX.
    Tsx,
}

impl Dialect {
    /// Picks the grammar for a file extension.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts" | "mts" | "cts") => Self::TypeScript,
            _ => Self::Tsx,
        }
    }
}

/// Extracts import specifiers from TypeScript and JavaScript source.
pub struct TypeScriptExtractor {
    typescript: Language,
    tsx: Language,
}

impl TypeScriptExtractor {
    /// Creates a new TypeScript extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            typescript: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Collects all import specifiers in `source` using the given dialect.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if the grammar cannot be loaded or parsing
    /// yields no tree.
    pub fn imports(
        &self,
        path: &Path,
        source: &str,
        dialect: Dialect,
    ) -> Result<Vec<ImportInfo>, ExtractError> {
        let language = match dialect {
            Dialect::TypeScript => &self.typescript,
            Dialect::Tsx => &self.tsx,
        };

        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| ExtractError::Language {
                language: "typescript",
                message: e.to_string(),
            })?;

        let src = source.as_bytes();
        let tree = parser.parse(src, None).ok_or_else(|| ExtractError::Parse {
            language: "typescript",
            path: path.to_path_buf(),
        })?;

        let mut imports = Vec::new();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            if let Some(import) = Self::extract(&node, src) {
                imports.push(import);
            }
            let mut cursor = node.walk();
            stack.extend(node.named_children(&mut cursor));
        }

        imports.sort_by_key(|i| i.offset);
        Ok(imports)
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    /// The string literal carrying the specifier, with the import kind.
    fn specifier_node<'t>(node: &Node<'t>, src: &[u8]) -> Option<(Node<'t>, ImportKind)> {
        match node.kind() {
            "import_statement" => {
                if let Some(source) = node.child_by_field_name("source") {
                    return Some((source, ImportKind::Static));
                }
                // import x = require('y')
                let mut cursor = node.walk();
                let clause = node
                    .named_children(&mut cursor)
                    .find(|c| c.kind() == "import_require_clause")?;
                clause
                    .child_by_field_name("source")
                    .map(|s| (s, ImportKind::Static))
            }
            "export_statement" => node
                .child_by_field_name("source")
                .map(|s| (s, ImportKind::ReExport)),
            "call_expression" => {
                let function = node.child_by_field_name("function")?;
                let kind = match function.kind() {
                    "import" => ImportKind::Dynamic,
                    "identifier" if Self::text(&function, src) == "require" => ImportKind::Require,
                    _ => return None,
                };
                let arguments = node.child_by_field_name("arguments")?;
                let mut cursor = arguments.walk();
                let first = arguments.named_children(&mut cursor).next()?;
                (first.kind() == "string").then_some((first, kind))
            }
            _ => None,
        }
    }

    fn extract(node: &Node<'_>, src: &[u8]) -> Option<ImportInfo> {
        let (literal, kind) = Self::specifier_node(node, src)?;
        let specifier = unquote(Self::text(&literal, src));
        if specifier.is_empty() {
            return None;
        }

        Some(ImportInfo {
            line: node.start_position().row + 1,
            column: node.start_position().column,
            offset: literal.start_byte(),
            length: literal.end_byte() - literal.start_byte(),
            specifier: specifier.to_owned(),
            kind,
        })
    }
}

fn unquote(literal: &str) -> &str {
    let trimmed = literal.trim();
    let inner = trimmed
        .strip_prefix(['\'', '"'])
        .and_then(|s| s.strip_suffix(['\'', '"']));
    inner.unwrap_or(trimmed).trim()
}

impl Default for TypeScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for TypeScriptExtractor {
    fn language_id(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs"]
    }

    fn analyze(&self, path: &Path, source: &str) -> Result<FileAnalysis, ExtractError> {
        Ok(FileAnalysis {
            file_path: PathBuf::from(path),
            imports: self.imports(path, source, Dialect::for_path(path))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(path: &str, src: &str) -> FileAnalysis {
        TypeScriptExtractor::new()
            .analyze(Path::new(path), src)
            .expect("analyze failed")
    }

    fn specifiers(a: &FileAnalysis) -> Vec<&str> {
        a.imports.iter().map(|i| i.specifier.as_str()).collect()
    }

    #[test]
    fn extracts_static_imports() {
        let a = analyze(
            "src/features/cart/view.ts",
            "import { a } from '@/features/checkout/helpers';\nimport b from \"lodash\";\nimport './side-effect';\n",
        );
        assert_eq!(
            specifiers(&a),
            vec!["@/features/checkout/helpers", "lodash", "./side-effect"]
        );
        assert_eq!(a.imports[0].line, 1);
        assert_eq!(a.imports[1].line, 2);
        assert_eq!(a.imports[0].column, 0);
        assert_eq!(a.imports[0].kind, ImportKind::Static);
    }

    #[test]
    fn extracts_type_only_imports() {
        let a = analyze("a.ts", "import type { Cart } from '@/features/cart/types';\n");
        assert_eq!(specifiers(&a), vec!["@/features/cart/types"]);
    }

    #[test]
    fn extracts_re_exports() {
        let a = analyze(
            "src/features/cart/index.ts",
            "export * from './model';\nexport { View } from './ui/View';\nexport const x = 1;\n",
        );
        assert_eq!(specifiers(&a), vec!["./model", "./ui/View"]);
        assert!(a.imports.iter().all(|i| i.kind == ImportKind::ReExport));
    }

    #[test]
    fn extracts_dynamic_import_and_require() {
        let a = analyze(
            "src/app/router.js",
            "const Page = () => import('@/features/cart/pages/CartPage.vue');\nconst fs = require('fs');\n",
        );
        assert_eq!(
            specifiers(&a),
            vec!["@/features/cart/pages/CartPage.vue", "fs"]
        );
        assert_eq!(a.imports[0].kind, ImportKind::Dynamic);
        assert_eq!(a.imports[1].kind, ImportKind::Require);
        assert_eq!(a.imports[1].line, 2);
    }

    #[test]
    fn ignores_non_literal_dynamic_imports() {
        let a = analyze("a.js", "const m = import(name);\nrequire(`x${y}`);\nfoo('bar');\n");
        assert!(a.imports.is_empty());
    }

    #[test]
    fn extracts_from_tsx() {
        let a = analyze(
            "src/components/Card.tsx",
            "import { Button } from '@/shared/ui';\nexport const Card = () => <Button />;\n",
        );
        assert_eq!(specifiers(&a), vec!["@/shared/ui"]);
    }

    #[test]
    fn span_covers_quoted_literal() {
        let src = "import x from '@/a';\n";
        let a = analyze("a.ts", src);
        let i = &a.imports[0];
        assert_eq!(&src[i.offset..i.offset + i.length], "'@/a'");
    }

    #[test]
    fn empty_source() {
        let a = analyze("a.ts", "");
        assert!(a.imports.is_empty());
    }

    #[test]
    fn dialect_from_extension() {
        assert_eq!(Dialect::for_path(Path::new("a.ts")), Dialect::TypeScript);
        assert_eq!(Dialect::for_path(Path::new("a.tsx")), Dialect::Tsx);
        assert_eq!(Dialect::for_path(Path::new("a.js")), Dialect::Tsx);
    }

    #[test]
    fn handles_known_extensions() {
        let e = TypeScriptExtractor::new();
        assert!(e.handles(Path::new("src/a.ts")));
        assert!(e.handles(Path::new("src/a.mjs")));
        assert!(!e.handles(Path::new("src/a.vue")));
        assert!(!e.handles(Path::new("Makefile")));
    }

    #[test]
    fn unquote_strips_matching_quotes() {
        assert_eq!(unquote("'@/a'"), "@/a");
        assert_eq!(unquote("\"lodash\""), "lodash");
        assert_eq!(unquote("''"), "");
    }
}
