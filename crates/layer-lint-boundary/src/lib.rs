//! # layer-lint-boundary
//!
//! Layer boundary enforcement for layered front-end source trees
//! (`app / features / shared / components`).
//!
//! The pipeline for every import edge is:
//!
//! - [`resolver`] maps the specifier onto a project-relative path
//! - [`layer`] classifies both endpoints into a [`Layer`]
//! - [`rules`] evaluates the edge against the ordered [`RuleTable`]
//! - [`BoundaryEngine`] ties them together and emits `Violation`s
//!
//! Import specifiers come from a [`LanguageExtractor`];
//! [`TypeScriptExtractor`] and [`VueExtractor`] are provided.
//!
//! ```
//! use layer_lint_boundary::{BoundaryConfig, BoundaryEngine};
//!
//! let engine = BoundaryEngine::new(BoundaryConfig::default());
//! let found = engine.check_specifiers(
//!     "src/features/cart/view.ts",
//!     ["@/features/checkout/helpers", "@/features/checkout/index"],
//! );
//! assert_eq!(found.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod extractor;
pub mod layer;
pub mod resolver;
pub mod rules;
pub mod typescript;
pub mod vue;

pub use config::{BoundaryConfig, ConfigError};
pub use engine::{BoundaryEngine, BoundaryViolation};
pub use extractor::{ExtractError, FileAnalysis, ImportInfo, LanguageExtractor};
pub use layer::{classify, ClassifiedPath, Layer, LayerConfig};
pub use resolver::{resolve, ResolveConfig, ResolvedImport};
pub use rules::{evaluate, RuleId, RuleTable, Verdict};
pub use typescript::TypeScriptExtractor;
pub use vue::VueExtractor;
