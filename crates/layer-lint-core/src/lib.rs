//! # layer-lint-core
//!
//! Shared building blocks for layer-lint.
//!
//! - [`Violation`] and [`LintResult`] for representing lint findings
//! - [`Severity`] and [`Location`] for reporting
//! - [`utils::paths`] for canonical, OS-independent path handling
//!
//! ## Example
//!
//! ```
//! use layer_lint_core::utils::normalize;
//!
//! assert_eq!(normalize(r".\src\features\cart\..\checkout"), "src/features/checkout");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod types;

/// Utility modules shared by the engine and the CLI.
pub mod utils;

pub use types::{Label, LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic};
