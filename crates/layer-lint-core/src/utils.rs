//! Utility functions shared across layer-lint crates.

pub mod paths;

#[doc(inline)]
pub use paths::normalize;
