#![deny(clippy::all)]

//! CLI tooling for the ICU MessageFormat to JSON compiler: dictionary
//! normalization, tree compilation and artifact/declaration output.

// Re-export compiler for convenience
pub use icu_compiler as compiler;

// CLI-specific modules
pub mod compile;
pub mod dictionary;
pub mod driver;
pub mod logging;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
