#![deny(clippy::all)]

//! ICU MessageFormat to JSON compiler and runtime.
//!
//! The compiler parses ICU messages (pluralization, selection,
//! date/time/number formatting, rich-text tags, argument interpolation) and
//! serializes them into a compact positional-array JSON encoding with
//! deduplicated argument indices. The runtime re-expands that encoding
//! against a locale, an argument map and formatter callbacks, yielding a
//! flat string or a mixed sequence of strings and caller-typed values.

// Core modules
pub mod chars;
pub mod collector;
pub mod compiled;
pub mod compiler;
pub mod languages;
pub mod parse_util;
pub mod typegen;

// Parser module
pub mod message_parser;

// Runtime module
pub mod runtime;

// Re-exports
pub use collector::{collect_arguments, ArgumentUsages, UsageSet};
pub use compiled::{CompiledMessage, CompiledNode, DecodeError};
pub use compiler::{compile, compile_to_json, CompileError, CompileOptions, CompiledTranslation};
pub use languages::{is_known_language, AVAILABLE_LANGUAGES};
pub use message_parser::{parse, MessageNode, PluralType};
pub use runtime::{
    evaluate_ast, run, Argument, Arguments, CldrPluralResolver, Formatters, Fragment,
    PluralResolver, PluralRuleKind, RuntimeError,
};
pub use typegen::{generate_dictionary_api, Dictionary, TypegenOptions};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
