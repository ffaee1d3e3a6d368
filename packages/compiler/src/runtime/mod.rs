//! Runtime
//!
//! Re-expands compiled messages against a locale, runtime arguments and
//! formatter callbacks, producing either a flat string or a mixed sequence
//! of strings and caller-typed rich values.

pub mod evaluate;
pub mod formatters;
pub mod plural;

pub use evaluate::{evaluate_ast, run, RuntimeError};
pub use formatters::{Argument, Arguments, Formatters, Fragment};
pub use plural::{CldrPluralResolver, PluralResolver, PluralRuleKind};
