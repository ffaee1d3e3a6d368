//! Dictionary Compilation
//!
//! Compiles every message of a translation tree into its JSON artifact.
//! Languages of a normalized dictionary are independent compile units and
//! run in parallel.

use anyhow::Context;
use icu_compiler::typegen::Dictionary;
use icu_compiler::{compile_to_json, CompileOptions, CompiledMessage};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde_json::Value;

/// A compiled dictionary: `{ language -> key -> artifact }`.
pub type CompiledDictionary = IndexMap<String, IndexMap<String, CompiledMessage>>;

/// Compile every string leaf of an arbitrary JSON tree in place, keeping the
/// surrounding structure.
pub fn compile_tree(source: &Value, options: CompileOptions) -> anyhow::Result<Value> {
    match source {
        Value::String(text) => {
            let compiled = compile_to_json(text, options)
                .with_context(|| format!("while compiling {:?}", text))?;
            Ok(serde_json::to_value(compiled)?)
        }
        Value::Array(items) => Ok(Value::Array(
            items
                .iter()
                .map(|item| compile_tree(item, options))
                .collect::<anyhow::Result<_>>()?,
        )),
        Value::Object(map) => {
            let mut compiled = serde_json::Map::new();
            for (key, value) in map {
                compiled.insert(key.clone(), compile_tree(value, options)?);
            }
            Ok(Value::Object(compiled))
        }
        other => Ok(other.clone()),
    }
}

/// Compile a normalized dictionary, one language per worker.
pub fn compile_dictionary(
    dictionary: &Dictionary,
    options: CompileOptions,
) -> anyhow::Result<CompiledDictionary> {
    let compiled: Vec<(String, IndexMap<String, CompiledMessage>)> = dictionary
        .iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(lang, translations)| {
            let messages = translations
                .iter()
                .map(|(key, text)| {
                    let compiled = compile_to_json(text, options)
                        .with_context(|| format!("while compiling `{}` for `{}`", key, lang))?;
                    Ok((key.clone(), compiled))
                })
                .collect::<anyhow::Result<IndexMap<_, _>>>()?;
            Ok((lang.clone(), messages))
        })
        .collect::<anyhow::Result<_>>()?;
    Ok(compiled.into_iter().collect())
}
