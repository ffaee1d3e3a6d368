//! Dictionary Normalizer
//!
//! Flips and flattens arbitrarily nested translation dictionaries into the
//! canonical `{ language -> key -> text }` shape. The language axis is
//! detected by checking every key of an axis against the known language
//! table; when no axis matches at any nesting level the input is rejected
//! with a descriptive error.

use icu_compiler::languages::is_known_language;
use icu_compiler::typegen::Dictionary;
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

const SUPPORTED_FORMATS: &str = "{ en: { ... }, \"en-UK\": { ... } } or \
{ wordA: { en: { ... } }, wordB: { en: { ... } } }";

/// Errors produced while normalizing a dictionary.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid dictionary format - supported formats: {}", SUPPORTED_FORMATS)]
    InvalidFormat,
    #[error("expected `{0}` to be a message string")]
    NonStringLeaf(String),
}

/// Normalize a translation tree to `{ language -> key -> text }`.
///
/// Supported shapes:
/// - `{ en: { ... }, "en-UK": { ... } }` (already normalized)
/// - `{ wordA: { en: "...", "en-UK": "..." }, wordB: { ... } }` (flipped)
/// - one or more levels of grouping above either shape, merged depth-first
pub fn normalize(source: &Value) -> Result<Dictionary, NormalizeError> {
    let entries = match source {
        Value::Object(map) if !map.is_empty() => map,
        _ => return Err(NormalizeError::InvalidFormat),
    };
    for value in entries.values() {
        if !value.is_object() {
            return Err(NormalizeError::InvalidFormat);
        }
    }

    // Is it already normalized?
    if entries.keys().all(|key| is_known_language(key)) {
        let mut result = Dictionary::new();
        for (lang, translations) in entries {
            let mut messages = IndexMap::new();
            for (key, text) in translations.as_object().into_iter().flatten() {
                match text {
                    Value::String(text) => {
                        messages.insert(key.clone(), text.clone());
                    }
                    _ => {
                        return Err(NormalizeError::NonStringLeaf(format!("{}.{}", lang, key)))
                    }
                }
            }
            result.insert(lang.clone(), messages);
        }
        return Ok(result);
    }

    // Flip the structure - word <-> language
    let second_level_is_languages = entries
        .values()
        .flat_map(|value| value.as_object().into_iter().flatten())
        .all(|(key, _)| is_known_language(key));
    if second_level_is_languages {
        let mut result = Dictionary::new();
        for (key, translations) in entries {
            for (lang, text) in translations.as_object().into_iter().flatten() {
                match text {
                    Value::String(text) => {
                        result
                            .entry(lang.clone())
                            .or_default()
                            .insert(key.clone(), text.clone());
                    }
                    _ => {
                        return Err(NormalizeError::NonStringLeaf(format!("{}.{}", key, lang)))
                    }
                }
            }
        }
        return Ok(result);
    }

    // Try deeper nesting
    let mut result = Dictionary::new();
    for value in entries.values() {
        for (lang, translations) in normalize(value)? {
            result.entry(lang).or_default().extend(translations);
        }
    }
    if !result.is_empty() {
        return Ok(result);
    }
    Err(NormalizeError::InvalidFormat)
}
