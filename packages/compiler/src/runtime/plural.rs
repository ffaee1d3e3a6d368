//! Plural Rule Resolution
//!
//! CLDR plural and ordinal category lookup behind a trait, so embedders and
//! tests can substitute their own rules or a fresh cache.

use std::collections::HashMap;
use std::sync::RwLock;

use icu_locale_core::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

/// Cardinal rules answer "how many", ordinal rules answer "which position".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralRuleKind {
    Cardinal,
    Ordinal,
}

/// Resolves a numeric value to a CLDR category label such as `one` or `few`.
pub trait PluralResolver: Send + Sync {
    fn resolve_category(&self, value: f64, locale: &str, kind: PluralRuleKind) -> &'static str;
}

/// `PluralResolver` backed by the compiled CLDR data of `icu_plurals`.
///
/// Rule sets are cached per locale and rule kind. Population is idempotent:
/// two threads racing on the same locale construct identical rule sets and
/// the last insert wins, so no lock is held across construction.
///
/// Categories resolve on the integer part of the value; exact-match case
/// labels see the full value before rule lookup ever happens.
pub struct CldrPluralResolver {
    cache: RwLock<HashMap<(String, PluralRuleKind), PluralRules>>,
}

impl CldrPluralResolver {
    pub fn new() -> Self {
        CldrPluralResolver {
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for CldrPluralResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PluralResolver for CldrPluralResolver {
    fn resolve_category(&self, value: f64, locale: &str, kind: PluralRuleKind) -> &'static str {
        let n = value.trunc() as i64;
        {
            let cache = self.cache.read().unwrap();
            if let Some(rules) = cache.get(&(locale.to_string(), kind)) {
                return category_name(rules.category_for(n));
            }
        }
        match build_rules(locale, kind) {
            Some(rules) => {
                let category = category_name(rules.category_for(n));
                self.cache
                    .write()
                    .unwrap()
                    .insert((locale.to_string(), kind), rules);
                category
            }
            None => "other",
        }
    }
}

fn build_rules(locale: &str, kind: PluralRuleKind) -> Option<PluralRules> {
    // unparseable locales fall back to the root locale
    let locale: Locale = locale.parse().unwrap_or(Locale::UNKNOWN);
    let rule_type = match kind {
        PluralRuleKind::Cardinal => PluralRuleType::Cardinal,
        PluralRuleKind::Ordinal => PluralRuleType::Ordinal,
    };
    PluralRules::try_new(locale.into(), rule_type.into()).ok()
}

fn category_name(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}
