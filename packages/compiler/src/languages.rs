//! Known Language Codes
//!
//! Primary language subtags with plural and selectordinal rule coverage.
//! The dictionary normalizer uses this table to detect which axis of a
//! nested translation file is the language axis.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Languages with plural and selectordinal support.
pub const AVAILABLE_LANGUAGES: &[&str] = &[
    "af", "am", "an", "ar", "as", "ast", "az", "bal", "be", "bg", "bn", "bs", "ca", "ce", "cs",
    "cy", "da", "de", "dsb", "el", "en", "es", "et", "eu", "fa", "fi", "fil", "fr", "fy", "ga",
    "gd", "gl", "gsw", "gu", "he", "hi", "hr", "hsb", "hu", "hy", "ia", "id", "is", "it", "ja",
    "ka", "kk", "km", "kn", "ko", "kw", "ky", "lij", "lo", "lt", "lv", "mk", "ml", "mn", "mo",
    "mr", "ms", "my", "nb", "ne", "nl", "no", "or", "pa", "pl", "prg", "ps", "pt", "ro", "ru",
    "sc", "scn", "sd", "sh", "si", "sk", "sl", "sq", "sr", "sv", "sw", "ta", "te", "th", "tk",
    "tl", "tpi", "tr", "uk", "und", "ur", "uz", "vec", "vi", "yue", "zh", "zu",
];

static LANGUAGE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| AVAILABLE_LANGUAGES.iter().copied().collect());

/// Whether `code`'s primary subtag (`en` of `en-GB`) is a known language.
pub fn is_known_language(code: &str) -> bool {
    let primary = code.split('-').next().unwrap_or(code);
    LANGUAGE_SET.contains(primary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_region_subtags() {
        assert!(is_known_language("en"));
        assert!(is_known_language("en-GB"));
        assert!(is_known_language("de-AT"));
    }

    #[test]
    fn rejects_non_languages() {
        assert!(!is_known_language("greeting"));
        assert!(!is_known_language("pageX"));
    }
}
