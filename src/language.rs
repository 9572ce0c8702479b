//! ISO-639-1 language codes.
//!
//! The configured `language` is validated once at setup time. It may hold a
//! single code (`"en"`) or a comma-separated list (`"en,de,fr"`); the first
//! entry is the provider's default language.

use crate::{Error, ErrorContext, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// The two-letter codes currently assigned by ISO 639-1 (withdrawn codes such
/// as `bh` excluded), sorted for binary search.
const ISO_639_1: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg",
    "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv",
    "cy", "da", "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi",
    "fj", "fo", "fr", "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr",
    "ht", "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja",
    "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw",
    "ky", "la", "lb", "lg", "li", "ln", "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml",
    "mn", "mr", "ms", "mt", "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv",
    "ny", "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm", "rn", "ro",
    "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr",
    "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr",
    "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi",
    "yo", "za", "zh", "zu",
];

/// A validated ISO-639-1 code, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse a single code. Surrounding whitespace and letter case are ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let code = raw.trim().to_ascii_lowercase();
        if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(invalid_language(
                raw,
                "expected a two-letter ISO-639-1 code such as \"en\"",
            ));
        }
        if ISO_639_1.binary_search(&code.as_str()).is_err() {
            return Err(invalid_language(raw, "not an assigned ISO-639-1 code"));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for LanguageCode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Non-empty, duplicate-free list of languages; the first one is the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageList {
    codes: Vec<LanguageCode>,
}

impl LanguageList {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "language must not be empty",
                ErrorContext::new()
                    .with_field_path("config.language")
                    .with_source("config_validator"),
            ));
        }
        let mut codes: Vec<LanguageCode> = Vec::new();
        for entry in raw.split(',') {
            let code = LanguageCode::parse(entry)?;
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        Ok(Self { codes })
    }

    pub fn default_language(&self) -> &LanguageCode {
        // parse() never yields an empty list
        &self.codes[0]
    }

    pub fn codes(&self) -> &[LanguageCode] {
        &self.codes
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c.as_str() == code)
    }

    /// Pick the language sent to the endpoint for a host-requested language.
    ///
    /// The host may ask with a region-qualified tag (`en-US`); only the primary
    /// subtag is matched. Anything unsupported falls back to the default.
    pub fn resolve(&self, requested: &str) -> &LanguageCode {
        let primary = requested
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.codes
            .iter()
            .find(|c| c.as_str() == primary)
            .unwrap_or_else(|| self.default_language())
    }
}

fn invalid_language(raw: &str, details: &str) -> Error {
    Error::configuration_with_context(
        format!("invalid language code '{}'", raw.trim()),
        ErrorContext::new()
            .with_field_path("config.language")
            .with_details(details)
            .with_source("config_validator"),
    )
}
