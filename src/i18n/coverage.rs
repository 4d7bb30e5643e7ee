//! Coverage of a language's own strings relative to the default language.
//!
//! Computed at load time, before gaps are filled, so operators can see which
//! keys each language inherits from the default.

use super::bundle::Strings;

/// Key coverage for one non-default language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    /// Language abbreviation
    pub lang: String,

    /// Default keys the language file does not define (filled from the default)
    pub inherited: Vec<String>,

    /// Keys the language defines that the default language does not
    pub extra: Vec<String>,
}

impl CoverageReport {
    /// Compare a language's own strings with the default language's strings.
    pub fn compare(lang: &str, defaults: &Strings, own: &Strings) -> Self {
        Self {
            lang: lang.to_string(),
            inherited: defaults
                .keys()
                .filter(|key| !own.contains_key(*key))
                .cloned()
                .collect(),
            extra: own
                .keys()
                .filter(|key| !defaults.contains_key(*key))
                .cloned()
                .collect(),
        }
    }

    /// Check if the language defines every default key and nothing else
    pub fn is_complete(&self) -> bool {
        self.inherited.is_empty() && self.extra.is_empty()
    }
}
