//! Resource bundles: the per-language string tables served to clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Localized strings keyed by message name.
///
/// A `BTreeMap` keeps key order stable, so identical bundles always
/// serialize to identical JSON.
pub type Strings = BTreeMap<String, Value>;

/// A language's resolved resource bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceBundle {
    /// Language abbreviation (e.g., "en", "es")
    pub lang: String,

    /// Display name of the language (e.g., "English", "Español")
    pub language: String,

    /// Localized strings, including any gaps filled from the default language
    pub strings: Strings,
}

impl ResourceBundle {
    /// Look up a string value by key.
    ///
    /// Returns `None` when the key is absent or its value is not a string.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).and_then(Value::as_str)
    }
}

/// On-disk shape of a `<lang>.json` file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ResourceFile {
    pub lang: Option<String>,
    pub language: Option<String>,
    pub strings: Strings,
}

/// Entry of the `/languages` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    /// Display name
    pub name: String,

    /// Language abbreviation
    pub value: String,
}

/// Fill gaps in `own` with the entries of `defaults`.
///
/// Keys present in `own` keep their value; keys only present in `defaults`
/// are copied over.
pub(crate) fn fill_gaps(defaults: &Strings, own: Strings) -> Strings {
    let mut merged = defaults.clone();
    merged.extend(own);
    merged
}
