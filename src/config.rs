use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// Options recognized by the localization resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nOptions {
    /// Abbreviation of the fallback language (e.g., "en")
    pub default_lang: String,

    /// Directory holding one `<lang>.json` file per language
    pub path: PathBuf,

    /// Languages to load; `None` loads every `*.json` file in `path`
    pub languages: Option<Vec<String>>,

    /// Query-string parameter carrying an explicit language choice
    pub query_string_key: String,

    /// Cookie persisting the language chosen through the query string
    pub lang_cookie: String,

    /// Whether the JSON endpoints are mounted
    pub endpoint_enabled: bool,

    /// Base path of the JSON endpoints
    pub endpoint_path: String,
}

impl Default for I18nOptions {
    fn default() -> Self {
        Self {
            default_lang: "en".to_string(),
            path: PathBuf::from("locales"),
            languages: None,
            query_string_key: "hl".to_string(),
            lang_cookie: "xp_i18n_lang".to_string(),
            endpoint_enabled: false,
            endpoint_path: "/i18n".to_string(),
        }
    }
}

impl I18nOptions {
    /// Endpoint base path with trailing slashes removed and a leading slash
    /// guaranteed. The root path normalizes to the empty string.
    pub fn normalized_endpoint_path(&self) -> String {
        let trimmed = self.endpoint_path.trim().trim_end_matches('/');
        if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Localization
    pub i18n: I18nOptions,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = I18nOptions::default();

        Ok(Self {
            i18n: I18nOptions {
                default_lang: std::env::var("I18N_DEFAULT_LANG")
                    .unwrap_or(defaults.default_lang),
                path: std::env::var("I18N_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.path),
                languages: std::env::var("I18N_LANGUAGES")
                    .ok()
                    .map(|v| parse_language_list(&v))
                    .filter(|langs| !langs.is_empty()),
                query_string_key: std::env::var("I18N_QUERY_KEY")
                    .unwrap_or(defaults.query_string_key),
                lang_cookie: std::env::var("I18N_LANG_COOKIE")
                    .unwrap_or(defaults.lang_cookie),
                endpoint_enabled: match std::env::var("I18N_ENDPOINT_ENABLED") {
                    Ok(v) => parse_bool(&v).context("Failed to parse I18N_ENDPOINT_ENABLED")?,
                    Err(_) => defaults.endpoint_enabled,
                },
                endpoint_path: std::env::var("I18N_ENDPOINT_PATH")
                    .unwrap_or(defaults.endpoint_path),
            },

            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Failed to parse PORT")?,
        })
    }
}

/// Split a comma-separated language list, dropping blanks.
fn parse_language_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("Invalid boolean value: '{}'", other),
    }
}
