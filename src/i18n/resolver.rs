//! Per-request language resolution.
//!
//! Precedence, first match wins:
//! 1. authenticated user's profile language
//! 2. query-string parameter (exactly 2 characters), persisted in a cookie
//! 3. language cookie
//! 4. `Accept-Language` negotiated against the loaded languages
//! 5. the default language
//!
//! Unknown abbreviations never fail a request; they resolve to the default
//! bundle.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::bundle::ResourceBundle;
use super::metrics::ResolutionMetrics;
use super::negotiate::{negotiate_ranges, parse_accept_language, LanguageRange};
use super::store::ResourceStore;
use crate::config::I18nOptions;
use crate::error::I18nError;

/// Where the resolved language came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageSource {
    User,
    Query,
    Cookie,
    AcceptLanguage,
    Default,
}

/// Input to the forgiving bundle lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LanguageSignal {
    /// A single abbreviation from the user profile, query string or cookie
    Abbreviation(String),

    /// A priority list from `Accept-Language`, most preferred first
    Preferences(Vec<LanguageRange>),
}

impl LanguageSignal {
    pub fn from_accept_language(header: &str) -> Self {
        LanguageSignal::Preferences(parse_accept_language(header))
    }
}

impl TryFrom<&Value> for LanguageSignal {
    type Error = I18nError;

    /// Accepts a string (single abbreviation) or an array of strings
    /// (priority list, equal weights in array order).
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(code) => Ok(LanguageSignal::Abbreviation(code.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(tag) => Ok(LanguageRange {
                        tag: tag.clone(),
                        quality: 1.0,
                    }),
                    other => Err(I18nError::InvalidSignal(format!(
                        "list containing {}",
                        json_kind(other)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(LanguageSignal::Preferences),
            other => Err(I18nError::InvalidSignal(json_kind(other).to_string())),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

impl ResourceStore {
    /// Forgiving lookup: abbreviations not loaded and priority lists with no
    /// usable entry both yield the default bundle.
    pub fn resolve(&self, signal: &LanguageSignal) -> &Arc<ResourceBundle> {
        match signal {
            LanguageSignal::Abbreviation(code) => self.get_or_default(code),
            LanguageSignal::Preferences(ranges) => negotiate_ranges(ranges, self.languages())
                .map(|code| self.get_or_default(code))
                .unwrap_or_else(|| self.default_bundle()),
        }
    }
}

/// Language signals carried by one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    /// Language on the authenticated user's profile
    pub user_language: Option<String>,

    /// Value of the configured query-string parameter
    pub query: Option<String>,

    /// Value of the configured language cookie
    pub cookie: Option<String>,

    /// Raw `Accept-Language` header
    pub accept_language: Option<String>,
}

/// Outcome of resolving one request.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub bundle: Arc<ResourceBundle>,
    pub source: LanguageSource,

    /// The abbreviation picked from `source` is not loaded; the default
    /// bundle is served instead
    pub fell_back: bool,

    /// Abbreviation to persist in the language cookie (query branch only)
    pub persist: Option<String>,
}

/// Pick the signal that decides the language, following the precedence chain.
fn select_signal(ctx: &ResolutionContext) -> (LanguageSignal, LanguageSource, Option<String>) {
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

    if let Some(lang) = non_empty(&ctx.user_language) {
        return (LanguageSignal::Abbreviation(lang), LanguageSource::User, None);
    }

    if let Some(lang) = ctx.query.clone().filter(|v| v.chars().count() == 2) {
        return (
            LanguageSignal::Abbreviation(lang.clone()),
            LanguageSource::Query,
            Some(lang),
        );
    }

    if let Some(lang) = non_empty(&ctx.cookie) {
        return (LanguageSignal::Abbreviation(lang), LanguageSource::Cookie, None);
    }

    match &ctx.accept_language {
        Some(header) => (
            LanguageSignal::from_accept_language(header),
            LanguageSource::AcceptLanguage,
            None,
        ),
        None => (
            LanguageSignal::Preferences(Vec::new()),
            LanguageSource::Default,
            None,
        ),
    }
}

/// Resolve a request's language against `store`.
///
/// Pure: the same context always yields the same bundle.
pub fn resolve(store: &ResourceStore, ctx: &ResolutionContext) -> Resolution {
    let (signal, mut source, persist) = select_signal(ctx);
    let bundle = Arc::clone(store.resolve(&signal));

    let fell_back = match &signal {
        LanguageSignal::Abbreviation(code) => !store.contains(code),
        LanguageSignal::Preferences(ranges) => {
            if negotiate_ranges(ranges, store.languages()).is_none() {
                source = LanguageSource::Default;
            }
            false
        }
    };

    Resolution {
        bundle,
        source,
        fell_back,
        persist,
    }
}

/// Loaded resources plus the options they were loaded with.
///
/// Built once at startup and shared (behind an `Arc`) by the middleware and
/// the endpoints.
#[derive(Debug)]
pub struct Localization {
    options: I18nOptions,
    store: ResourceStore,
    metrics: ResolutionMetrics,
}

impl Localization {
    /// Load every resource file named by `options`.
    pub fn initialize(options: I18nOptions) -> Result<Self, I18nError> {
        let store = ResourceStore::load(&options)?;
        Ok(Self::new(options, store))
    }

    pub fn new(options: I18nOptions, store: ResourceStore) -> Self {
        Self {
            options,
            store,
            metrics: ResolutionMetrics::new(),
        }
    }

    pub fn options(&self) -> &I18nOptions {
        &self.options
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn metrics(&self) -> &ResolutionMetrics {
        &self.metrics
    }

    /// Resolve a request's language and record it in the metrics.
    pub fn resolve(&self, ctx: &ResolutionContext) -> Resolution {
        let resolution = resolve(&self.store, ctx);
        self.metrics.record(resolution.source, resolution.fell_back);

        debug!(
            "Resolved language '{}' from {:?}{}",
            resolution.bundle.lang,
            resolution.source,
            if resolution.fell_back {
                " (unknown code, default served)"
            } else {
                ""
            }
        );

        resolution
    }
}
