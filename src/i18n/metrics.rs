//! Resolution metrics.
//!
//! Counts how requests got their language, and how often a client-supplied
//! abbreviation was unknown and the default bundle was served instead.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::LanguageSource;

/// Lock-free resolution counters, owned by a `Localization` instance.
#[derive(Debug, Default)]
pub struct ResolutionMetrics {
    /// Resolutions decided by the authenticated user's profile
    user: AtomicUsize,

    /// Resolutions decided by the query-string parameter
    query: AtomicUsize,

    /// Resolutions decided by the language cookie
    cookie: AtomicUsize,

    /// Resolutions decided by `Accept-Language` negotiation
    accept_language: AtomicUsize,

    /// Resolutions where no signal matched
    default: AtomicUsize,

    /// Resolutions where the chosen abbreviation was unknown
    fallbacks: AtomicUsize,
}

impl ResolutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one resolution.
    ///
    /// `fell_back` is set when the abbreviation picked from `source` is not
    /// loaded and the default bundle was served.
    pub fn record(&self, source: LanguageSource, fell_back: bool) {
        let counter = match source {
            LanguageSource::User => &self.user,
            LanguageSource::Query => &self.query,
            LanguageSource::Cookie => &self.cookie,
            LanguageSource::AcceptLanguage => &self.accept_language,
            LanguageSource::Default => &self.default,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if fell_back {
            self.fallbacks.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Total number of recorded resolutions.
    pub fn total(&self) -> usize {
        [
            &self.user,
            &self.query,
            &self.cookie,
            &self.accept_language,
            &self.default,
        ]
        .iter()
        .map(|counter| counter.load(Ordering::Relaxed))
        .sum()
    }

    /// Number of resolutions that served the default bundle for an unknown code.
    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Snapshot the counters.
    pub fn report(&self) -> MetricsReport {
        let total = self.total();
        let fallbacks = self.fallbacks();
        let fallback_rate = if total > 0 {
            (fallbacks as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            total,
            user: self.user.load(Ordering::Relaxed),
            query: self.query.load(Ordering::Relaxed),
            cookie: self.cookie.load(Ordering::Relaxed),
            accept_language: self.accept_language.load(Ordering::Relaxed),
            default: self.default.load(Ordering::Relaxed),
            fallbacks,
            fallback_rate,
        }
    }
}

/// Point-in-time view of [`ResolutionMetrics`].
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub total: usize,
    pub user: usize,
    pub query: usize,
    pub cookie: usize,
    pub accept_language: usize,
    pub default: usize,
    pub fallbacks: usize,

    /// Share of resolutions that fell back, as a percentage (0-100)
    pub fallback_rate: f64,
}
