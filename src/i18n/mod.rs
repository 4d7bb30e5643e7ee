//! Localization resources and per-request language resolution.
//!
//! # Architecture
//!
//! - `bundle`: Resource bundles and the gap-filling merge
//! - `store`: Immutable map of loaded bundles, built once at startup
//! - `negotiate`: `Accept-Language` parsing and matching
//! - `resolver`: Precedence chain picking a bundle for a request
//! - `coverage`: Load-time report of keys inherited from the default language
//! - `metrics`: Resolution counters
//!
//! # Example
//!
//! ```rust,ignore
//! use xp_i18n::config::I18nOptions;
//! use xp_i18n::i18n::{Localization, ResolutionContext};
//!
//! let localization = Localization::initialize(I18nOptions::default())?;
//!
//! let resolution = localization.resolve(&ResolutionContext {
//!     accept_language: Some("es-MX,es;q=0.9".to_string()),
//!     ..Default::default()
//! });
//! println!("{}", resolution.bundle.lang);
//! ```

mod bundle;
mod coverage;
mod metrics;
mod negotiate;
mod resolver;
mod store;

pub use bundle::{LanguageOption, ResourceBundle, Strings};
pub use coverage::CoverageReport;
pub use metrics::{MetricsReport, ResolutionMetrics};
pub use negotiate::{negotiate, parse_accept_language, LanguageRange};
pub use resolver::{
    resolve, LanguageSignal, LanguageSource, Localization, Resolution, ResolutionContext,
};
pub use store::ResourceStore;
