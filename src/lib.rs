//! Per-request language resolution for axum applications.
//!
//! Language resource files are loaded once at startup into an immutable
//! [`i18n::ResourceStore`]; the [`http::resolve_language`] middleware then
//! picks a bundle for every request and exposes it to handlers as
//! [`http::ResolvedLanguage`].

pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod i18n;
