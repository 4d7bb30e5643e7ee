use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::I18nError;
use crate::http::{self, ResolvedLanguage};
use crate::i18n::Localization;

/// Routes served by the application itself.
const APP_ROUTES: &[&str] = &["/", "/health"];

pub fn create_router(localization: Arc<Localization>) -> Result<Router, I18nError> {
    if localization.options().endpoint_enabled {
        http::ensure_available(localization.options(), APP_ROUTES)?;
    }

    let router: Router = Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .with_state(Arc::clone(&localization));

    Ok(http::mount(router, localization)?.layer(TraceLayer::new_for_http()))
}

async fn hello(resolved: ResolvedLanguage) -> String {
    format!("{}\n", resolved.text("greeting"))
}

async fn health_check(State(localization): State<Arc<Localization>>) -> Json<serde_json::Value> {
    let store = localization.store();

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "default_language": store.default_lang(),
        "languages": store.languages(),
        "resolutions": localization.metrics().report(),
    }))
}
