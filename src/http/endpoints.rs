use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use super::middleware::ResolvedLanguage;
use crate::config::I18nOptions;
use crate::error::I18nError;
use crate::i18n::{LanguageOption, Localization, ResourceBundle, Strings};

/// The three endpoint routes for the configured base path, in the order
/// bundle, strings, languages.
///
/// The base may not be the root (its bundle route would take `/` from the
/// host application) and may not contain path parameters or wildcards.
/// Hosts that define their own routes should check them against this list
/// before mounting, since overlapping routes cannot be merged.
pub fn endpoint_paths(options: &I18nOptions) -> Result<[String; 3], I18nError> {
    let base = options.normalized_endpoint_path();
    let invalid = |reason: &str| I18nError::InvalidEndpointPath {
        path: options.endpoint_path.clone(),
        reason: reason.to_string(),
    };

    if base.is_empty() {
        return Err(invalid("the endpoints cannot be mounted at the root"));
    }
    if base.contains(|c| matches!(c, ':' | '*' | '{' | '}')) {
        return Err(invalid("path parameters and wildcards are not allowed"));
    }

    Ok([
        base.clone(),
        format!("{}/strings", base),
        format!("{}/languages", base),
    ])
}

/// Fail with [`I18nError::InvalidEndpointPath`] when one of the endpoint
/// routes is already taken by the host application.
pub fn ensure_available(options: &I18nOptions, taken: &[&str]) -> Result<(), I18nError> {
    for path in endpoint_paths(options)? {
        if taken.contains(&path.as_str()) {
            return Err(I18nError::InvalidEndpointPath {
                path: options.endpoint_path.clone(),
                reason: format!("route {} already exists", path),
            });
        }
    }
    Ok(())
}

/// JSON endpoints under the configured (normalized) endpoint path:
///
/// - `GET <path>`: the request's resolved bundle
/// - `GET <path>/strings`: its strings only
/// - `GET <path>/languages`: every loaded language
pub fn routes<S>(localization: Arc<Localization>) -> Result<Router<S>, I18nError>
where
    S: Clone + Send + Sync + 'static,
{
    let [bundle, strings, all] = endpoint_paths(localization.options())?;

    Ok(Router::new()
        .route(&bundle, get(current_bundle))
        .route(&strings, get(current_strings))
        .route(&all, get(languages))
        .with_state(localization))
}

async fn current_bundle(resolved: ResolvedLanguage) -> Json<ResourceBundle> {
    Json(resolved.bundle.as_ref().clone())
}

async fn current_strings(resolved: ResolvedLanguage) -> Json<Strings> {
    Json(resolved.bundle.strings.clone())
}

async fn languages(State(localization): State<Arc<Localization>>) -> Json<Vec<LanguageOption>> {
    Json(localization.store().language_options())
}
