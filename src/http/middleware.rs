use axum::{
    async_trait,
    extract::{FromRequestParts, Query, Request, State},
    http::{
        header::{ACCEPT_LANGUAGE, SET_COOKIE},
        request::Parts,
    },
    middleware::{self, Next},
    response::Response,
    Router,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use super::cookie::{persistent_cookie, read_cookie};
use super::endpoints;
use crate::config::I18nOptions;
use crate::error::{ApiError, I18nError};
use crate::i18n::{LanguageSource, Localization, ResolutionContext, ResourceBundle};

/// Authenticated user, inserted into the request extensions by an upstream
/// authentication layer. An explicit `language` takes precedence over every
/// other signal.
#[derive(Debug, Clone, Default)]
pub struct AuthenticatedUser {
    pub language: Option<String>,
}

/// The bundle resolved for the current request.
#[derive(Debug, Clone)]
pub struct ResolvedLanguage {
    pub bundle: Arc<ResourceBundle>,
    pub source: LanguageSource,
}

impl ResolvedLanguage {
    pub fn lang(&self) -> &str {
        &self.bundle.lang
    }

    /// Look up a string, returning the key itself when it is missing.
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.bundle.get(key).unwrap_or(key)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ResolvedLanguage
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ResolvedLanguage>()
            .cloned()
            .ok_or(ApiError::ResolverNotMounted)
    }
}

/// Collect the language signals carried by a request.
pub fn resolution_context(request: &Request, options: &I18nOptions) -> ResolutionContext {
    let user_language = request
        .extensions()
        .get::<AuthenticatedUser>()
        .and_then(|user| user.language.clone());

    // First occurrence wins on repeated keys
    let query = Query::<Vec<(String, String)>>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(params)| {
            params
                .into_iter()
                .find(|(key, _)| *key == options.query_string_key)
                .map(|(_, value)| value)
        });

    let cookie = read_cookie(request.headers(), &options.lang_cookie);

    let accept_language = request
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    ResolutionContext {
        user_language,
        query,
        cookie,
        accept_language,
    }
}

/// Language resolution middleware.
///
/// Attaches a [`ResolvedLanguage`] to the request and, when the language was
/// chosen through the query string, persists it in the language cookie.
pub async fn resolve_language(
    State(localization): State<Arc<Localization>>,
    mut request: Request,
    next: Next,
) -> Response {
    let options = localization.options();
    let ctx = resolution_context(&request, options);
    let resolution = localization.resolve(&ctx);

    request.extensions_mut().insert(ResolvedLanguage {
        bundle: resolution.bundle,
        source: resolution.source,
    });

    let mut response = next.run(request).await;

    if let Some(lang) = resolution.persist {
        match persistent_cookie(&options.lang_cookie, &lang, Utc::now()) {
            Some(cookie) => {
                response.headers_mut().append(SET_COOKIE, cookie);
            }
            None => debug!("Not persisting language '{}': invalid cookie value", lang),
        }
    }

    response
}

/// Mount the i18n endpoints (when enabled) on `router` and layer the
/// resolution middleware over all of its routes.
///
/// Fails when the configured endpoint path is unusable. Routes already
/// defined on `router` are not visible here; check them with
/// [`endpoints::ensure_available`] first.
pub fn mount<S>(router: Router<S>, localization: Arc<Localization>) -> Result<Router<S>, I18nError>
where
    S: Clone + Send + Sync + 'static,
{
    let router = if localization.options().endpoint_enabled {
        router.merge(endpoints::routes(Arc::clone(&localization))?)
    } else {
        router
    };

    Ok(router.layer(middleware::from_fn_with_state(localization, resolve_language)))
}
