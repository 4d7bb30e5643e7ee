use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised while loading language resources or validating
/// resolution input.
///
/// Load errors are fatal: the resource map must be complete before any
/// request is served.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("Language directory {path} is not usable: {reason}")]
    InvalidDirectory { path: PathBuf, reason: String },

    #[error("Invalid language code '{0}'")]
    InvalidLanguageCode(String),

    #[error("Language file for '{lang}' not found at {path}")]
    MissingFile { lang: String, path: PathBuf },

    #[error("Language file {path} resolves outside of {dir}")]
    OutsideDirectory { path: PathBuf, dir: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Language file {path} is malformed: {what} must be a JSON object")]
    NotAnObject { path: PathBuf, what: &'static str },

    #[error("Invalid language signal: expected a string or a list of strings, got {0}")]
    InvalidSignal(String),

    #[error("Invalid i18n endpoint path '{path}': {reason}")]
    InvalidEndpointPath { path: String, reason: String },
}

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No resolved language on the request; is the i18n middleware mounted?")]
    ResolverNotMounted,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::ResolverNotMounted => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred",
            ),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "details": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
