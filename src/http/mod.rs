//! axum integration: the resolution middleware and the JSON endpoints.

mod cookie;
mod endpoints;
mod middleware;

pub use cookie::{persistent_cookie, read_cookie, COOKIE_MAX_AGE_DAYS};
pub use endpoints::{endpoint_paths, ensure_available, routes};
pub use middleware::{
    mount, resolution_context, resolve_language, AuthenticatedUser, ResolvedLanguage,
};
