//! Reading the language cookie and building the `Set-Cookie` value that
//! persists a query-string choice.

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use chrono::{DateTime, Duration, Utc};

/// Lifetime of the persisted language cookie.
pub const COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Value of cookie `name` from the request's `Cookie` headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
}

/// Build `name=value; Path=/; Max-Age=...; Expires=...` valid for one year
/// from `now`.
///
/// Returns `None` when `value` contains characters that are not allowed in a
/// cookie value.
pub fn persistent_cookie(name: &str, value: &str, now: DateTime<Utc>) -> Option<HeaderValue> {
    if !value.bytes().all(is_cookie_octet) {
        return None;
    }

    let max_age = Duration::days(COOKIE_MAX_AGE_DAYS);
    let expires = (now + max_age).format("%a, %d %b %Y %H:%M:%S GMT");
    let cookie = format!(
        "{}={}; Path=/; Max-Age={}; Expires={}",
        name,
        value,
        max_age.num_seconds(),
        expires
    );

    HeaderValue::from_str(&cookie).ok()
}

/// RFC 6265 `cookie-octet`.
fn is_cookie_octet(byte: u8) -> bool {
    matches!(byte, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}
