//! Auth cookie construction and parsing

use axum::http::{header::InvalidHeaderValue, HeaderMap, HeaderValue};

/// Cookie carrying the access token (max-age 900s)
pub const ACCESS_COOKIE: &str = "accessToken";

/// Cookie carrying the refresh token (max-age 604800s)
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Build a `Set-Cookie` value for a session token.
///
/// Always `HttpOnly; SameSite=Strict; Path=/`; `Secure` is appended only
/// when the deployment serves HTTPS (disabled for local development).
pub fn session_cookie(
    name: &str,
    token: &str,
    max_age_secs: i64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie =
        format!("{name}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build a `Set-Cookie` value that clears a session cookie (max-age 0)
pub fn clear_session_cookie(name: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    session_cookie(name, "", 0, secure)
}

/// Extract a named cookie value from the request `Cookie` header
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}
