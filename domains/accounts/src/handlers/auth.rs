//! Session lifecycle API handlers
//!
//! Implements:
//! - POST /api/auth/login — credential check behind the login throttle
//! - POST /api/auth/refresh — mint a new access token from the refresh cookie
//! - POST /api/auth/logout — clear both auth cookies
//! - GET /api/auth/me — identify the current session

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use pricewatch_auth::{
    clear_session_cookie, cookie_value, session_cookie, AuthError, AuthUser, UserProfile,
    ACCESS_COOKIE, ACCESS_TOKEN_TTL_SECS, REFRESH_COOKIE, REFRESH_TOKEN_TTL_SECS,
};
use pricewatch_common::{Error, Result};

use crate::state::AccountsState;
use crate::verifier::verify_credentials;

/// Remaining-attempt count at or below which the 401 body carries a warning
const LOW_ATTEMPT_WARNING_THRESHOLD: u32 = 2;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response shape for `POST /api/auth/login`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserProfile,
    pub access_token: String,
    /// Epoch millis
    pub access_token_expiry: i64,
    pub refresh_token: String,
    /// Epoch millis
    pub refresh_token_expiry: i64,
}

/// Response shape for `POST /api/auth/refresh`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub access_token_expiry: i64,
}

/// Response shape for `GET /api/auth/me`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: UserProfile,
    pub access_token_expiry: i64,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AccountsState>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<Response> {
    let (Some(username), Some(password)) = (body.username, body.password) else {
        return Err(Error::Validation(
            "Username and password are required".to_string(),
        ));
    };
    if username.is_empty() || password.is_empty() {
        return Err(Error::Validation(
            "Username and password are required".to_string(),
        ));
    }

    // Throttle before touching credentials so lockouts cost nothing.
    let throttle_key = format!("login:{}", client_ip(&headers));
    if !state.throttle.check_and_consume(&throttle_key) {
        let retry_after_secs = state.throttle.seconds_until_reset(&throttle_key);
        tracing::warn!(key = %throttle_key, retry_after_secs, "Login attempt throttled");
        return Ok(AuthError::Throttled { retry_after_secs }.into_response());
    }

    let Some(user) = verify_credentials(state.store.as_ref(), &username, &password).await? else {
        let remaining = state.throttle.remaining_attempts(&throttle_key);
        tracing::info!(username = %username, remaining, "Login failed");

        let mut body = json!({
            "error": {
                "code": "AUTHENTICATION_ERROR",
                "message": "Incorrect username or password",
            },
            "remainingAttempts": remaining,
        });
        if remaining <= LOW_ATTEMPT_WARNING_THRESHOLD {
            body["warning"] = json!(format!(
                "{remaining} login attempts remaining before temporary lockout"
            ));
        }
        return Ok((StatusCode::UNAUTHORIZED, Json(body)).into_response());
    };

    let access = state
        .codec
        .issue_access_token(&user.id, &user.username, user.role)?;
    let refresh = state
        .codec
        .issue_refresh_token(&user.id, &user.username, user.role)?;

    tracing::info!(user_id = %user.id, username = %user.username, "Login succeeded");

    let secure = state.codec.config().cookie_secure;
    let mut response = (
        StatusCode::OK,
        Json(LoginResponse {
            user,
            access_token: access.token.clone(),
            access_token_expiry: access.expires_at_ms,
            refresh_token: refresh.token.clone(),
            refresh_token_expiry: refresh.expires_at_ms,
        }),
    )
        .into_response();

    append_cookie(
        &mut response,
        session_cookie(ACCESS_COOKIE, &access.token, ACCESS_TOKEN_TTL_SECS, secure),
    )?;
    append_cookie(
        &mut response,
        session_cookie(
            REFRESH_COOKIE,
            &refresh.token,
            REFRESH_TOKEN_TTL_SECS,
            secure,
        ),
    )?;

    Ok(response)
}

/// POST /api/auth/refresh
///
/// The refresh token is only ever read from its cookie, never from the
/// Authorization header. Every failure collapses to 401.
pub async fn refresh(State(state): State<AccountsState>, headers: HeaderMap) -> Result<Response> {
    let token = cookie_value(&headers, REFRESH_COOKIE)
        .ok_or_else(|| Error::Authentication("Please sign in again".to_string()))?;

    let claims = state
        .codec
        .verify_refresh_token(&token)
        .ok_or_else(|| Error::Authentication("Please sign in again".to_string()))?;

    // Unknown subject also collapses to 401: no account-existence leak.
    let record = state
        .store
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| Error::Authentication("Please sign in again".to_string()))?;

    let user = record.profile();
    let access = state
        .codec
        .issue_access_token(&user.id, &user.username, user.role)?;

    tracing::debug!(user_id = %user.id, "Access token refreshed");

    let secure = state.codec.config().cookie_secure;
    let mut response = (
        StatusCode::OK,
        Json(RefreshResponse {
            user,
            access_token: access.token.clone(),
            access_token_expiry: access.expires_at_ms,
        }),
    )
        .into_response();

    append_cookie(
        &mut response,
        session_cookie(ACCESS_COOKIE, &access.token, ACCESS_TOKEN_TTL_SECS, secure),
    )?;

    Ok(response)
}

/// POST /api/auth/logout
///
/// Always 200; clears both cookies unconditionally. Verification is
/// stateless, so already-issued tokens stay valid until natural expiry.
pub async fn logout(State(state): State<AccountsState>) -> Result<Response> {
    let secure = state.codec.config().cookie_secure;

    let mut response = (
        StatusCode::OK,
        Json(json!({ "message": "Signed out" })),
    )
        .into_response();

    append_cookie(&mut response, clear_session_cookie(ACCESS_COOKIE, secure))?;
    append_cookie(&mut response, clear_session_cookie(REFRESH_COOKIE, secure))?;

    Ok(response)
}

/// GET /api/auth/me
///
/// Session gate with no role restriction; used by clients to restore a
/// session on startup.
pub async fn me(
    State(state): State<AccountsState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<MeResponse>> {
    let record = state
        .store
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        user: record.profile(),
        // The verified claim's expiry, not a fresh window.
        access_token_expiry: claims.exp * 1000,
    }))
}

/// Client IP for throttle keying, from common proxy headers.
///
/// Assumes a reverse proxy sets `x-forwarded-for` or `x-real-ip`. When
/// neither is present every direct client shares the `login:unknown`
/// bucket; deployments without a proxy should key on the socket address
/// instead.
fn client_ip(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}

fn append_cookie(
    response: &mut Response,
    cookie: std::result::Result<HeaderValue, axum::http::header::InvalidHeaderValue>,
) -> Result<()> {
    let value = cookie.map_err(|e| Error::Internal(format!("Failed to build cookie: {e}")))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}
