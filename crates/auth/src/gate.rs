//! Session gate: request authentication and role enforcement
//!
//! Axum extractors generic over any state `S` where `TokenCodec: FromRef<S>`
//! (axum's idiomatic nested-state pattern). The candidate token is taken
//! from the `Authorization` bearer header first, then the `accessToken`
//! cookie.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::claims::Claims;
use crate::codec::TokenCodec;
use crate::cookies::{cookie_value, ACCESS_COOKIE};
use crate::error::AuthError;
use crate::types::Role;

/// Extract a bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.trim().strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Locate the candidate access token: header first, cookie fallback
fn find_access_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_value(headers, ACCESS_COOKIE))
}

/// Authenticate a request and enforce a role allow-list.
///
/// Pure function of (headers, allow-list): no token or a failed
/// verification yields `MissingToken`/`InvalidToken` (both render as 401);
/// a verified token whose role is outside a non-empty allow-list yields
/// `Forbidden` (403). An empty allow-list admits every verified session.
pub fn authorize(
    codec: &TokenCodec,
    headers: &HeaderMap,
    allow: &[Role],
) -> Result<Claims, AuthError> {
    let token = find_access_token(headers).ok_or(AuthError::MissingToken)?;
    let claims = codec
        .verify_access_token(&token)
        .ok_or(AuthError::InvalidToken)?;

    if !allow.is_empty() && !allow.contains(&claims.role) {
        tracing::debug!(role = %claims.role, "Role not in allow-list");
        return Err(AuthError::Forbidden);
    }

    Ok(claims)
}

/// Authenticated session extractor (any role)
#[derive(Debug)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    TokenCodec: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let codec = TokenCodec::from_ref(state);
        let claims = authorize(&codec, &parts.headers, &[])?;
        Ok(AuthUser(claims))
    }
}

/// Authenticated session restricted to admin or super_admin.
///
/// Rejects authenticated non-admin sessions with 403 FORBIDDEN, distinct
/// from the 401 an unauthenticated request receives.
#[derive(Debug)]
pub struct AdminUser(pub Claims);

impl<S> FromRequestParts<S> for AdminUser
where
    TokenCodec: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let codec = TokenCodec::from_ref(state);
        let claims = authorize(&codec, &parts.headers, &[Role::SuperAdmin, Role::Admin])?;
        Ok(AdminUser(claims))
    }
}

/// Authenticated session restricted to super_admin
#[derive(Debug)]
pub struct SuperAdminUser(pub Claims);

impl<S> FromRequestParts<S> for SuperAdminUser
where
    TokenCodec: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let codec = TokenCodec::from_ref(state);
        let claims = authorize(&codec, &parts.headers, &[Role::SuperAdmin])?;
        Ok(SuperAdminUser(claims))
    }
}
