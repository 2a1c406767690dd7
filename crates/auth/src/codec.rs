//! Signed token issuance and verification
//!
//! Two signing domains with distinct secrets: short-lived access tokens
//! authorize ordinary requests, long-lived refresh tokens only mint new
//! access tokens. Verification is stateless; all failure modes collapse
//! to `None`.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::Claims;
use crate::config::{AuthConfig, ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_SECS};
use crate::error::AuthError;
use crate::types::Role;

/// A freshly signed token plus its expiry in epoch milliseconds,
/// as returned to clients.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at_ms: i64,
}

/// Issues and verifies access and refresh tokens.
///
/// Router states expose this via `FromRef` so the session-gate extractors
/// can reach it:
/// ```ignore
/// impl FromRef<MyState> for TokenCodec {
///     fn from_ref(state: &MyState) -> Self {
///         state.codec.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct TokenCodec {
    config: AuthConfig,
}

impl TokenCodec {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Sign a short-lived access token (now + 15 minutes)
    pub fn issue_access_token(
        &self,
        sub: &str,
        username: &str,
        role: Role,
    ) -> Result<IssuedToken, AuthError> {
        self.issue(
            &self.config.access_secret,
            ACCESS_TOKEN_TTL_SECS,
            sub,
            username,
            role,
        )
    }

    /// Sign a long-lived refresh token (now + 7 days)
    pub fn issue_refresh_token(
        &self,
        sub: &str,
        username: &str,
        role: Role,
    ) -> Result<IssuedToken, AuthError> {
        self.issue(
            &self.config.refresh_secret,
            REFRESH_TOKEN_TTL_SECS,
            sub,
            username,
            role,
        )
    }

    /// Verify an access token; `None` on any failure
    pub fn verify_access_token(&self, token: &str) -> Option<Claims> {
        self.verify(token, &self.config.access_secret)
    }

    /// Verify a refresh token; `None` on any failure
    pub fn verify_refresh_token(&self, token: &str) -> Option<Claims> {
        self.verify(token, &self.config.refresh_secret)
    }

    fn issue(
        &self,
        secret: &str,
        ttl_secs: i64,
        sub: &str,
        username: &str,
        role: Role,
    ) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = now + Duration::seconds(ttl_secs);

        let claims = Claims {
            sub: sub.to_string(),
            username: username.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            AuthError::TokenIssueFailed
        })?;

        Ok(IssuedToken {
            token,
            expires_at_ms: expires_at.timestamp_millis(),
        })
    }

    fn verify(&self, token: &str, secret: &str) -> Option<Claims> {
        // Pin the algorithm: a token whose header names anything but HS256
        // is rejected before signature verification.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;

        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
            })
            .ok()?;

        // A token claiming to be issued in the future is invalid.
        if data.claims.iat > Utc::now().timestamp() {
            tracing::debug!(iat = data.claims.iat, "Token issued-at is in the future");
            return None;
        }

        Some(data.claims)
    }
}
