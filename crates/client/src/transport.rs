//! Transport boundary between the session manager and the auth endpoints

use async_trait::async_trait;
use serde::Deserialize;

use pricewatch_auth::UserProfile;

/// Transport-level failure
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),
}

/// Payload of a successful login
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user: UserProfile,
    pub access_token: String,
    /// Epoch millis
    pub access_token_expiry: i64,
    pub refresh_token: String,
    /// Epoch millis
    pub refresh_token_expiry: i64,
}

/// Payload of a successful token refresh
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshData {
    pub user: UserProfile,
    pub access_token: String,
    pub access_token_expiry: i64,
}

/// Payload of a successful "who am I" call
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeData {
    pub user: UserProfile,
    pub access_token_expiry: i64,
}

/// Calls into the auth endpoints. Implementations own token storage
/// (e.g. a cookie jar); the session manager never sees raw tokens.
#[async_trait]
pub trait AuthTransport: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginData, TransportError>;

    async fn refresh(&self) -> Result<RefreshData, TransportError>;

    async fn me(&self) -> Result<MeData, TransportError>;

    async fn logout(&self) -> Result<(), TransportError>;
}
