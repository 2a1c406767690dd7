//! Authentication configuration

/// Access token lifetime: 15 minutes
pub const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Refresh token lifetime: 7 days
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Authentication configuration.
///
/// The two secrets establish separate signing domains: a token signed in
/// one domain never verifies in the other.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    /// Whether auth cookies carry the `Secure` attribute
    pub cookie_secure: bool,
}
