//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Secret used to sign access tokens
    pub access_token_secret: String,

    /// Secret used to sign refresh tokens (must differ from the access secret)
    pub refresh_token_secret: String,

    /// Whether auth cookies carry the `Secure` attribute.
    /// Disabled for local development over plain HTTP.
    pub cookie_secure: bool,

    /// Credentials for the seeded super_admin account
    pub seed_admin_username: String,
    pub seed_admin_password: String,

    /// Runtime configuration
    pub log_level: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let access_token_secret = env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("ACCESS_TOKEN_SECRET is required"))?;
        let refresh_token_secret = env::var("REFRESH_TOKEN_SECRET")
            .map_err(|_| anyhow::anyhow!("REFRESH_TOKEN_SECRET is required"))?;

        // The two signing domains must never collapse into one.
        if access_token_secret == refresh_token_secret {
            anyhow::bail!("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ");
        }

        let config = Self {
            access_token_secret,
            refresh_token_secret,

            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),

            seed_admin_username: env::var("SEED_ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
            seed_admin_password: env::var("SEED_ADMIN_PASSWORD")
                .map_err(|_| anyhow::anyhow!("SEED_ADMIN_PASSWORD is required"))?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}
