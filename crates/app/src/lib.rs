//! Pricewatch application composition root
//!
//! Composes the accounts domain router with shared infrastructure routes.

use std::sync::Arc;

use axum::Router;

use pricewatch_accounts::{hash_password, AccountsState, CredentialRecord, CredentialStore};
use pricewatch_auth::{AuthConfig, LoginThrottle, Role, TokenCodec};
use pricewatch_common::Config;

/// Create the main application router with all routes and state
pub async fn create_app(
    config: Config,
    store: Arc<dyn CredentialStore>,
) -> Result<Router, anyhow::Error> {
    let auth_config = AuthConfig {
        access_secret: config.access_token_secret.clone(),
        refresh_secret: config.refresh_token_secret.clone(),
        cookie_secure: config.cookie_secure,
    };

    seed_admin_account(store.as_ref(), &config).await?;

    let throttle = LoginThrottle::new();
    // Detached: sweeps elapsed throttle entries for the process lifetime.
    let _sweeper = throttle.spawn_sweeper();

    let state = AccountsState {
        store,
        codec: TokenCodec::new(auth_config),
        throttle,
    };

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Pricewatch API v0.1.0" }),
        )
        .merge(pricewatch_accounts::routes().with_state(state));

    Ok(app)
}

/// Seed the configured super_admin account if it does not exist yet.
///
/// Boot-time equivalent of the original seeding flow, so a fresh
/// deployment has one account able to manage the rest.
async fn seed_admin_account(
    store: &dyn CredentialStore,
    config: &Config,
) -> Result<(), anyhow::Error> {
    if store
        .find_by_username(&config.seed_admin_username)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let record = CredentialRecord::new(
        &config.seed_admin_username,
        "Administrator",
        hash_password(&config.seed_admin_password)?,
        Role::SuperAdmin,
    );
    store.insert(record).await?;

    tracing::info!(username = %config.seed_admin_username, "Seeded super_admin account");
    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
