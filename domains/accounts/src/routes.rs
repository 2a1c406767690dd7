//! Route definitions for the accounts domain API

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, users};
use crate::state::AccountsState;

/// Create session lifecycle routes
fn auth_routes() -> Router<AccountsState> {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
}

/// Create user management routes (role-gated)
fn user_routes() -> Router<AccountsState> {
    Router::new().route(
        "/api/users",
        get(users::list_users).post(users::create_user),
    )
}

/// Create all accounts domain API routes
pub fn routes() -> Router<AccountsState> {
    Router::new().merge(auth_routes()).merge(user_routes())
}
