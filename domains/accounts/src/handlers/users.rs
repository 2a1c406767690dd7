//! User management API handlers
//!
//! Implements:
//! - GET /api/users — List account profiles (admin and super_admin only)
//! - POST /api/users — Create an account (super_admin only)

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use pricewatch_auth::{AdminUser, Role, SuperAdminUser, UserProfile};
use pricewatch_common::{Error, Result};

use crate::state::AccountsState;
use crate::store::CredentialRecord;
use crate::verifier::hash_password;

/// Response shape for `GET /api/users`
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserProfile>,
}

/// Request body for `POST /api/users`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub staff_name: String,
    pub password: String,
    pub role: Role,
}

/// GET /api/users — List account profiles
pub async fn list_users(
    State(state): State<AccountsState>,
    AdminUser(claims): AdminUser,
) -> Result<Json<UsersResponse>> {
    tracing::debug!(requested_by = %claims.sub, "Listing user profiles");

    let users = state.store.list_profiles().await?;
    Ok(Json(UsersResponse { users }))
}

/// POST /api/users — Create an account.
///
/// Restricted to super_admin: an admin session receives 403. Duplicate
/// usernames are rejected by the store with a validation error.
pub async fn create_user(
    State(state): State<AccountsState>,
    SuperAdminUser(claims): SuperAdminUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    if body.username.is_empty() || body.password.is_empty() {
        return Err(Error::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let record = CredentialRecord::new(
        &body.username,
        &body.staff_name,
        hash_password(&body.password)?,
        body.role,
    );
    let profile = record.profile();
    state.store.insert(record).await?;

    tracing::info!(
        created_by = %claims.sub,
        username = %profile.username,
        role = %profile.role,
        "Account created"
    );

    Ok((StatusCode::CREATED, Json(profile)))
}
