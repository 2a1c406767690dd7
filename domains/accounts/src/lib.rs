//! Accounts domain: credential storage and the session HTTP surface
//!
//! Owns the credential store boundary, the credential verifier, and the
//! login/refresh/logout/me route handlers.

pub mod handlers;
mod routes;
mod state;
mod store;
mod verifier;

pub use routes::routes;
pub use state::AccountsState;
pub use store::{CredentialRecord, CredentialStore, MemoryCredentialStore};
pub use verifier::{hash_password, verify_credentials};
