//! Accounts domain state and auth integration

use std::sync::Arc;

use axum::extract::FromRef;

use pricewatch_auth::{LoginThrottle, TokenCodec};

use crate::store::CredentialStore;

/// Application state for the accounts domain
#[derive(Clone)]
pub struct AccountsState {
    pub store: Arc<dyn CredentialStore>,
    pub codec: TokenCodec,
    pub throttle: LoginThrottle,
}

impl FromRef<AccountsState> for TokenCodec {
    fn from_ref(state: &AccountsState) -> Self {
        state.codec.clone()
    }
}
