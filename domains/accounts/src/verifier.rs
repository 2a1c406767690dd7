//! Credential verification
//!
//! Passwords are hashed with argon2id and a per-user random salt (PHC
//! string format). Unknown usernames and wrong passwords produce the same
//! `None` result so responses never reveal whether an account exists.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use pricewatch_auth::UserProfile;
use pricewatch_common::{Error, Result};

use crate::store::CredentialStore;

/// Hash a plaintext password for storage
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal(format!("Password hashing failed: {e}")))
}

/// Check a username/password pair against the credential store.
///
/// Returns the matching public profile, or `None` for both unknown
/// username and wrong password. Read-only; failure is a normal outcome.
pub async fn verify_credentials(
    store: &dyn CredentialStore,
    username: &str,
    password: &str,
) -> Result<Option<UserProfile>> {
    let Some(record) = store.find_by_username(username).await? else {
        return Ok(None);
    };

    let parsed = match PasswordHash::new(&record.password_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            // A corrupt stored hash fails closed as a normal mismatch.
            tracing::error!(error = %e, username, "Stored password hash is not a valid PHC string");
            return Ok(None);
        }
    };

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
    {
        Ok(Some(record.profile()))
    } else {
        Ok(None)
    }
}
