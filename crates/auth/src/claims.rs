//! Token claims types

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Identity claim set embedded in every signed token.
///
/// All fields are required; a token missing any of them fails
/// deserialization and is treated as invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Username at issuance time
    pub username: String,
    /// Role at issuance time
    pub role: Role,
    /// Issued at (epoch seconds)
    pub iat: i64,
    /// Expires at (epoch seconds)
    pub exp: i64,
}
