//! Session & access-control subsystem for the Pricewatch API
//!
//! Provides the token codec (signed access/refresh tokens), the session
//! gate (axum extractors with role allow-lists), the login throttle, and
//! cookie helpers. Works with any router state implementing
//! `FromRef<S>` for `TokenCodec`.

mod claims;
mod codec;
mod config;
mod cookies;
mod error;
mod gate;
mod throttle;
mod types;

pub use claims::Claims;
pub use codec::{IssuedToken, TokenCodec};
pub use config::{AuthConfig, ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_SECS};
pub use cookies::{
    clear_session_cookie, cookie_value, session_cookie, ACCESS_COOKIE, REFRESH_COOKIE,
};
pub use error::AuthError;
pub use gate::{authorize, AdminUser, AuthUser, SuperAdminUser};
pub use throttle::LoginThrottle;
pub use types::{Role, UserProfile};
