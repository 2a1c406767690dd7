//! Client-side session lifecycle for the Pricewatch API
//!
//! Keeps a locally-held user profile and renews the access token before it
//! expires, so users are not asked to re-authenticate every 15 minutes.
//! The transport is a trait so tests can drive the lifecycle without a
//! server; a reqwest implementation is provided.

mod http;
mod session;
mod transport;

pub use http::HttpAuthTransport;
pub use session::{SessionManager, RENEWAL_LEEWAY_MS};
pub use transport::{AuthTransport, LoginData, MeData, RefreshData, TransportError};
