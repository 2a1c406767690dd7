//! Shared infrastructure for Pricewatch crates
//!
//! Provides the common error type used across route handlers and the
//! environment-driven application configuration.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};
