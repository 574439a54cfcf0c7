//! Client library for the Carson Living property platform API.
//!
//! [`CarsonAuth`] owns the JWT lifecycle: it logs in with username and
//! password, tracks the token's expiration, and re-logs in when a query is
//! rejected with 401.

pub mod client;
pub mod config;
pub mod error;

pub use client::{CarsonAuth, JwtToken, TokenPayload};
pub use config::ApiConfig;
pub use error::{ApiError, ConfigError, Error, Result};
pub use reqwest::Method;
