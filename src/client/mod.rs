//! Carson Living API client

pub mod auth;
pub mod models;
pub mod token;

pub use auth::CarsonAuth;
pub use token::{JwtToken, TokenPayload};
