//! JWT decoding
//!
//! Tokens are decoded without verifying the signature; the server is the only
//! party that can check it. We only need the claims, chiefly `exp`.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Decode base64url, tolerating trailing padding
fn base64_decode_url(input: &str) -> std::result::Result<Vec<u8>, String> {
    URL_SAFE_NO_PAD
        .decode(input.trim_end_matches('='))
        .map_err(|e| e.to_string())
}

/// Claims carried in a Carson token.
///
/// Only `exp` is typed; every other claim is kept verbatim, whatever its JSON
/// type, so the payload re-encodes to exactly what the token carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Expiration time (Unix epoch seconds)
    pub exp: i64,

    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl TokenPayload {
    /// Decode the payload segment of a JWT
    pub fn decode(segment: &str) -> Result<Self, ApiError> {
        let bytes = base64_decode_url(segment)
            .map_err(|e| ApiError::InvalidToken(format!("Failed to decode JWT payload: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidToken(format!("Failed to parse JWT payload: {}", e)))
    }

    /// A claim other than `exp`; `null` counts as absent
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name).filter(|value| !value.is_null())
    }

    pub fn user_id(&self) -> Option<&Value> {
        self.claim("user_id")
    }

    pub fn username(&self) -> Option<&Value> {
        self.claim("username")
    }

    pub fn email(&self) -> Option<&Value> {
        self.claim("email")
    }
}

/// An encoded JWT together with its decoded payload.
///
/// The two are only ever built together, so they cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct JwtToken {
    raw: String,
    payload: TokenPayload,
}

impl JwtToken {
    /// Parse an encoded token (header.payload.signature)
    pub fn parse(raw: impl Into<String>) -> Result<Self, ApiError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ApiError::InvalidToken("token is empty".to_string()));
        }

        let parts: Vec<&str> = raw.split('.').collect();
        if parts.len() != 3 {
            return Err(ApiError::InvalidToken(format!(
                "expected 3 dot-separated segments, found {}",
                parts.len()
            )));
        }

        let payload = TokenPayload::decode(parts[1])?;
        Ok(Self { raw, payload })
    }

    /// The encoded token string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn payload(&self) -> &TokenPayload {
        &self.payload
    }

    /// Expiration as Unix epoch seconds
    pub fn expiration(&self) -> i64 {
        self.payload.exp
    }

    /// Expiration as a UTC timestamp, if `exp` is in chrono's range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.payload.exp, 0)
    }

    /// A token is valid only while `exp` is strictly in the future
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.payload.exp <= now.timestamp()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
