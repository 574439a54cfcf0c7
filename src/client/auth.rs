//! Carson Living authenticator
//!
//! Holds the account credentials and the current JWT, logs in when the token
//! is missing or expired, and re-logs in a bounded number of times when the
//! server rejects a query with 401.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;

use super::models::{LoginRequest, LoginResponse};
use super::token::{JwtToken, TokenPayload};
use crate::Method;
use crate::config::ApiConfig;
use crate::error::{ApiError, Result};

/// Authenticated client for the Carson Living API
pub struct CarsonAuth {
    http: HttpClient,
    config: ApiConfig,
    username: String,
    password: String,
    token: Option<JwtToken>,
}

impl std::fmt::Debug for CarsonAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarsonAuth")
            .field("config", &self.config)
            .field("username", &self.username)
            .field("token_expiration", &self.token_expiration_date())
            .finish_non_exhaustive()
    }
}

impl CarsonAuth {
    /// Create an authenticator against the production API.
    ///
    /// A pre-supplied `token` is decoded (not verified); an empty or malformed
    /// token fails with [`ApiError::InvalidToken`].
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        token: Option<&str>,
    ) -> Result<Self> {
        Self::with_config(username, password, token, ApiConfig::default())
    }

    /// Create an authenticator with explicit endpoint settings
    pub fn with_config(
        username: impl Into<String>,
        password: impl Into<String>,
        token: Option<&str>,
        config: ApiConfig,
    ) -> Result<Self> {
        let token = token.map(JwtToken::parse).transpose()?;

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            config,
            username: username.into(),
            password: password.into(),
            token,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The current encoded token
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(JwtToken::as_str)
    }

    /// Claims decoded from the current token
    pub fn token_payload(&self) -> Option<&TokenPayload> {
        self.token.as_ref().map(JwtToken::payload)
    }

    /// `exp` of the current token (Unix epoch seconds)
    pub fn token_expiration_date(&self) -> Option<i64> {
        self.token.as_ref().map(JwtToken::expiration)
    }

    pub fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.as_ref().and_then(JwtToken::expires_at)
    }

    /// True iff a token is present and has not expired yet
    pub fn valid_token(&self) -> bool {
        self.token.as_ref().is_some_and(|token| !token.is_expired())
    }

    /// Log in with the stored credentials and replace the current token.
    ///
    /// On any failure the previous token is left untouched.
    pub fn update_token(&mut self) -> Result<()> {
        let url = self.config.login_url();
        debug!("Logging in as {} at {}", self.username, url);

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest {
                username: &self.username,
                password: &self.password,
            })
            .send()
            .map_err(ApiError::from)?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized(body).into());
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let login: LoginResponse = serde_json::from_str(&body).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse login response: {}", e))
        })?;
        let token = JwtToken::parse(login.into_token())?;

        info!(
            "Obtained token for {} (expires at {})",
            self.username,
            token.expiration()
        );
        self.token = Some(token);
        Ok(())
    }

    /// Issue an authenticated request, re-logging in on 401.
    ///
    /// Logs in before every attempt that lacks a valid token. Each 401 response consumes
    /// one of `retry_auth` re-logins; once they are used up the last 401 is
    /// returned as [`ApiError::Status`]. Other non-2xx responses fail at once.
    /// `url` may be absolute or relative to the versioned API root.
    pub fn authenticated_query(
        &mut self,
        url: &str,
        method: Method,
        params: &[(&str, &str)],
        retry_auth: u32,
    ) -> Result<Response> {
        let url = self.config.resolve(url);
        let mut retries_left = retry_auth;

        loop {
            if !self.valid_token() {
                debug!("No valid token, logging in before {} {}", method, url);
                self.update_token()?;
            }

            let response = self.send(&method, &url, params)?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                if retries_left == 0 {
                    let body = response
                        .text()
                        .unwrap_or_else(|_| format!("Unexpected status code: {}", status));
                    return Err(ApiError::Status {
                        status: status.as_u16(),
                        body,
                    }
                    .into());
                }
                retries_left -= 1;
                warn!(
                    "{} {} rejected with 401, logging in again ({} retries left)",
                    method, url, retries_left
                );
                self.update_token()?;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .unwrap_or_else(|_| format!("Unexpected status code: {}", status));
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    body,
                }
                .into());
            }

            return Ok(response);
        }
    }

    /// [`Self::authenticated_query`] with the body deserialized as JSON
    pub fn authenticated_json<T: DeserializeOwned>(
        &mut self,
        url: &str,
        method: Method,
        params: &[(&str, &str)],
        retry_auth: u32,
    ) -> Result<T> {
        let response = self.authenticated_query(url, method, params, retry_auth)?;
        let data = response.json::<T>().map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;
        Ok(data)
    }

    fn send(&self, method: &Method, url: &str, params: &[(&str, &str)]) -> Result<Response> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| ApiError::InvalidToken("no token available".to_string()))?;

        let response = self
            .http
            .request(method.clone(), url)
            .query(params)
            .header(AUTHORIZATION, format!("JWT {}", token.as_str()))
            .send()
            .map_err(ApiError::from)?;

        Ok(response)
    }
}
