//! Configuration management for the Carson CLI

use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::client::{CarsonAuth, JwtToken};
use crate::error::{ConfigError, Result};

mod api;

pub use api::{
    ApiConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_RETRY_AUTH, DEFAULT_TIMEOUT_SECS,
};

/// Persisted CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Carson account username (email)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Last JWT obtained from the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Custom API host (scheme + authority) for development/testing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Default re-login budget for queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_auth: Option<u32>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".carson").join("config.yaml"))
    }

    /// Explicit path if given, otherwise the default location
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::default_path(),
        }
    }

    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Holds a password, keep it private
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// The cached token, if present and decodable
    pub fn cached_token(&self) -> Option<JwtToken> {
        let raw = self.token.as_deref()?;
        match JwtToken::parse(raw) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("Ignoring cached token: {}", e);
                None
            }
        }
    }

    /// Whether the cached token is missing, undecodable or past `exp`
    pub fn is_token_expired(&self) -> bool {
        self.cached_token().is_none_or(|token| token.is_expired())
    }

    /// Validate that credentials are present
    pub fn validate_auth(&self) -> Result<()> {
        if self.username.is_none() || self.password.is_none() {
            return Err(ConfigError::MissingCredentials.into());
        }
        Ok(())
    }

    /// Endpoint settings, with a runtime host override taking precedence
    pub fn api_config(&self, host_override: Option<&str>) -> ApiConfig {
        let mut api = ApiConfig::with_host(host_override.or(self.api_host.as_deref()));
        if let Some(version) = &self.api_version {
            api.api_version = version.clone();
        }
        if let Some(retry_auth) = self.retry_auth {
            api.retry_auth = retry_auth;
        }
        api
    }

    /// Build an authenticator from the stored credentials and cached token
    pub fn authenticator(&self, host_override: Option<&str>) -> Result<CarsonAuth> {
        let (Some(username), Some(password)) = (&self.username, &self.password) else {
            return Err(ConfigError::MissingCredentials.into());
        };

        let token = self.cached_token();
        CarsonAuth::with_config(
            username.as_str(),
            password.as_str(),
            token.as_ref().map(JwtToken::as_str),
            self.api_config(host_override),
        )
    }
}
