//! API endpoint settings

/// Carson Living API base URL (without version)
pub const DEFAULT_BASE_URL: &str = "https://api.carson.live/api";

/// API version the client speaks
pub const DEFAULT_API_VERSION: &str = "v1.4.0";

/// Per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Re-logins allowed per query when the server answers 401
pub const DEFAULT_RETRY_AUTH: u32 = 1;

/// Endpoint and retry settings supplied to the authenticator at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL up to (not including) the version segment
    pub base_url: String,

    /// Version path segment, e.g. `v1.4.0`
    pub api_version: String,

    pub timeout_secs: u64,

    pub retry_auth: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_auth: DEFAULT_RETRY_AUTH,
        }
    }
}

impl ApiConfig {
    /// Default settings, optionally pointed at another host (scheme + authority).
    ///
    /// The host gets the same `/api` prefix as the production server.
    pub fn with_host(host: Option<&str>) -> Self {
        match host {
            Some(host) => Self {
                base_url: format!("{}/api", host.trim_end_matches('/')),
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    /// Versioned API root, always ending in `/`
    pub fn api_url(&self) -> String {
        format!(
            "{}/{}/",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    pub fn login_url(&self) -> String {
        format!("{}auth/login/", self.api_url())
    }

    /// Absolute URLs pass through; anything else is relative to `api_url()`
    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", self.api_url(), url.trim_start_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = ApiConfig::default();
        assert_eq!(config.api_url(), "https://api.carson.live/api/v1.4.0/");
        assert_eq!(
            config.login_url(),
            "https://api.carson.live/api/v1.4.0/auth/login/"
        );
        assert_eq!(config.retry_auth, 1);
    }

    #[test]
    fn test_with_host() {
        let config = ApiConfig::with_host(Some("http://127.0.0.1:1234/"));
        assert_eq!(config.login_url(), "http://127.0.0.1:1234/api/v1.4.0/auth/login/");
        assert_eq!(ApiConfig::with_host(None), ApiConfig::default());
    }

    #[test]
    fn test_custom_version() {
        let config = ApiConfig {
            api_version: "/v2/".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(config.api_url(), "https://api.carson.live/api/v2/");
    }

    #[test]
    fn test_resolve() {
        let config = ApiConfig::default();
        assert_eq!(config.resolve("me/"), "https://api.carson.live/api/v1.4.0/me/");
        assert_eq!(config.resolve("/me/"), "https://api.carson.live/api/v1.4.0/me/");
        assert_eq!(
            config.resolve("https://other.example.com/x"),
            "https://other.example.com/x"
        );
    }
}
