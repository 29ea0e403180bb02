//! Session configuration.

use std::time::Duration;

use crate::ApiUrl;

/// Default request timeout.
/// 30s allows for slow list endpoints while failing fast enough for good UX.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Token endpoint used for login.
pub const DEFAULT_LOGIN_PATH: &str = "/api/token/";

/// Token endpoint used to exchange a refresh token for a new access token.
pub const DEFAULT_REFRESH_PATH: &str = "/api/token/refresh/";

/// Route the application navigates to when the session ends.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Settings for an authenticated session and its HTTP client.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use lexdesk_core::{ApiUrl, SessionConfig};
///
/// let config = SessionConfig::new(ApiUrl::new("https://practice.example.com").unwrap())
///     .with_timeout(Duration::from_secs(10))
///     .with_coalesce_refresh(false);
/// assert_eq!(config.refresh_path, "/api/token/refresh/");
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Backend base URL.
    pub api_url: ApiUrl,
    /// Per-request timeout applied by the HTTP client.
    pub timeout: Duration,
    /// Path of the login endpoint.
    pub login_path: String,
    /// Path of the token refresh endpoint.
    pub refresh_path: String,
    /// Route carried by login-required signals.
    pub login_route: String,
    /// Share one refresh between concurrent requests rejected with the same
    /// access token.
    pub coalesce_refresh: bool,
}

impl SessionConfig {
    pub fn new(api_url: ApiUrl) -> Self {
        Self {
            api_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            coalesce_refresh: true,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }

    pub fn with_coalesce_refresh(mut self, coalesce: bool) -> Self {
        self.coalesce_refresh = coalesce;
        self
    }

    /// Absolute URL of the login endpoint.
    pub fn login_url(&self) -> String {
        self.api_url.endpoint(&self.login_path)
    }

    /// Absolute URL of the refresh endpoint.
    pub fn refresh_url(&self) -> String {
        self.api_url.endpoint(&self.refresh_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::new(ApiUrl::new("http://localhost:8000").unwrap());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.login_route, "/login");
        assert!(config.coalesce_refresh);
        assert_eq!(config.login_url(), "http://localhost:8000/api/token/");
        assert_eq!(
            config.refresh_url(),
            "http://localhost:8000/api/token/refresh/"
        );
    }

    #[test]
    fn overrides() {
        let config = SessionConfig::new(ApiUrl::new("https://example.com/v1").unwrap())
            .with_refresh_path("/auth/refresh/")
            .with_login_route("/signin");
        assert_eq!(config.refresh_url(), "https://example.com/v1/auth/refresh/");
        assert_eq!(config.login_route, "/signin");
    }
}
