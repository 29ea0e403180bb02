//! Bare HTTP client for the backend.
//!
//! Nothing here retries or touches the token store. The session layer
//! decides which token to send and what to do with a `401`.

use reqwest::{Method, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use lexdesk_core::error::{Error, ProtocolError, TransportError};
use lexdesk_core::{AccessToken, Credentials, RefreshToken, Result, SessionConfig};

use crate::endpoints::{LoginRequest, RefreshRequest, RefreshResponse, TokenResponse};

/// Map a reqwest failure onto the lexdesk error taxonomy.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    if err.is_decode() {
        Error::Decode {
            message: err.to_string(),
        }
    } else if err.is_timeout() {
        Error::Transport(TransportError::Timeout)
    } else if err.is_connect() {
        Error::Transport(TransportError::Connection {
            message: err.to_string(),
        })
    } else {
        Error::Transport(TransportError::Http {
            message: err.to_string(),
        })
    }
}

/// HTTP client for the backend REST API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: SessionConfig,
}

impl ApiClient {
    /// Create a new client from the session configuration.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lexdesk/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(transport_error)?;

        Ok(Self { client, config })
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Exchange credentials for a token pair.
    #[instrument(skip_all, fields(api = %self.config.api_url, username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        let url = self.config.login_url();
        debug!(%url, "Login request");

        let request = LoginRequest {
            username: credentials.username(),
            password: credentials.password(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// This is a bare call: it never goes through the authenticated request
    /// protocol, so a rejected refresh cannot trigger another refresh.
    #[instrument(skip_all, fields(api = %self.config.api_url))]
    pub async fn refresh(&self, refresh_token: &RefreshToken) -> Result<RefreshResponse> {
        let url = self.config.refresh_url();
        debug!(%url, "Refresh request");

        let request = RefreshRequest {
            refresh: refresh_token.as_str(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Send one protected request with the given access token.
    ///
    /// An empty success body decodes as JSON `null`, so `()` and
    /// `serde_json::Value` work for `204 No Content` responses.
    #[instrument(skip(self, body, token), fields(api = %self.config.api_url))]
    pub async fn send<B, R>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        token: &AccessToken,
    ) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        debug!(%method, "Authenticated request");

        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(token.as_str());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Handle a response, decoding the body or building a protocol error.
    async fn handle_response<R: DeserializeOwned>(&self, response: Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "Response");

        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(ProtocolError::from_body(status.as_u16(), &body).into());
        }

        let body = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(body).map_err(|e| Error::Decode {
            message: e.to_string(),
        })
    }
}
