//! Authenticated session: bearer tokens with one-shot refresh-and-retry.

use std::future::Future;
use std::sync::Arc;

use reqwest::Method;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use lexdesk_core::error::{AuthError, Error};
use lexdesk_core::{
    AccessToken, Credentials, LoginReason, LoginRequired, RefreshToken, Resource, Result,
    SessionConfig, SessionListener, TokenStore, TracingListener,
};

use crate::client::ApiClient;
use crate::endpoints::ListResponse;

/// A session against the backend, bound to a token store.
///
/// All protected calls flow through
/// [`perform_authenticated_request`](Self::perform_authenticated_request).
///
/// # Thread Safety
///
/// Sessions are cheap to clone (they use internal `Arc`) and are safe to
/// share across tasks. Concurrent refreshes are coalesced unless
/// [`SessionConfig::coalesce_refresh`] is turned off.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: ApiClient,
    store: Arc<dyn TokenStore>,
    listener: Arc<dyn SessionListener>,
    refresh_guard: Mutex<()>,
}

impl Session {
    /// Create a session that reports login-required events to the log.
    pub fn new(config: SessionConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        Self::with_listener(config, store, Arc::new(TracingListener))
    }

    /// Create a session with a custom login-required listener.
    pub fn with_listener(
        config: SessionConfig,
        store: Arc<dyn TokenStore>,
        listener: Arc<dyn SessionListener>,
    ) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(SessionInner {
                client: ApiClient::new(config)?,
                store,
                listener,
                refresh_guard: Mutex::new(()),
            }),
        })
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        self.inner.client.config()
    }

    /// Returns the token store backing this session.
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    /// Returns true if tokens are stored.
    pub fn is_logged_in(&self) -> Result<bool> {
        self.inner.store.has_session()
    }

    /// Authenticate with the backend and store the returned token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if the backend rejects the
    /// credentials with `400` or `401`.
    #[instrument(skip_all, fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        info!("Logging in");

        let response = self
            .inner
            .client
            .login(credentials)
            .await
            .map_err(|err| match err {
                Error::Protocol(ref protocol) if matches!(protocol.status, 400 | 401) => {
                    AuthError::InvalidCredentials(
                        protocol
                            .detail
                            .clone()
                            .unwrap_or_else(|| format!("HTTP {}", protocol.status)),
                    )
                    .into()
                }
                other => other,
            })?;

        self.inner.store.set_tokens(
            AccessToken::new(response.access),
            Some(RefreshToken::new(response.refresh)),
        )?;

        debug!("Session created successfully");
        Ok(())
    }

    /// Forget the stored session.
    ///
    /// No login-required signal is emitted: the user asked for this.
    #[instrument(skip_all)]
    pub fn logout(&self) -> Result<()> {
        info!("Logging out");
        self.inner.store.clear_tokens()
    }

    /// Run one protected operation with bearer authentication.
    ///
    /// `operation` performs a single HTTP call with the access token it is
    /// given. It is invoked once; if that fails with HTTP 401, the session is
    /// refreshed once and `operation` is invoked once more with the new token.
    /// The second outcome is final. Any other error is returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Unauthenticated`] if no access token is stored. The
    ///   operation is not invoked.
    /// - [`AuthError::SessionExpired`] if the refresh failed. The operation is
    ///   not invoked again and both tokens are cleared.
    /// - The operation's own error otherwise.
    #[instrument(skip_all)]
    pub async fn perform_authenticated_request<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn(AccessToken) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(access) = self.inner.store.access_token()? else {
            return Err(self.login_required(LoginReason::Unauthenticated));
        };

        match operation(access.clone()).await {
            Err(err) if err.is_unauthorized() => {
                debug!(error = %err, "Access token rejected");
                let fresh = self.refresh_after_rejection(&access).await?;
                operation(fresh).await
            }
            result => result,
        }
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// The new access token is always stored; the refresh token is replaced
    /// only if the backend rotated it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SessionExpired`] if no refresh token is stored or
    /// the backend rejects it. Both tokens are cleared in that case.
    pub async fn refresh_session(&self) -> Result<()> {
        let _guard = self.inner.refresh_guard.lock().await;
        self.refresh_tokens().await.map(|_| ())
    }

    /// Refresh after `rejected` was answered with 401.
    ///
    /// With coalescing, a caller that waited on another refresh reuses its
    /// result instead of spending the refresh token again.
    async fn refresh_after_rejection(&self, rejected: &AccessToken) -> Result<AccessToken> {
        if !self.config().coalesce_refresh {
            return self.refresh_tokens().await;
        }

        let _guard = self.inner.refresh_guard.lock().await;
        match self.inner.store.access_token()? {
            Some(current) if current != *rejected => {
                debug!("Access token already refreshed by a concurrent request");
                Ok(current)
            }
            Some(_) => self.refresh_tokens().await,
            None => {
                debug!("Session already ended by a concurrent refresh");
                Err(AuthError::SessionExpired.into())
            }
        }
    }

    #[instrument(skip_all)]
    async fn refresh_tokens(&self) -> Result<AccessToken> {
        info!("Refreshing session");

        let Some(refresh_token) = self.inner.store.refresh_token()? else {
            warn!("No refresh token stored");
            return Err(self.login_required(LoginReason::SessionExpired));
        };

        let response = match self.inner.client.refresh(&refresh_token).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Token refresh failed");
                return Err(self.login_required(LoginReason::SessionExpired));
            }
        };

        let access = AccessToken::new(response.access);
        let rotated = response.refresh.map(RefreshToken::new);
        debug!(rotated = rotated.is_some(), "Storing refreshed tokens");

        self.inner.store.set_tokens(access.clone(), rotated)?;

        debug!("Session refreshed successfully");
        Ok(access)
    }

    /// End the session: clear tokens when it expired, signal the listener,
    /// and return the matching error.
    fn login_required(&self, reason: LoginReason) -> Error {
        if reason == LoginReason::SessionExpired
            && let Err(err) = self.inner.store.clear_tokens()
        {
            warn!(error = %err, "Failed to clear tokens");
        }

        let event = LoginRequired::new(reason, self.config().login_route.clone());
        self.inner.listener.login_required(&event);

        match reason {
            LoginReason::Unauthenticated => AuthError::Unauthenticated.into(),
            LoginReason::SessionExpired => AuthError::SessionExpired.into(),
        }
    }

    // ========================================================================
    // Resource Operations
    // ========================================================================

    /// Send one protected request through the refresh-and-retry protocol.
    async fn send_authed<B, R>(&self, method: Method, url: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let client = &self.inner.client;
        self.perform_authenticated_request(move |token| {
            let method = method.clone();
            async move { client.send(method, url, body, &token).await }
        })
        .await
    }

    /// Fetch every item of a collection (`GET /api/<resource>/`).
    ///
    /// Both bare arrays and paginated `{"results": [...]}` pages are accepted.
    #[instrument(skip_all, fields(%resource))]
    pub async fn list<T: DeserializeOwned>(&self, resource: &Resource) -> Result<Vec<T>> {
        let url = self.config().api_url.resource_url(resource, None)?;
        let response: ListResponse<T> = self.send_authed::<(), _>(Method::GET, &url, None).await?;
        Ok(response.into_items())
    }

    /// Fetch one item (`GET /api/<resource>/<id>/`).
    #[instrument(skip_all, fields(%resource, %id))]
    pub async fn get<T: DeserializeOwned>(&self, resource: &Resource, id: &str) -> Result<T> {
        let url = self.config().api_url.resource_url(resource, Some(id))?;
        self.send_authed::<(), _>(Method::GET, &url, None).await
    }

    /// Create an item (`POST /api/<resource>/`).
    #[instrument(skip_all, fields(%resource))]
    pub async fn create<B, T>(&self, resource: &Resource, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.config().api_url.resource_url(resource, None)?;
        self.send_authed(Method::POST, &url, Some(body)).await
    }

    /// Replace an item (`PUT /api/<resource>/<id>/`).
    #[instrument(skip_all, fields(%resource, %id))]
    pub async fn update<B, T>(&self, resource: &Resource, id: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.config().api_url.resource_url(resource, Some(id))?;
        self.send_authed(Method::PUT, &url, Some(body)).await
    }

    /// Update some fields of an item (`PATCH /api/<resource>/<id>/`).
    #[instrument(skip_all, fields(%resource, %id))]
    pub async fn partial_update<B, T>(&self, resource: &Resource, id: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.config().api_url.resource_url(resource, Some(id))?;
        self.send_authed(Method::PATCH, &url, Some(body)).await
    }

    /// Delete an item (`DELETE /api/<resource>/<id>/`). Any response body is ignored.
    #[instrument(skip_all, fields(%resource, %id))]
    pub async fn delete(&self, resource: &Resource, id: &str) -> Result<()> {
        let url = self.config().api_url.resource_url(resource, Some(id))?;
        let _: IgnoredAny = self.send_authed::<(), _>(Method::DELETE, &url, None).await?;
        Ok(())
    }

    /// Send an arbitrary protected request to a path below the API base URL.
    #[instrument(skip(self, body))]
    pub async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let url = self.config().api_url.endpoint(path);
        self.send_authed(method, &url, body).await
    }
}

// Custom Debug impl that hides sensitive data
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("api", &self.config().api_url)
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}
