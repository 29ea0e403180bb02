//! Token store trait.

use crate::{AccessToken, RefreshToken, Result, TokenPair};

/// Persisted session state: the access token and refresh token pair.
///
/// Every protected request reads the store; only login and the refresh
/// procedure write it. Implementations must keep the two tokens together:
/// both present or both absent.
///
/// Methods are synchronous. Writes are rare and small, and readers only
/// need a consistent snapshot, not a lock held across a request.
pub trait TokenStore: Send + Sync {
    /// Read both tokens, or `None` when no session is stored.
    fn load(&self) -> Result<Option<TokenPair>>;

    /// Store a new access token and, when given, a new refresh token.
    ///
    /// With `refresh = None` the stored refresh token is kept. That is only
    /// valid when one exists; otherwise this fails with
    /// [`StorageError::MissingRefreshToken`](crate::error::StorageError::MissingRefreshToken).
    fn set_tokens(&self, access: AccessToken, refresh: Option<RefreshToken>) -> Result<()>;

    /// Remove both tokens. Clearing an empty store succeeds.
    fn clear_tokens(&self) -> Result<()>;

    /// Returns the stored access token.
    fn access_token(&self) -> Result<Option<AccessToken>> {
        Ok(self.load()?.map(|pair| pair.access))
    }

    /// Returns the stored refresh token.
    fn refresh_token(&self) -> Result<Option<RefreshToken>> {
        Ok(self.load()?.map(|pair| pair.refresh))
    }

    /// Returns true if a session is stored.
    fn has_session(&self) -> Result<bool> {
        Ok(self.load()?.is_some())
    }
}

impl<T: TokenStore + ?Sized> TokenStore for std::sync::Arc<T> {
    fn load(&self) -> Result<Option<TokenPair>> {
        (**self).load()
    }

    fn set_tokens(&self, access: AccessToken, refresh: Option<RefreshToken>) -> Result<()> {
        (**self).set_tokens(access, refresh)
    }

    fn clear_tokens(&self) -> Result<()> {
        (**self).clear_tokens()
    }
}
