//! In-memory token store.

use std::sync::RwLock;

use crate::error::StorageError;
use crate::traits::TokenStore;
use crate::{AccessToken, RefreshToken, Result, TokenPair};

/// Token store that keeps the session in process memory.
///
/// Used by tests and by embedders that persist the session themselves.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given session.
    pub fn with_tokens(access: AccessToken, refresh: RefreshToken) -> Self {
        Self {
            tokens: RwLock::new(Some(TokenPair::new(access, refresh))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<TokenPair>> {
        let tokens = self.tokens.read().map_err(|_| StorageError::Poisoned)?;
        Ok(tokens.clone())
    }

    fn set_tokens(&self, access: AccessToken, refresh: Option<RefreshToken>) -> Result<()> {
        let mut tokens = self.tokens.write().map_err(|_| StorageError::Poisoned)?;
        if let Some(pair) = tokens.as_mut() {
            pair.rotate(access, refresh);
            return Ok(());
        }
        let refresh = refresh.ok_or(StorageError::MissingRefreshToken)?;
        *tokens = Some(TokenPair::new(access, refresh));
        Ok(())
    }

    fn clear_tokens(&self) -> Result<()> {
        let mut tokens = self.tokens.write().map_err(|_| StorageError::Poisoned)?;
        *tokens = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn empty_store_has_no_tokens() {
        let store = MemoryTokenStore::new();
        assert!(store.access_token().unwrap().is_none());
        assert!(store.refresh_token().unwrap().is_none());
        assert!(!store.has_session().unwrap());
    }

    #[test]
    fn set_and_rotate() {
        let store = MemoryTokenStore::new();
        store
            .set_tokens(AccessToken::new("a1"), Some(RefreshToken::new("r1")))
            .unwrap();
        store.set_tokens(AccessToken::new("a2"), None).unwrap();

        let pair = store.load().unwrap().unwrap();
        assert_eq!(pair.access.as_str(), "a2");
        assert_eq!(pair.refresh.as_str(), "r1");
    }

    #[test]
    fn access_only_write_on_empty_store_fails() {
        let store = MemoryTokenStore::new();
        let err = store.set_tokens(AccessToken::new("a1"), None).unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(StorageError::MissingRefreshToken)
        ));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn clear_removes_both_tokens() {
        let store = MemoryTokenStore::with_tokens(AccessToken::new("a"), RefreshToken::new("r"));
        store.clear_tokens().unwrap();
        assert!(store.access_token().unwrap().is_none());
        assert!(store.refresh_token().unwrap().is_none());
        // Idempotent
        store.clear_tokens().unwrap();
    }
}
