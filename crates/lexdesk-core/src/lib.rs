//! lexdesk-core - Core types and traits for the lexdesk API client.
//!
//! This crate holds everything the transport and storage crates share:
//! the token types, the [`TokenStore`] abstraction over persisted session
//! state, the login-required signal, and the unified [`Error`] type.

pub mod config;
pub mod credentials;
pub mod error;
pub mod memory;
pub mod tokens;
pub mod traits;
pub mod types;

pub use config::SessionConfig;
pub use credentials::Credentials;
pub use error::Error;
pub use memory::MemoryTokenStore;
pub use tokens::{AccessToken, RefreshToken, TokenPair};
pub use traits::{LoginReason, LoginRequired, SessionListener, TokenStore, TracingListener};
pub use types::{ApiUrl, Resource};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
