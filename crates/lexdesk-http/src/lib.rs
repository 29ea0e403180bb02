//! lexdesk-http - Authenticated HTTP session for the lexdesk backend.
//!
//! Every protected call goes through [`Session::perform_authenticated_request`],
//! which attaches the stored access token and, when the backend answers
//! `401`, refreshes the session once and retries the call once.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lexdesk_core::{ApiUrl, Credentials, MemoryTokenStore, Resource, SessionConfig};
//! use lexdesk_http::Session;
//!
//! # async fn example() -> Result<(), lexdesk_core::Error> {
//! let config = SessionConfig::new(ApiUrl::new("https://practice.example.com")?);
//! let session = Session::new(config, Arc::new(MemoryTokenStore::new()))?;
//! session.login(&Credentials::new("advocate", "secret")).await?;
//!
//! let cases: Vec<serde_json::Value> = session.list(&Resource::new("case")?).await?;
//! println!("{} cases", cases.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod endpoints;
pub mod filter;
mod session;

pub use client::ApiClient;
pub use endpoints::{RefreshResponse, TokenResponse};
pub use reqwest::Method;
pub use session::Session;
