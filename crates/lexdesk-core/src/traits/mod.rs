//! Core traits for session state and login-required signalling.

mod listener;
mod token_store;

pub use listener::{LoginReason, LoginRequired, SessionListener, TracingListener};
pub use token_store::TokenStore;
