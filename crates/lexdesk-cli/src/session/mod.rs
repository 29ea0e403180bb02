//! Session wiring for the CLI: file-backed tokens plus terminal notices.

pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use lexdesk_core::{ApiUrl, LoginRequired, SessionConfig, SessionListener};
use lexdesk_http::Session;

use crate::cli::GlobalArgs;
use crate::output;

/// Prints login-required notices to the terminal.
#[derive(Debug, Clone, Copy)]
pub struct CliListener;

impl SessionListener for CliListener {
    fn login_required(&self, event: &LoginRequired) {
        tracing::debug!(reason = %event.reason, route = %event.route, "Login required");
        output::error(event.notice());
        output::hint("Run 'lexdesk login' to start a new session.");
    }
}

/// Build the session for the configured backend and session file.
pub fn open(global: &GlobalArgs) -> Result<Session> {
    let api = ApiUrl::new(&global.api).context("Invalid API URL")?;
    let config = SessionConfig::new(api).with_timeout(Duration::from_secs(global.timeout));

    let store = storage::open_store(global)?;

    Session::with_listener(config, Arc::new(store), Arc::new(CliListener))
        .context("Failed to create HTTP client")
}
