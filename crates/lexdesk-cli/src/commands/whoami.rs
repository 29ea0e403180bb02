//! Whoami command implementation.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;

use lexdesk_core::TokenStore;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub fn run(global: &GlobalArgs, _args: WhoamiArgs) -> Result<()> {
    let store = storage::open_store(global)?;

    if !store.has_session().context("Failed to load session")? {
        anyhow::bail!("No active session. Run 'lexdesk login' first.");
    }

    output::field("API", &global.api);
    output::field("Session file", &store.path().display().to_string());
    if let Some(saved_at) = store.saved_at().context("Failed to load session")? {
        output::field(
            "Saved at",
            &saved_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        );
    }

    Ok(())
}
