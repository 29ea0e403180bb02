//! Refresh token command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(global: &GlobalArgs, _args: RefreshTokenArgs) -> Result<()> {
    let session = session::open(global)?;

    eprintln!("{}", "Refreshing session...".dimmed());

    session
        .refresh_session()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed successfully");

    Ok(())
}
