//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(global: &GlobalArgs, _args: LogoutArgs) -> Result<()> {
    let session = session::open(global)?;

    session.logout().context("Failed to clear session")?;

    output::success("Logged out");

    Ok(())
}
