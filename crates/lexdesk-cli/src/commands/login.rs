//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use lexdesk_core::Credentials;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::{self, storage};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "LEXDESK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(global: &GlobalArgs, args: LoginArgs) -> Result<()> {
    let session = session::open(global)?;
    let credentials = Credentials::new(&args.username, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    session
        .login(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    output::field("API", session.config().api_url.as_str());
    output::field(
        "Session file",
        &storage::session_path(global)?.display().to_string(),
    );

    Ok(())
}
