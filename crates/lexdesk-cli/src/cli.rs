//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::commands::Command;

/// Command-line client for the lexdesk practice-management API.
#[derive(Parser, Debug)]
#[command(name = "lexdesk")]
#[command(author, version = env!("LEXDESK_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Backend base URL
    #[arg(long, env = "LEXDESK_API", default_value = "http://localhost:8000", global = true)]
    pub api: String,

    /// Session file (defaults to the user data directory)
    #[arg(long, env = "LEXDESK_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,
}
