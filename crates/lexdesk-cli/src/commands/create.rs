//! Create command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use lexdesk_core::Resource;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

use super::input;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Collection name
    pub resource: String,

    /// JSON file with the item (use - for stdin)
    #[arg(long)]
    pub json: String,
}

pub async fn run(global: &GlobalArgs, args: CreateArgs) -> Result<()> {
    let resource = Resource::new(&args.resource).context("Invalid resource name")?;
    let body = input::read_json(&args.json)?;
    let session = session::open(global)?;

    let created: Value = session
        .create(&resource, &body)
        .await
        .with_context(|| format!("Failed to create {}", resource))?;

    output::json(&created)?;
    output::success(&format!("Created {}", resource));

    Ok(())
}
