//! Update command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use lexdesk_core::Resource;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

use super::input;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Collection name
    pub resource: String,

    /// Item id
    pub id: String,

    /// JSON file with the new fields (use - for stdin)
    #[arg(long)]
    pub json: String,

    /// Only send the given fields (PATCH instead of PUT)
    #[arg(long)]
    pub partial: bool,
}

pub async fn run(global: &GlobalArgs, args: UpdateArgs) -> Result<()> {
    let resource = Resource::new(&args.resource).context("Invalid resource name")?;
    let body = input::read_json(&args.json)?;
    let session = session::open(global)?;

    let result: lexdesk_core::Result<Value> = if args.partial {
        session.partial_update(&resource, &args.id, &body).await
    } else {
        session.update(&resource, &args.id, &body).await
    };
    let updated = result.with_context(|| format!("Failed to update {} {}", resource, args.id))?;

    output::json(&updated)?;
    output::success(&format!("Updated {} {}", resource, args.id));

    Ok(())
}
