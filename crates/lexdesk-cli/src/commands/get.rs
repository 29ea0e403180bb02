//! Get command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use lexdesk_core::Resource;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Collection name
    pub resource: String,

    /// Item id
    pub id: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(global: &GlobalArgs, args: GetArgs) -> Result<()> {
    let resource = Resource::new(&args.resource).context("Invalid resource name")?;
    let session = session::open(global)?;

    let item: Value = session
        .get(&resource, &args.id)
        .await
        .with_context(|| format!("Failed to fetch {} {}", resource, args.id))?;

    output::value(&item, args.pretty)
}
