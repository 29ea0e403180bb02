//! List command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;

use lexdesk_core::Resource;
use lexdesk_http::filter;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Collection name (e.g. case, client, invoice)
    pub resource: String,

    /// Only show items containing this text (case-insensitive)
    #[arg(long, short)]
    pub search: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let resource = Resource::new(&args.resource).context("Invalid resource name")?;
    let session = session::open(global)?;

    let items: Vec<Value> = session
        .list(&resource)
        .await
        .with_context(|| format!("Failed to list {}", resource))?;

    let matched = filter::filter_items(&items, args.search.as_deref().unwrap_or(""));

    if matched.is_empty() {
        eprintln!("{}", "No items found.".dimmed());
        return Ok(());
    }

    for item in matched {
        output::value(item, args.pretty)?;
    }

    Ok(())
}
