//! Raw request command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use lexdesk_http::Method;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

use super::input;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: String,

    /// Path below the API base URL (e.g. /api/calendar/?month=2026-10)
    pub path: String,

    /// JSON file with the request body (use - for stdin)
    #[arg(long)]
    pub json: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(global: &GlobalArgs, args: RequestArgs) -> Result<()> {
    let method = Method::from_bytes(args.method.to_ascii_uppercase().as_bytes())
        .context("Invalid HTTP method")?;
    let body = args.json.as_deref().map(input::read_json).transpose()?;
    let session = session::open(global)?;

    let response = session
        .request_json(method, &args.path, body.as_ref())
        .await
        .with_context(|| format!("Request to {} failed", args.path))?;

    if response != Value::Null {
        output::value(&response, args.pretty)?;
    }

    Ok(())
}
