//! Delete command implementation.

use anyhow::{Context, Result};
use clap::Args;

use lexdesk_core::Resource;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Collection name
    pub resource: String,

    /// Item id
    pub id: String,
}

pub async fn run(global: &GlobalArgs, args: DeleteArgs) -> Result<()> {
    let resource = Resource::new(&args.resource).context("Invalid resource name")?;
    let session = session::open(global)?;

    session
        .delete(&resource, &args.id)
        .await
        .with_context(|| format!("Failed to delete {} {}", resource, args.id))?;

    output::success(&format!("Deleted {} {}", resource, args.id));

    Ok(())
}
