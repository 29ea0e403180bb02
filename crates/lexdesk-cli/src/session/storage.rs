//! Session file location.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use lexdesk_file::FileTokenStore;

use crate::cli::GlobalArgs;

/// Get the session file path: the `--store` override, or the user data directory.
pub fn session_path(global: &GlobalArgs) -> Result<PathBuf> {
    if let Some(path) = &global.store {
        return Ok(path.clone());
    }

    let dirs =
        ProjectDirs::from("", "", "lexdesk").context("Could not determine data directory")?;

    Ok(dirs.data_dir().join("session.json"))
}

/// Open the file token store.
pub fn open_store(global: &GlobalArgs) -> Result<FileTokenStore> {
    Ok(FileTokenStore::new(session_path(global)?))
}
