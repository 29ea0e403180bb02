//! JSON body input.

use std::io::{self, Read};

use anyhow::{Context, Result};
use serde_json::Value;

/// Read a JSON document from a file, or from stdin when `path` is `-`.
pub fn read_json(path: &str) -> Result<Value> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        serde_json::from_str(&buf).context("Invalid JSON from stdin")
    } else {
        let content = std::fs::read_to_string(path).context("Failed to read JSON file")?;
        serde_json::from_str(&content).context("Invalid JSON in file")
    }
}
