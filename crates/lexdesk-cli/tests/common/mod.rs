#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// An isolated session file for one test.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    /// Seed the session file with a token pair.
    pub fn seed(&self, access: &str, refresh: &str) {
        let json = serde_json::json!({
            "accessToken": access,
            "refreshToken": refresh,
        });
        std::fs::write(self.session_path(), json.to_string()).expect("Failed to seed session");
    }

    /// Read the session file back, if present.
    pub fn stored(&self) -> Option<serde_json::Value> {
        let contents = std::fs::read_to_string(self.session_path()).ok()?;
        serde_json::from_str(&contents).ok()
    }
}

/// Run the CLI against `api` with the sandboxed session file.
pub fn run_cli(args: &[&str], sandbox: &Sandbox, api: &str) -> Output {
    run_cli_in(args, &sandbox.session_path(), api)
}

pub fn run_cli_in(args: &[&str], store: &Path, api: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lexdesk"));
    cmd.args(args);
    cmd.arg("--api").arg(api);
    cmd.arg("--store").arg(store);
    cmd.env_remove("LEXDESK_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub fn run_cli_success(args: &[&str], sandbox: &Sandbox, api: &str) -> String {
    let output = run_cli(args, sandbox, api);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
