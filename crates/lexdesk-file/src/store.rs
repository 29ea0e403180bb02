//! JSON file token store.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use lexdesk_core::error::StorageError;
use lexdesk_core::{AccessToken, RefreshToken, Result, TokenPair, TokenStore};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// On-disk session layout.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTokens {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

/// Token store persisted as a JSON file.
///
/// Writes replace the file atomically (write to a temp file, then rename)
/// while holding an exclusive lock on a sibling `.lock` file, so concurrent
/// processes never observe a half-written session. The last writer wins.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the file at `path`. The file and its parent
    /// directory are created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the session file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the stored session was last written, if one is stored.
    pub fn saved_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read()?.and_then(|stored| stored.saved_at))
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> StorageError {
        StorageError::Corrupt {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    /// Read the raw file, or `None` if it does not exist.
    fn read(&self) -> Result<Option<StoredTokens>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(&self.path, e).into()),
        };

        let stored = serde_json::from_str(&contents).map_err(|e| self.corrupt(e.to_string()))?;
        Ok(Some(stored))
    }

    fn read_pair(&self) -> Result<Option<TokenPair>> {
        let Some(stored) = self.read()? else {
            return Ok(None);
        };

        match (stored.access_token, stored.refresh_token) {
            (Some(access), Some(refresh)) => Ok(Some(TokenPair::new(
                AccessToken::new(access),
                RefreshToken::new(refresh),
            ))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(self.corrupt("accessToken without refreshToken").into()),
            (None, Some(_)) => Err(self.corrupt("refreshToken without accessToken").into()),
        }
    }

    /// Run `f` while holding the exclusive write lock.
    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(parent, e))?;
        }

        let lock_path = self.sibling(".lock");
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| self.io_error(&lock_path, e))?;
        lock.lock_exclusive()
            .map_err(|e| self.io_error(&lock_path, e))?;

        let result = f();

        if let Err(e) = FileExt::unlock(&lock) {
            debug!(error = %e, "Failed to release session lock");
        }
        result
    }

    fn write_pair(&self, pair: &TokenPair) -> Result<()> {
        let stored = StoredTokens {
            access_token: Some(pair.access.as_str().to_string()),
            refresh_token: Some(pair.refresh.as_str().to_string()),
            saved_at: Some(Utc::now()),
        };
        let json = serde_json::to_string_pretty(&stored).map_err(|e| self.corrupt(e.to_string()))?;

        let tmp_path = self.sibling(".tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&tmp_path)
                .map_err(|e| self.io_error(&tmp_path, e))?;

            // Set restrictive permissions before any secret is written (Unix only)
            #[cfg(unix)]
            {
                let mut perms = file
                    .metadata()
                    .map_err(|e| self.io_error(&tmp_path, e))?
                    .permissions();
                perms.set_mode(0o600);
                fs::set_permissions(&tmp_path, perms).map_err(|e| self.io_error(&tmp_path, e))?;
            }

            file.write_all(json.as_bytes())
                .and_then(|_| file.sync_all())
                .map_err(|e| self.io_error(&tmp_path, e))?;
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(&self.path, e))?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<TokenPair>> {
        self.read_pair()
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn set_tokens(&self, access: AccessToken, refresh: Option<RefreshToken>) -> Result<()> {
        self.with_lock(|| {
            let pair = match refresh {
                Some(refresh) => TokenPair::new(access, refresh),
                None => match self.read_pair()? {
                    Some(mut pair) => {
                        pair.rotate(access, None);
                        pair
                    }
                    None => return Err(StorageError::MissingRefreshToken.into()),
                },
            };
            self.write_pair(&pair)?;
            debug!("Session saved");
            Ok(())
        })
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn clear_tokens(&self) -> Result<()> {
        self.with_lock(|| match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Session removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(&self.path, e).into()),
        })
    }
}
