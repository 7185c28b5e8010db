//! Durable storage for the bearer credential.
//!
//! The credential lives under the single key `token`. [`FileTokenStore`]
//! keeps it in a small JSON document (`{"token": "..."}`) so it survives
//! process restarts; [`MemoryTokenStore`] is the in-process variant used by
//! tests and one-shot invocations.

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Storage key the credential is kept under.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("token storage io failed: {0}")]
    Io(#[from] io::Error),
    #[error("token storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub trait TokenStore: Send + Sync {
    /// Read the persisted credential, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, token: &str) -> Result<(), StoreError>;

    /// Remove the persisted credential. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// JSON file backed store.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let document: TokenDocument = serde_json::from_str(&raw)?;
        Ok(document.token.filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let document = TokenDocument { token: Some(token.to_owned()) };
        fs::write(&self.path, serde_json::to_string_pretty(&document)?)?;
        restrict_permissions(&self.path)?;
        tracing::debug!(path = %self.path.display(), "credential persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "credential removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }

    /// Current value without going through the trait.
    #[must_use]
    pub fn peek(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.peek())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
