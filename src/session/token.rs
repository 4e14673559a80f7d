//! Durable token persistence.
//!
//! The session persists exactly one key-value pair: the raw bearer token.
//! Absence means anonymous. Reads happen once at startup (plus per-request
//! bearer lookups by the HTTP client); writes happen only on login,
//! register, refresh, and logout.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::AuthConfig;

/// Single-slot durable token storage. Implementations are synchronous;
/// each call is atomic from the session store's perspective.
pub trait TokenStore: Send + Sync {
    /// The persisted token, or `None` when anonymous.
    fn load(&self) -> Result<Option<String>>;

    /// Persist a token, replacing any previous one.
    fn save(&self, token: &str) -> Result<()>;

    /// Remove the persisted token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

// ── File-backed store ────────────────────────────────────────────

/// Stores the raw token string in a single file.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.token_file())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err)
                .with_context(|| format!("failed to read token file {}", self.path.display())),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create token directory {}", parent.display())
            })?;
        }
        std::fs::write(&self.path, token)
            .with_context(|| format!("failed to write token file {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to remove token file {}", self.path.display())),
        }
    }
}

// ── In-memory store ──────────────────────────────────────────────

/// Volatile token storage for tests and embedders without a filesystem.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}
