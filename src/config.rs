//! Runtime configuration for the authentication subsystem.
//!
//! Three sources, in the order embedders usually try them: an explicit
//! TOML file, environment variables (`AUTHKIT_API_URL`,
//! `AUTHKIT_TIMEOUT_SECS`, `AUTHKIT_TOKEN_PATH`), and built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Base URL of the credential service, without the `auth/` suffix.
    pub api_base_url: String,
    /// Transport timeout applied to every request.
    pub timeout_secs: u64,
    /// Where the session token is persisted. `None` selects the
    /// platform data directory.
    pub token_path: Option<PathBuf>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_path: None,
        }
    }
}

impl AuthConfig {
    /// Load from environment variables. Returns `None` when no API URL
    /// is set.
    pub fn from_env() -> Option<Self> {
        let api_base_url = std::env::var("AUTHKIT_API_URL").ok()?;
        if api_base_url.is_empty() {
            return None;
        }

        let timeout_secs = std::env::var("AUTHKIT_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let token_path = std::env::var("AUTHKIT_TOKEN_PATH").ok().map(PathBuf::from);

        Some(Self {
            api_base_url,
            timeout_secs,
            token_path,
        })
    }

    /// Load from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// The resolved token file location.
    pub fn token_file(&self) -> PathBuf {
        self.token_path.clone().unwrap_or_else(default_token_path)
    }
}

/// Platform data directory, falling back to a dotted directory in cwd
/// when the platform offers none.
fn default_token_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "authkit")
        .map(|dirs| dirs.data_dir().join("token"))
        .unwrap_or_else(|| PathBuf::from(".authkit/token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AuthConfig::default();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.token_path.is_none());
        assert!(!config.token_file().as_os_str().is_empty());
    }

    #[test]
    fn load_parses_partial_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("auth.toml");
        std::fs::write(&path, "api_base_url = \"https://api.example.com\"\n").unwrap();

        let config = AuthConfig::load(&path).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn load_missing_file_errors() {
        let result = AuthConfig::load(Path::new("/nonexistent/auth.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn explicit_token_path_wins() {
        let config = AuthConfig {
            token_path: Some(PathBuf::from("/tmp/custom-token")),
            ..AuthConfig::default()
        };
        assert_eq!(config.token_file(), PathBuf::from("/tmp/custom-token"));
    }
}
