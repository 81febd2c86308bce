//! Configuration structures and on-disk layout
//!
//! `ManagerConfig` is deserialised from `config.yaml`; every field is optional
//! on disk and falls back to the permissive defaults.

use crate::core::error::{CredentialError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Root directory name under the user's home directory
pub const DEFAULT_HOME_DIR: &str = ".credential-manager";

/// Config file name inside the home directory
pub const CONFIG_FILENAME: &str = "config.yaml";

/// Log file name inside the logs directory
pub const LOG_FILENAME: &str = "credentials.log";

/// Root configuration object
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManagerConfig {
    /// Root directory holding credentials/, backups/ and logs/
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,

    /// Strictness switches
    pub policy: PolicyConfig,

    /// Log file settings
    pub log: LogConfig,
}

/// Strictness switches for parsing, permissions and validation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyConfig {
    /// Tighten group/other permission bits to 600 instead of refusing the file
    pub repair_permissions: bool,

    /// Reject non-comment lines that lack `=`
    pub strict_parsing: bool,

    /// Treat pattern mismatches as validation failures
    pub strict_patterns: bool,

    /// Copy loaded pairs into the process environment after `load`
    pub export_on_load: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            repair_permissions: true,
            strict_parsing: false,
            strict_patterns: false,
            export_on_load: true,
        }
    }
}

/// Log file settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ManagerConfig {
    /// Resolved home directory (`~/.credential-manager` unless overridden)
    pub fn home_dir(&self) -> PathBuf {
        match &self.home {
            Some(home) => home.clone(),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DEFAULT_HOME_DIR),
        }
    }

    pub fn paths(&self) -> CredentialPaths {
        CredentialPaths::new(self.home_dir())
    }
}

/// Directory layout under the home directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPaths {
    pub home: PathBuf,
    pub credentials: PathBuf,
    pub backups: PathBuf,
    pub logs: PathBuf,
}

impl CredentialPaths {
    pub fn new(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref().to_path_buf();
        Self {
            credentials: home.join("credentials"),
            backups: home.join("backups"),
            logs: home.join("logs"),
            home,
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs.join(LOG_FILENAME)
    }

    pub fn config_file(&self) -> PathBuf {
        self.home.join(CONFIG_FILENAME)
    }

    /// Create credentials/, backups/ and logs/ with mode 700
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.credentials, &self.backups, &self.logs] {
            fs::create_dir_all(dir).map_err(|e| CredentialError::io(dir, e))?;
            fs::set_permissions(dir, Permissions::from_mode(0o700))
                .map_err(|e| CredentialError::io(dir, e))?;
        }
        Ok(())
    }
}
