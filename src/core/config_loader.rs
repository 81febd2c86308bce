//! Layered configuration loading
//!
//! Priority (high to low):
//! 1. CLI overrides
//! 2. Environment variables
//! 3. `<home>/config.yaml`
//! 4. Default values

use super::config::*;
use crate::core::error::{CredentialError, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the home directory
pub const ENV_HOME: &str = "CREDENTIAL_MANAGER_HOME";

/// `true` enables strict parsing and strict patterns
pub const ENV_STRICT: &str = "CREDENTIAL_MANAGER_STRICT";

/// `true` disables the log file
pub const ENV_NO_LOG: &str = "CREDENTIAL_MANAGER_NO_LOG";

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub home: Option<PathBuf>,
    pub strict: bool,
    pub no_export: bool,
}

/// Configuration load options
#[derive(Debug, Clone, Default)]
pub struct ConfigLoadOptions {
    /// CLI arguments (highest priority)
    pub cli: CliOverrides,

    /// Environment variables
    pub env: HashMap<String, String>,
}

impl ConfigLoadOptions {
    /// Options populated from the current process environment
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_process_env(cli: CliOverrides) -> Self {
        Self {
            cli,
            env: utf8_vars(std::env::vars_os()),
        }
    }
}

/// Collect environment pairs, dropping any that are not valid UTF-8
pub fn utf8_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources
    pub fn load(options: &ConfigLoadOptions) -> Result<ManagerConfig> {
        // The home directory decides where config.yaml lives, so resolve it
        // from the high-priority sources first.
        let home = options
            .cli
            .home
            .clone()
            .or_else(|| options.env.get(ENV_HOME).map(PathBuf::from));

        let bootstrap = ManagerConfig {
            home: home.clone(),
            ..Default::default()
        };

        let mut config = Self::load_file(&bootstrap.paths().config_file())?.unwrap_or_default();

        if home.is_some() {
            config.home = home;
        }

        Self::apply_env(&mut config, &options.env);
        Self::apply_cli(&mut config, &options.cli);

        tracing::debug!(home = %config.home_dir().display(), policy = ?config.policy, "configuration loaded");
        Ok(config)
    }

    /// Load configuration from a YAML file; `None` when the file is absent
    pub fn load_file(path: &Path) -> Result<Option<ManagerConfig>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CredentialError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(Some(ManagerConfig::default()));
        }

        let config: ManagerConfig = serde_yaml::from_str(&content).map_err(|e| {
            CredentialError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        Ok(Some(config))
    }

    fn apply_env(config: &mut ManagerConfig, env: &HashMap<String, String>) {
        if Self::is_true(env.get(ENV_STRICT)) {
            config.policy.strict_parsing = true;
            config.policy.strict_patterns = true;
        }

        if Self::is_true(env.get(ENV_NO_LOG)) {
            config.log.enabled = false;
        }
    }

    fn apply_cli(config: &mut ManagerConfig, cli: &CliOverrides) {
        if cli.strict {
            config.policy.strict_parsing = true;
            config.policy.strict_patterns = true;
        }

        if cli.no_export {
            config.policy.export_on_load = false;
        }
    }

    fn is_true(value: Option<&String>) -> bool {
        matches!(
            value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("1" | "true" | "yes")
        )
    }
}
