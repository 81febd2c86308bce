//! Registry of loaded per-service credentials
//!
//! Loading a service runs the permission guard, reads `<service>.env`, parses
//! it and keeps the mapping in memory. Copying the pairs into the process
//! environment is a separate, explicit step ([`CredentialStore::export_to_environment`]).
//!
//! Exported keys are not namespaced: if two services define the same key, the
//! service exported last wins. This is accepted behaviour.

use super::mapping::CredentialMapping;
use super::parser::CredentialParser;
use crate::core::config::ManagerConfig;
use crate::core::error::{CredentialError, Result};
use crate::core::notifier::Notifier;
use crate::core::service::{ENV_SUFFIX, Service, TEMPLATE_SUFFIX};
use crate::security::{PermissionGuard, mask_value};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Kind of file found in the credentials directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialFileKind {
    Credential,
    Template,
}

/// A file in the credentials directory
#[derive(Debug, Clone, Serialize)]
pub struct CredentialFileInfo {
    pub name: String,
    pub path: PathBuf,
    pub kind: CredentialFileKind,
    pub size: u64,
    /// Low 9 permission bits in octal, e.g. "600"
    pub permissions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

/// In-memory registry of loaded credential mappings
pub struct CredentialStore {
    credentials_dir: PathBuf,
    guard: PermissionGuard,
    parser: CredentialParser,
    notifier: Arc<dyn Notifier>,
    loaded: HashMap<Service, CredentialMapping>,
}

impl CredentialStore {
    /// Create a store with the permissive default policy
    pub fn new(credentials_dir: impl Into<PathBuf>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            credentials_dir: credentials_dir.into(),
            guard: PermissionGuard::new(notifier.clone()),
            parser: CredentialParser::new(),
            notifier,
            loaded: HashMap::new(),
        }
    }

    /// Create a store for the configured credentials directory and policy
    pub fn from_config(config: &ManagerConfig, notifier: Arc<dyn Notifier>) -> Self {
        let policy = config.policy;
        Self::new(config.paths().credentials, notifier.clone())
            .with_guard(PermissionGuard::new(notifier).with_repair(policy.repair_permissions))
            .with_parser(CredentialParser::with_strict(policy.strict_parsing))
    }

    pub fn with_guard(mut self, guard: PermissionGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_parser(mut self, parser: CredentialParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn credentials_dir(&self) -> &Path {
        &self.credentials_dir
    }

    /// Path of the live credential file for `service`
    pub fn credential_path(&self, service: &Service) -> PathBuf {
        self.credentials_dir.join(service.env_file_name())
    }

    /// Load `<service>.env`, replacing any mapping previously loaded for it
    ///
    /// On failure nothing already stored is modified.
    pub fn load(&mut self, service: &Service) -> Result<&CredentialMapping> {
        let path = self.credential_path(service);

        if !path.exists() {
            self.notifier
                .error(&format!("Credential file not found: {}", path.display()));
            return Err(CredentialError::FileNotFound { path });
        }

        match self.guard.check(&path) {
            Ok(_) => {}
            Err(e @ CredentialError::InsecurePermissions { .. }) => {
                self.notifier.error(&e.to_string());
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(service = %service, error = %e, "permission check failed, continuing");
            }
        }

        let mapping = fs::read_to_string(&path)
            .map_err(|e| CredentialError::io(&path, e))
            .and_then(|content| self.parser.parse(&content));

        let mapping = match mapping {
            Ok(mapping) => mapping,
            Err(e) => {
                self.notifier
                    .error(&format!("Error loading credentials: {}", e));
                return Err(e);
            }
        };

        tracing::debug!(service = %service, keys = mapping.len(), "parsed credential file");
        self.notifier
            .success(&format!("Loaded credentials for {}", service));

        self.loaded.insert(service.clone(), mapping);
        self.get(service)
            .ok_or_else(|| CredentialError::NotLoaded(service.to_string()))
    }

    /// Mapping for `service`, if loaded
    pub fn get(&self, service: &Service) -> Option<&CredentialMapping> {
        self.loaded.get(service)
    }

    pub fn is_loaded(&self, service: &Service) -> bool {
        self.loaded.contains_key(service)
    }

    /// Loaded services in name order
    pub fn loaded_services(&self) -> Vec<&Service> {
        let mut services: Vec<&Service> = self.loaded.keys().collect();
        services.sort();
        services
    }

    /// Copy every pair of a loaded mapping into the process environment
    ///
    /// Returns the number of variables set. Variables with the same name from
    /// an earlier export are overwritten.
    pub fn export_to_environment(&self, service: &Service) -> Result<usize> {
        let mapping = self
            .get(service)
            .ok_or_else(|| CredentialError::NotLoaded(service.to_string()))?;

        let mut exported = 0;
        for (key, value) in mapping.iter() {
            // set_var panics on these; skip rather than abort the whole export
            if key.is_empty() || key.contains(['=', '\0']) || value.contains('\0') {
                tracing::warn!(service = %service, key, "skipping key that cannot be exported");
                continue;
            }
            // SAFETY: the manager is single-threaded; nothing reads the
            // environment concurrently while it is being updated.
            unsafe {
                std::env::set_var(key, value);
            }
            exported += 1;
        }

        tracing::debug!(service = %service, exported, "exported credentials to environment");
        Ok(exported)
    }

    /// Shell `export` statements for a loaded mapping
    ///
    /// Single quotes inside values are escaped so the output is safe to `eval`.
    /// With `masked` set, values are replaced by a masked preview.
    pub fn export_lines(&self, service: &Service, masked: bool) -> Result<Vec<String>> {
        let mapping = self
            .get(service)
            .ok_or_else(|| CredentialError::NotLoaded(service.to_string()))?;

        Ok(mapping
            .iter()
            .map(|(key, value)| {
                let shown = if masked {
                    mask_value(value)
                } else {
                    value.to_string()
                };
                format!("export {}='{}'", key, shown.replace('\'', "'\\''"))
            })
            .collect())
    }

    /// Credential and template files in the credentials directory, by name
    pub fn list_files(&self) -> Vec<CredentialFileInfo> {
        let mut files: Vec<CredentialFileInfo> = WalkDir::new(&self.credentials_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                let kind = if name.ends_with(TEMPLATE_SUFFIX) {
                    CredentialFileKind::Template
                } else if name.ends_with(ENV_SUFFIX) {
                    CredentialFileKind::Credential
                } else {
                    return None;
                };

                let metadata = entry.metadata().ok()?;
                Some(CredentialFileInfo {
                    path: entry.path().to_path_buf(),
                    kind,
                    size: metadata.len(),
                    permissions: format!("{:03o}", metadata.permissions().mode() & 0o777),
                    modified: metadata.modified().ok().map(DateTime::<Utc>::from),
                    name,
                })
            })
            .collect();

        files.sort_by(|a, b| a.name.cmp(&b.name));
        files
    }
}
