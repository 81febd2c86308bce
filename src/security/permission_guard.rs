//! Permission guard for credential files
//!
//! Credential files must only be accessible by their owner. When a file grants
//! any permission to group or other, the guard tightens it to `0600` in place
//! and reports the repair. With repair disabled the guard refuses the file
//! instead.

use crate::core::error::{CredentialError, Result};
use crate::core::notifier::Notifier;
use std::fs::{self, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;

/// Owner read/write only
pub const SECURE_FILE_MODE: u32 = 0o600;

/// Any group or other permission bit
const GROUP_OTHER_MASK: u32 = 0o077;

/// Outcome of a permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Mode already grants nothing to group/other
    Secure { mode: u32 },
    /// Mode was tightened from `previous` to `0600`
    Repaired { previous: u32 },
}

/// Inspects and repairs permission bits on credential files
pub struct PermissionGuard {
    notifier: Arc<dyn Notifier>,
    repair: bool,
}

impl PermissionGuard {
    /// Create a guard that repairs insecure modes
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            repair: true,
        }
    }

    /// Choose between repairing (`true`) and refusing (`false`) insecure files
    pub fn with_repair(mut self, repair: bool) -> Self {
        self.repair = repair;
        self
    }

    /// Check a credential file and tighten its mode if needed
    ///
    /// Returns `FileNotFound` if the file does not exist.
    pub fn check(&self, path: &Path) -> Result<PermissionStatus> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CredentialError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(CredentialError::io(path, e)),
        };

        let mode = metadata.permissions().mode() & 0o777;
        if mode & GROUP_OTHER_MASK == 0 {
            return Ok(PermissionStatus::Secure { mode });
        }

        let name = display_name(path);
        self.notifier
            .warning(&format!("Insecure permissions on {}", name));

        if !self.repair {
            return Err(CredentialError::InsecurePermissions {
                path: path.to_path_buf(),
                mode,
            });
        }

        restrict_to_owner(path)?;
        tracing::debug!(path = %path.display(), previous = %format!("{:03o}", mode), "tightened credential file mode");
        self.notifier.success("Fixed permissions to 600");

        Ok(PermissionStatus::Repaired { previous: mode })
    }
}

/// Set `path` to owner read/write only
pub fn restrict_to_owner(path: &Path) -> Result<()> {
    fs::set_permissions(path, Permissions::from_mode(SECURE_FILE_MODE))
        .map_err(|e| CredentialError::io(path, e))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifier::{Level, RecordingNotifier};
    use tempfile::TempDir;

    fn write_with_mode(dir: &TempDir, name: &str, mode: u32) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, "KEY=value\n").unwrap();
        fs::set_permissions(&path, Permissions::from_mode(mode)).unwrap();
        path
    }

    fn mode_of(path: &Path) -> u32 {
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn test_world_readable_file_is_repaired() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_with_mode(&temp_dir, "stripe.env", 0o644);
        let notifier = Arc::new(RecordingNotifier::new());

        let status = PermissionGuard::new(notifier.clone()).check(&path).unwrap();

        assert_eq!(status, PermissionStatus::Repaired { previous: 0o644 });
        assert_eq!(mode_of(&path), 0o600);
        assert_eq!(
            notifier.messages(Level::Warning),
            vec!["Insecure permissions on stripe.env"]
        );
        assert_eq!(
            notifier.messages(Level::Success),
            vec!["Fixed permissions to 600"]
        );
    }

    #[test]
    fn test_secure_file_is_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_with_mode(&temp_dir, "aws.env", 0o400);
        let notifier = Arc::new(RecordingNotifier::new());

        let status = PermissionGuard::new(notifier.clone()).check(&path).unwrap();

        assert_eq!(status, PermissionStatus::Secure { mode: 0o400 });
        assert_eq!(mode_of(&path), 0o400);
        assert!(notifier.entries().is_empty());
    }

    #[test]
    fn test_group_only_bit_counts_as_insecure() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_with_mode(&temp_dir, "github.env", 0o610);
        let notifier = Arc::new(RecordingNotifier::new());

        let status = PermissionGuard::new(notifier).check(&path).unwrap();

        assert_eq!(status, PermissionStatus::Repaired { previous: 0o610 });
        assert_eq!(mode_of(&path), 0o600);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = Arc::new(RecordingNotifier::new());

        let err = PermissionGuard::new(notifier)
            .check(&temp_dir.path().join("nope.env"))
            .unwrap_err();

        assert!(matches!(err, CredentialError::FileNotFound { .. }));
    }

    #[test]
    fn test_repair_disabled_refuses_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_with_mode(&temp_dir, "supabase.env", 0o664);
        let notifier = Arc::new(RecordingNotifier::new());

        let err = PermissionGuard::new(notifier.clone())
            .with_repair(false)
            .check(&path)
            .unwrap_err();

        assert!(matches!(
            err,
            CredentialError::InsecurePermissions { mode: 0o664, .. }
        ));
        assert_eq!(mode_of(&path), 0o664);
        assert!(notifier.messages(Level::Success).is_empty());
    }
}
