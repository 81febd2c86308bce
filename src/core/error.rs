//! Error handling for credential management
//!
//! Every failure in this crate is reported, never fatal: callers log the error
//! through a [`Notifier`](crate::core::Notifier) and move on to the next
//! service. Variants carry enough context to render recovery guidance.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for credential operations
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Credential file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Invalid service name: {0:?}")]
    InvalidServiceName(String),

    #[error("Credentials for {0} not loaded")]
    NotLoaded(String),

    #[error("Missing {service} credentials: {}", missing.join(", "))]
    ValidationFailed {
        service: String,
        missing: Vec<String>,
    },

    #[error("Insecure permissions {mode:03o} on {}", path.display())]
    InsecurePermissions { path: PathBuf, mode: u32 },

    #[error("Malformed line {line}: expected KEY=VALUE")]
    MalformedLine { line: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CredentialError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "FILE_NOT_FOUND",
            Self::Io { .. } => "IO_ERROR",
            Self::UnknownService(_) => "UNKNOWN_SERVICE",
            Self::InvalidServiceName(_) => "INVALID_SERVICE_NAME",
            Self::NotLoaded(_) => "NOT_LOADED",
            Self::ValidationFailed { .. } => "VALIDATION_FAILED",
            Self::InsecurePermissions { .. } => "INSECURE_PERMISSIONS",
            Self::MalformedLine { .. } => "MALFORMED_LINE",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::FileNotFound { .. } => vec![
                "Generate a template with: credential-manager template <service>",
                "Copy the template to <service>.env and fill in your credentials",
            ],
            Self::Io { .. } => vec![
                "Check that the credentials directory is readable and writable",
                "Check available disk space",
            ],
            Self::UnknownService(_) => {
                vec!["Use one of: supabase, stripe, aws, github"]
            }
            Self::InvalidServiceName(_) => {
                vec!["Service names may only contain letters, digits, '-' and '_'"]
            }
            Self::NotLoaded(_) => vec!["Load the service first: credential-manager load <service>"],
            Self::ValidationFailed { .. } => vec![
                "Add the missing fields to the credential file",
                "Compare with the template: credential-manager template <service>",
            ],
            Self::InsecurePermissions { .. } => vec![
                "Run: chmod 600 <file>",
                "Enable policy.repair_permissions to fix this automatically",
            ],
            Self::MalformedLine { .. } => vec![
                "Use KEY=VALUE on every non-comment line",
                "Disable policy.strict_parsing to skip malformed lines",
            ],
            Self::Config(_) => vec!["Check config.yaml syntax"],
        }
    }
}

pub type Result<T> = std::result::Result<T, CredentialError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_display() {
        let error = CredentialError::FileNotFound {
            path: PathBuf::from("/tmp/creds/stripe.env"),
        };

        assert_eq!(error.code(), "FILE_NOT_FOUND");
        assert!(error.to_string().contains("stripe.env"));
        assert!(!error.suggested_actions().is_empty());
    }

    #[test]
    fn test_validation_failed_lists_fields() {
        let error = CredentialError::ValidationFailed {
            service: "aws".to_string(),
            missing: vec!["AWS_REGION".to_string(), "AWS_S3_BUCKET".to_string()],
        };

        assert_eq!(
            error.to_string(),
            "Missing aws credentials: AWS_REGION, AWS_S3_BUCKET"
        );
        assert_eq!(error.code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_insecure_permissions_renders_octal() {
        let error = CredentialError::InsecurePermissions {
            path: PathBuf::from("a.env"),
            mode: 0o644,
        };

        assert!(error.to_string().contains("644"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let error = CredentialError::io(
            "x.env",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );

        assert_eq!(error.code(), "IO_ERROR");
        assert!(std::error::Error::source(&error).is_some());
    }
}
