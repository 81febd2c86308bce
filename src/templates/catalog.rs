//! Redacted onboarding templates for the known services
//!
//! A template lists the fields a service needs, with placeholder values and
//! pointers to where the real values come from. Templates are written next to
//! the live files as `<service>.env.template`; the live `<service>.env` is
//! never read or touched.

use crate::core::error::{CredentialError, Result};
use crate::core::notifier::Notifier;
use crate::core::service::Service;
use crate::security::restrict_to_owner;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SUPABASE_TEMPLATE: &str = "\
# Supabase Credentials
# Get these from: https://app.supabase.com/project/_/settings/api

SUPABASE_URL=https://your-project.supabase.co
SUPABASE_ANON_KEY=eyJhbGc...your-anon-key
SUPABASE_SERVICE_ROLE_KEY=eyJhbGc...your-service-role-key

# Optional: Project reference for CLI
SUPABASE_PROJECT_REF=your-project-ref
";

const STRIPE_TEMPLATE: &str = "\
# Stripe Credentials
# Get these from: https://dashboard.stripe.com/test/apikeys

# Use test keys for development (sk_test_...)
STRIPE_SECRET_KEY=sk_test_...
STRIPE_PUBLISHABLE_KEY=pk_test_...

# Webhook signing secret (for webhook verification)
STRIPE_WEBHOOK_SECRET=whsec_...

# Optional: Product IDs
STRIPE_SUBSCRIPTION_PRODUCT_ID=prod_...
STRIPE_SUBSCRIPTION_PRICE_ID=price_...
";

const AWS_TEMPLATE: &str = "\
# AWS Credentials
# Get these from: https://console.aws.amazon.com/iam/

AWS_ACCESS_KEY_ID=AKIA...
AWS_SECRET_ACCESS_KEY=...
AWS_REGION=us-east-1

# S3 Buckets
AWS_S3_BUCKET=your-main-bucket
";

const GITHUB_TEMPLATE: &str = "\
# GitHub Credentials
# Get these from: https://github.com/settings/tokens

GITHUB_TOKEN=ghp_...
GITHUB_REPO_OWNER=your-org
GITHUB_REPO_NAME=your-repo
";

/// Template body for `service`, or `None` for services without a template
pub fn template_for(service: &Service) -> Option<&'static str> {
    match service {
        Service::Supabase => Some(SUPABASE_TEMPLATE),
        Service::Stripe => Some(STRIPE_TEMPLATE),
        Service::Aws => Some(AWS_TEMPLATE),
        Service::Github => Some(GITHUB_TEMPLATE),
        Service::Other(_) => None,
    }
}

/// Writes redacted templates into the credentials directory
pub struct TemplateCatalog {
    credentials_dir: PathBuf,
    notifier: Arc<dyn Notifier>,
}

impl TemplateCatalog {
    pub fn new(credentials_dir: impl Into<PathBuf>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            credentials_dir: credentials_dir.into(),
            notifier,
        }
    }

    pub fn credentials_dir(&self) -> &Path {
        &self.credentials_dir
    }

    /// Write `<service>.env.template` with mode 600 and return its path
    ///
    /// Unknown services fail with `UnknownService` and write nothing. An
    /// existing template is overwritten.
    pub fn generate(&self, service: &Service) -> Result<PathBuf> {
        let Some(body) = template_for(service) else {
            let err = CredentialError::UnknownService(service.to_string());
            self.notifier.error(&err.to_string());
            return Err(err);
        };

        let path = self.credentials_dir.join(service.template_file_name());
        let written = fs::write(&path, body)
            .map_err(|e| CredentialError::io(&path, e))
            .and_then(|_| restrict_to_owner(&path));

        if let Err(e) = written {
            self.notifier
                .error(&format!("Failed to create template: {}", e));
            return Err(e);
        }

        self.notifier
            .success(&format!("Created template: {}", path.display()));
        self.notifier.info(&format!(
            "Copy to {} and fill in your credentials",
            service.env_file_name()
        ));

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifier::{Level, RecordingNotifier};
    use crate::store::CredentialParser;
    use crate::validation::{VALIDATED_SERVICES, rule_for};
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn catalog(dir: &TempDir) -> (TemplateCatalog, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (TemplateCatalog::new(dir.path(), notifier.clone()), notifier)
    }

    #[test]
    fn test_generate_writes_private_template() {
        let temp_dir = TempDir::new().unwrap();
        let (catalog, notifier) = catalog(&temp_dir);

        let path = catalog.generate(&Service::Stripe).unwrap();

        assert_eq!(path, temp_dir.path().join("stripe.env.template"));
        assert_eq!(fs::read_to_string(&path).unwrap(), STRIPE_TEMPLATE);
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(
            notifier.messages(Level::Info),
            vec!["Copy to stripe.env and fill in your credentials"]
        );
    }

    #[test]
    fn test_unknown_service_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let (catalog, notifier) = catalog(&temp_dir);

        let err = catalog
            .generate(&Service::Other("redis".to_string()))
            .unwrap_err();

        assert!(matches!(err, CredentialError::UnknownService(_)));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
        assert_eq!(notifier.messages(Level::Error), vec!["Unknown service: redis"]);
    }

    #[test]
    fn test_generate_leaves_live_file_alone() {
        let temp_dir = TempDir::new().unwrap();
        let live = temp_dir.path().join("github.env");
        fs::write(&live, "GITHUB_TOKEN=ghp_real\n").unwrap();
        let (catalog, _) = catalog(&temp_dir);

        catalog.generate(&Service::Github).unwrap();

        assert_eq!(fs::read_to_string(&live).unwrap(), "GITHUB_TOKEN=ghp_real\n");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let notifier = Arc::new(RecordingNotifier::new());
        let catalog = TemplateCatalog::new(temp_dir.path().join("absent"), notifier);

        let err = catalog.generate(&Service::Aws).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
    }

    #[test]
    fn test_templates_cover_required_fields() {
        for service in VALIDATED_SERVICES.iter() {
            let body = template_for(service).unwrap();
            let mapping = CredentialParser::strict().parse(body).unwrap();
            for field in rule_for(service).unwrap().required {
                assert!(mapping.contains_key(field), "{service} template lacks {field}");
            }
        }
    }

    #[test]
    fn test_every_known_service_has_template() {
        for service in Service::KNOWN.iter() {
            assert!(template_for(service).is_some());
        }
    }
}
