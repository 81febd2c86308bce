//! Local per-service credential management
//!
//! Loads `KEY=value` credential files from a private directory, keeps their
//! permissions at `0600`, validates required fields per service and writes
//! redacted onboarding templates.
//!
//! # Example
//!
//! ```no_run
//! use credential_manager::{ConsoleNotifier, CredentialStore, Service, ValidationEngine};
//! use std::sync::Arc;
//!
//! let notifier = Arc::new(ConsoleNotifier::new());
//! let mut store = CredentialStore::new("/home/me/.credential-manager/credentials", notifier.clone());
//!
//! if store.load(&Service::Stripe).is_ok() {
//!     let report = ValidationEngine::new(notifier).validate(&store, &Service::Stripe).unwrap();
//!     assert!(report.passed());
//! }
//! ```

pub mod core;
pub mod security;
pub mod store;
pub mod templates;
pub mod validation;

pub use self::core::*;
pub use security::{PermissionGuard, PermissionStatus};
pub use store::{CredentialMapping, CredentialParser, CredentialStore};
pub use templates::TemplateCatalog;
pub use validation::{ValidationEngine, ValidationReport};
