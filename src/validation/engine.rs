//! Validation of loaded credentials against the built-in rules
//!
//! Validation only looks at mappings already held by a [`CredentialStore`];
//! it never loads files itself. Missing required fields fail validation and
//! skip the format checks. Format mismatches are warnings unless strict
//! patterns are enabled.

use super::rules::{STRIPE_SECRET_KEY, ValidationRule, rule_for};
use crate::core::error::{CredentialError, Result};
use crate::core::notifier::Notifier;
use crate::core::service::Service;
use crate::store::{CredentialMapping, CredentialStore};
use serde::Serialize;
use std::sync::Arc;

/// Stripe key environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StripeMode {
    Test,
    Live,
}

impl StripeMode {
    /// Classify a Stripe secret key by its prefix
    ///
    /// # Examples
    ///
    /// ```
    /// use credential_manager::validation::StripeMode;
    ///
    /// assert_eq!(StripeMode::from_secret_key("sk_live_123"), Some(StripeMode::Live));
    /// assert_eq!(StripeMode::from_secret_key("whatever"), None);
    /// ```
    pub fn from_secret_key(key: &str) -> Option<Self> {
        if key.starts_with("sk_test_") {
            Some(Self::Test)
        } else if key.starts_with("sk_live_") {
            Some(Self::Live)
        } else {
            None
        }
    }
}

/// Outcome of validating one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub service: String,
    /// Required fields that are absent or empty
    pub missing: Vec<String>,
    /// Fields whose value does not match the expected format (advisory)
    pub format_warnings: Vec<String>,
    /// Format mismatches promoted to failures by the strict policy
    pub format_errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_mode: Option<StripeMode>,
}

impl ValidationReport {
    fn new(service: &Service) -> Self {
        Self {
            service: service.to_string(),
            missing: Vec::new(),
            format_warnings: Vec::new(),
            format_errors: Vec::new(),
            stripe_mode: None,
        }
    }

    pub fn passed(&self) -> bool {
        self.missing.is_empty() && self.format_errors.is_empty()
    }

    /// Convert a failed report into `ValidationFailed`
    pub fn into_result(self) -> Result<Self> {
        if self.passed() {
            return Ok(self);
        }

        let mut fields = self.missing;
        fields.extend(self.format_errors);
        Err(CredentialError::ValidationFailed {
            service: self.service,
            missing: fields,
        })
    }
}

/// Applies per-service rules to loaded mappings
pub struct ValidationEngine {
    notifier: Arc<dyn Notifier>,
    strict_patterns: bool,
}

impl ValidationEngine {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            strict_patterns: false,
        }
    }

    /// Make format mismatches fail validation
    pub fn with_strict_patterns(mut self, strict: bool) -> Self {
        self.strict_patterns = strict;
        self
    }

    /// Validate the loaded mapping for `service`
    ///
    /// Returns `NotLoaded` if the service has not been loaded and
    /// `UnknownService` if it has no validation rule. A report is returned for
    /// both passing and failing validations; see [`ValidationReport::passed`].
    pub fn validate(&self, store: &CredentialStore, service: &Service) -> Result<ValidationReport> {
        let Some(mapping) = store.get(service) else {
            let err = CredentialError::NotLoaded(service.to_string());
            self.notifier.error(&err.to_string());
            return Err(err);
        };

        let Some(rule) = rule_for(service) else {
            let err = CredentialError::UnknownService(service.to_string());
            self.notifier.error(&err.to_string());
            return Err(err);
        };

        let mut report = ValidationReport::new(service);
        report.missing = missing_fields(rule, mapping);

        if report.missing.is_empty() {
            self.check_patterns(rule, mapping, &mut report);
        } else {
            self.notifier.error(&format!(
                "Missing {} credentials: {}",
                service,
                report.missing.join(", ")
            ));
        }

        if *service == Service::Stripe {
            report.stripe_mode = self.report_stripe_mode(mapping);
        }

        if report.passed() {
            self.notifier.success(&format!(
                "{} credentials validated",
                service.display_name()
            ));
        }

        tracing::debug!(
            service = %service,
            passed = report.passed(),
            missing = report.missing.len(),
            warnings = report.format_warnings.len(),
            "validation finished"
        );
        Ok(report)
    }

    fn check_patterns(
        &self,
        rule: &ValidationRule,
        mapping: &CredentialMapping,
        report: &mut ValidationReport,
    ) {
        for pattern in &rule.patterns {
            let Some(value) = mapping.get(pattern.field).filter(|v| !v.is_empty()) else {
                continue;
            };
            if pattern.regex.is_match(value) {
                continue;
            }

            let message = format!("{} format may be incorrect", pattern.field);
            if self.strict_patterns {
                self.notifier.error(&message);
                report.format_errors.push(pattern.field.to_string());
            } else {
                self.notifier.warning(&message);
                report.format_warnings.push(pattern.field.to_string());
            }
        }
    }

    fn report_stripe_mode(&self, mapping: &CredentialMapping) -> Option<StripeMode> {
        let mode = StripeMode::from_secret_key(mapping.get(STRIPE_SECRET_KEY)?)?;
        match mode {
            StripeMode::Test => self.notifier.info("Using Stripe TEST mode"),
            StripeMode::Live => self
                .notifier
                .warning("Using Stripe LIVE mode - be careful!"),
        }
        Some(mode)
    }
}

fn missing_fields(rule: &ValidationRule, mapping: &CredentialMapping) -> Vec<String> {
    rule.required
        .iter()
        .filter(|field| mapping.get(field).is_none_or(str::is_empty))
        .map(|field| field.to_string())
        .collect()
}
