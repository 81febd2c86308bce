//! Built-in validation rules per service
//!
//! A rule lists the fields that must be present and non-empty, plus advisory
//! format patterns for some of them.

use crate::core::service::Service;
use lazy_static::lazy_static;
use regex::Regex;

/// Advisory format check for one field
#[derive(Debug)]
pub struct FieldPattern {
    pub field: &'static str,
    pub regex: Regex,
}

/// Required fields and format hints for one service
#[derive(Debug)]
pub struct ValidationRule {
    pub required: &'static [&'static str],
    pub patterns: Vec<FieldPattern>,
}

impl ValidationRule {
    /// Pattern attached to `field`, if any
    pub fn pattern_for(&self, field: &str) -> Option<&Regex> {
        self.patterns
            .iter()
            .find(|p| p.field == field)
            .map(|p| &p.regex)
    }
}

pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const SUPABASE_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";

pub const STRIPE_SECRET_KEY: &str = "STRIPE_SECRET_KEY";
pub const STRIPE_PUBLISHABLE_KEY: &str = "STRIPE_PUBLISHABLE_KEY";

pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_REGION: &str = "AWS_REGION";
pub const AWS_S3_BUCKET: &str = "AWS_S3_BUCKET";

fn pattern(field: &'static str, regex: &str) -> FieldPattern {
    FieldPattern {
        field,
        regex: Regex::new(regex).unwrap(),
    }
}

lazy_static! {
    static ref SUPABASE_RULE: ValidationRule = ValidationRule {
        required: &[SUPABASE_URL, SUPABASE_ANON_KEY, SUPABASE_SERVICE_ROLE_KEY],
        patterns: vec![
            pattern(SUPABASE_URL, r"^https://.*\.supabase\.co$"),
            // Supabase keys are JWTs; base64 of `{"` starts with `eyJ`
            pattern(SUPABASE_ANON_KEY, r"^eyJ"),
            pattern(SUPABASE_SERVICE_ROLE_KEY, r"^eyJ"),
        ],
    };

    static ref STRIPE_RULE: ValidationRule = ValidationRule {
        required: &[STRIPE_SECRET_KEY, STRIPE_PUBLISHABLE_KEY],
        patterns: vec![
            pattern(STRIPE_SECRET_KEY, r"^sk_(test|live)_"),
            pattern(STRIPE_PUBLISHABLE_KEY, r"^pk_(test|live)_"),
        ],
    };

    static ref AWS_RULE: ValidationRule = ValidationRule {
        required: &[AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_REGION, AWS_S3_BUCKET],
        patterns: vec![
            pattern(AWS_ACCESS_KEY_ID, r"^AKIA"),
            pattern(AWS_REGION, r"^[a-z]{2}-[a-z]+-[0-9]$"),
        ],
    };
}

/// Services that have a validation rule, in the order "validate all" runs them
pub const VALIDATED_SERVICES: [Service; 3] = [Service::Supabase, Service::Stripe, Service::Aws];

/// Rule for `service`, or `None` when the service has no rule
pub fn rule_for(service: &Service) -> Option<&'static ValidationRule> {
    match service {
        Service::Supabase => Some(&*SUPABASE_RULE),
        Service::Stripe => Some(&*STRIPE_RULE),
        Service::Aws => Some(&*AWS_RULE),
        Service::Github | Service::Other(_) => None,
    }
}
