pub mod engine;
pub mod rules;

pub use engine::{StripeMode, ValidationEngine, ValidationReport};
pub use rules::{FieldPattern, VALIDATED_SERVICES, ValidationRule, rule_for};
