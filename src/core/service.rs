//! Service identity and credential file naming

use crate::core::error::{CredentialError, Result};
use std::fmt;

/// Suffix of a live credential file
pub const ENV_SUFFIX: &str = ".env";

/// Suffix of a redacted template file
pub const TEMPLATE_SUFFIX: &str = ".env.template";

/// A named external dependency whose secrets live in one credential file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Service {
    Supabase,
    Stripe,
    Aws,
    Github,
    Other(String),
}

impl Service {
    /// Services with a built-in template, in the order "all" iterates them
    pub const KNOWN: [Service; 4] = [
        Service::Supabase,
        Service::Stripe,
        Service::Aws,
        Service::Github,
    ];

    /// Parse a service name, rejecting names that are unsafe as file names
    ///
    /// # Examples
    ///
    /// ```
    /// use credential_manager::Service;
    ///
    /// assert_eq!(Service::parse("stripe").unwrap(), Service::Stripe);
    /// assert_eq!(Service::parse("redis").unwrap(), Service::Other("redis".into()));
    /// assert!(Service::parse("../etc").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(CredentialError::InvalidServiceName(name.to_string()));
        }

        Ok(match name {
            "supabase" => Self::Supabase,
            "stripe" => Self::Stripe,
            "aws" => Self::Aws,
            "github" => Self::Github,
            other => Self::Other(other.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Supabase => "supabase",
            Self::Stripe => "stripe",
            Self::Aws => "aws",
            Self::Github => "github",
            Self::Other(name) => name,
        }
    }

    /// Human-readable name used in success messages ("Stripe credentials validated")
    pub fn display_name(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// File name of the live credential file (`<service>.env`)
    pub fn env_file_name(&self) -> String {
        format!("{}{}", self.as_str(), ENV_SUFFIX)
    }

    /// File name of the template file (`<service>.env.template`)
    pub fn template_file_name(&self) -> String {
        format!("{}{}", self.as_str(), TEMPLATE_SUFFIX)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
