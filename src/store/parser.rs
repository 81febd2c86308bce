//! Line-oriented `KEY=value` parser
//!
//! Parsing rules:
//! - each line is trimmed; blank lines and lines starting with `#` are skipped
//! - the first `=` separates key from value, later ones belong to the value
//! - key and value are trimmed
//! - duplicate keys: the last occurrence wins
//! - lines without `=` are skipped (lenient) or rejected (strict)

use super::mapping::CredentialMapping;
use crate::core::error::{CredentialError, Result};

/// Parser for credential file contents
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialParser {
    strict: bool,
}

impl CredentialParser {
    /// Lenient parser: malformed lines are ignored
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser that rejects lines without `=`
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn with_strict(strict: bool) -> Self {
        Self { strict }
    }

    /// Parse raw file contents into a mapping
    ///
    /// # Examples
    ///
    /// ```
    /// use credential_manager::store::CredentialParser;
    ///
    /// let mapping = CredentialParser::new()
    ///     .parse("# comment\nA=b=c\n\n  KEY = value  \nnot a pair\n")
    ///     .unwrap();
    ///
    /// assert_eq!(mapping.get("A"), Some("b=c"));
    /// assert_eq!(mapping.get("KEY"), Some("value"));
    /// assert_eq!(mapping.len(), 2);
    /// ```
    pub fn parse(&self, content: &str) -> Result<CredentialMapping> {
        let mut mapping = CredentialMapping::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => mapping.insert(key.trim(), value.trim()),
                None if self.strict => {
                    return Err(CredentialError::MalformedLine { line: idx + 1 });
                }
                None => {
                    tracing::debug!(line = idx + 1, "skipping line without '='");
                }
            }
        }

        Ok(mapping)
    }
}
