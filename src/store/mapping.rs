//! In-memory key/value mapping for one service

use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::fmt;

/// Loaded credentials for a single service
///
/// Values are held as [`SecretString`] so `Debug` output never reveals them.
#[derive(Default)]
pub struct CredentialMapping {
    entries: BTreeMap<String, SecretString>,
}

impl CredentialMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair; an existing key is overwritten
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value: String = value.into();
        self.entries
            .insert(key.into(), SecretString::new(value.into_boxed_str()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.expose_secret())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Pairs in key order, with values exposed
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.expose_secret()))
    }

    /// Serialize back to `KEY=value` lines
    ///
    /// # Examples
    ///
    /// ```
    /// use credential_manager::store::CredentialMapping;
    ///
    /// let mut mapping = CredentialMapping::new();
    /// mapping.insert("B", "2");
    /// mapping.insert("A", "x=y");
    /// assert_eq!(mapping.to_env_lines(), "A=x=y\nB=2\n");
    /// ```
    pub fn to_env_lines(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}\n", k, v))
            .collect()
    }
}

impl PartialEq for CredentialMapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for CredentialMapping {}

impl fmt::Debug for CredentialMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.keys().map(|k| (k, "[REDACTED]")))
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CredentialMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites() {
        let mut mapping = CredentialMapping::new();
        mapping.insert("KEY", "first");
        mapping.insert("KEY", "second");

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("KEY"), Some("second"));
    }

    #[test]
    fn test_debug_hides_values() {
        let mapping: CredentialMapping = [("STRIPE_SECRET_KEY", "sk_live_abcdef")]
            .into_iter()
            .collect();

        let debug = format!("{:?}", mapping);
        assert!(debug.contains("STRIPE_SECRET_KEY"));
        assert!(!debug.contains("sk_live_abcdef"));
    }

    #[test]
    fn test_equality_compares_values() {
        let a: CredentialMapping = [("K", "1")].into_iter().collect();
        let b: CredentialMapping = [("K", "1")].into_iter().collect();
        let c: CredentialMapping = [("K", "2")].into_iter().collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_keys_sorted() {
        let mapping: CredentialMapping = [("Z", ""), ("A", ""), ("M", "")].into_iter().collect();
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["A", "M", "Z"]);
    }
}
