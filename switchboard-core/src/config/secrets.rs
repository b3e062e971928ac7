//! Secret handling for credentials
//!
//! API keys travel through settings and provider configs wrapped in
//! [`SecretString`], which never prints its value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vendor key prefixes kept visible by [`SecretString::partial_redact`]
const KEY_PREFIXES: [&str; 2] = ["gsk_", "sk-"];

/// A wrapper type for sensitive strings like API keys
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    /// Create a new secret string
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Get the actual value (use with caution)
    pub fn expose_secret(&self) -> &str {
        &self.value
    }

    /// Check if the secret is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Get a partially redacted version for debugging
    pub fn partial_redact(&self) -> String {
        if self.value.is_empty() {
            return "[EMPTY]".to_string();
        }

        let chars: Vec<char> = self.value.chars().collect();
        let len = chars.len();
        if len <= 8 {
            "[REDACTED]".to_string()
        } else {
            let head_len = KEY_PREFIXES
                .iter()
                .find(|p| self.value.starts_with(*p))
                .map_or(2, |p| p.len());
            let head: String = chars[..head_len].iter().collect();
            let tail: String = chars[len - 4..].iter().collect();
            format!("{head}...{tail}")
        }
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
