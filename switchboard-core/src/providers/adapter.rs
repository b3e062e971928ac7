//! Provider adapter trait and configuration
//!
//! Defines the core abstraction every text-generation backend implements, the
//! closed set of backend types, and the configuration a provider is built from.

use crate::config::SecretString;
use crate::protocol::{Generation, GenerationOptions, Message};
use crate::providers::error::ProviderResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Default completion budget when neither the caller nor the config sets one
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default per-request timeout for backend calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Core provider trait that all backends must implement
#[async_trait]
pub trait Provider: Send + Sync {
    /// Display name of the provider (`"OpenAI"`, `"Groq"`, `"WatsonX"`)
    fn name(&self) -> &str;

    /// Model the provider was constructed with
    fn model(&self) -> &str;

    /// Whether the backend client was constructed and credentials are present
    fn is_available(&self) -> bool;

    /// Generate a reply for the conversation, returning the backend's token count
    async fn generate_with_usage(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> ProviderResult<Generation>;

    /// Generate a reply for the conversation
    async fn generate_response(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> ProviderResult<String> {
        Ok(self.generate_with_usage(messages, options).await?.text)
    }

    /// Descriptive snapshot of this provider
    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: self.name().to_string(),
            model: self.model().to_string(),
            available: self.is_available(),
        }
    }
}

/// Provider details reported to outer layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
    pub available: bool,
}

/// Supported backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    Groq,
    WatsonX,
}

impl ProviderType {
    /// All supported types in their canonical order
    pub const ALL: [ProviderType; 3] = [
        ProviderType::OpenAI,
        ProviderType::Groq,
        ProviderType::WatsonX,
    ];

    /// Parse a type tag, ignoring case and surrounding whitespace
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == normalized)
    }

    /// Canonical lowercase tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "openai",
            ProviderType::Groq => "groq",
            ProviderType::WatsonX => "watsonx",
        }
    }

    /// Name reported by [`Provider::name`]
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "OpenAI",
            ProviderType::Groq => "Groq",
            ProviderType::WatsonX => "WatsonX",
        }
    }

    /// Model used when the caller does not pick one
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "gpt-3.5-turbo",
            ProviderType::Groq => "llama3-70b-8192",
            ProviderType::WatsonX => "ibm/granite-13b-chat-v2",
        }
    }

    /// Base URL of the backend's public API
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "https://api.openai.com/v1",
            ProviderType::Groq => "https://api.groq.com/openai/v1",
            ProviderType::WatsonX => "https://us-south.ml.cloud.ibm.com",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration a provider instance is built from. Immutable once the
/// provider exists.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Backend-specific settings (for example WatsonX `project_id`)
    pub extra: HashMap<String, Value>,
}

impl ProviderConfig {
    /// Create a config with the default budget, temperature and timeout
    pub fn new(
        api_key: impl Into<SecretString>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            extra: HashMap::new(),
        }
    }

    /// Defaults for a given backend type
    pub fn for_type(provider_type: ProviderType, api_key: impl Into<SecretString>) -> Self {
        Self::new(
            api_key,
            provider_type.default_model(),
            provider_type.default_base_url(),
        )
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// String value from `extra`, if present and non-empty
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Effective budget and temperature for one call
    pub fn resolve(&self, options: &GenerationOptions) -> (u32, f32) {
        (
            options.max_tokens.unwrap_or(self.max_tokens),
            options.temperature.unwrap_or(self.temperature),
        )
    }
}
