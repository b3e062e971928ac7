//! Provider factory
//!
//! Maps a symbolic provider type plus credentials to a concrete, available
//! provider instance. The factory never hands back a provider whose
//! `is_available()` is false.

use crate::config::Settings;
use crate::providers::adapter::{Provider, ProviderConfig, ProviderType};
use crate::providers::error::{ProviderError, ProviderResult};
use crate::providers::groq::GroqProvider;
use crate::providers::openai::OpenAIProvider;
use crate::providers::watsonx::{WatsonXProvider, EXTRA_PROJECT_ID};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, error, info};

/// Optional construction parameters
#[derive(Debug, Clone, Default)]
pub struct FactoryOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Required for WatsonX
    pub project_id: Option<String>,
    /// Overrides the backend's public endpoint
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Passed through to `ProviderConfig::extra`
    pub extra: HashMap<String, Value>,
}

impl FactoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Factory for creating provider instances
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider for `provider_type` (case-insensitive, trimmed).
    ///
    /// An empty or absent `model` selects the type's default model.
    pub fn create_provider(
        provider_type: &str,
        api_key: &str,
        model: Option<&str>,
        options: FactoryOptions,
    ) -> ProviderResult<Box<dyn Provider>> {
        info!("Creating LLM provider: {}", provider_type.trim().to_lowercase());

        Self::build(provider_type, api_key, model, options).inspect_err(|e| {
            error!("Failed to create provider {}: {}", provider_type.trim(), e);
        })
    }

    /// Create the provider selected by `settings.provider`
    pub fn create_from_settings(settings: &Settings) -> ProviderResult<Box<dyn Provider>> {
        let provider_type = ProviderType::parse(&settings.provider).ok_or_else(|| {
            ProviderError::UnsupportedProviderType {
                received: settings.provider.clone(),
            }
        })?;
        let backend = settings.backend(provider_type);

        let mut options = FactoryOptions::new()
            .with_max_tokens(settings.max_tokens)
            .with_temperature(settings.temperature);
        options.project_id = backend.project_id.clone();
        options.base_url = backend.url.clone();

        let api_key = backend
            .api_key
            .as_ref()
            .map(|k| k.expose_secret())
            .unwrap_or_default();

        Self::create_provider(
            provider_type.as_str(),
            api_key,
            backend.model.as_deref(),
            options,
        )
    }

    /// Supported provider type tags, in canonical order
    pub fn supported_providers() -> Vec<&'static str> {
        ProviderType::ALL.iter().map(ProviderType::as_str).collect()
    }

    fn build(
        provider_type: &str,
        api_key: &str,
        model: Option<&str>,
        options: FactoryOptions,
    ) -> ProviderResult<Box<dyn Provider>> {
        let kind = ProviderType::parse(provider_type).ok_or_else(|| {
            ProviderError::UnsupportedProviderType {
                received: provider_type.trim().to_lowercase(),
            }
        })?;

        let model = model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(kind.default_model());

        let mut config = ProviderConfig::new(
            api_key,
            model,
            options
                .base_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .unwrap_or(kind.default_base_url()),
        );
        if let Some(max_tokens) = options.max_tokens {
            config = config.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = options.temperature {
            config = config.with_temperature(temperature);
        }
        if let Some(timeout_secs) = options.timeout_secs {
            config = config.with_timeout_secs(timeout_secs);
        }
        config.extra.extend(options.extra);
        debug!(
            "Building {} provider with API key {}",
            kind.display_name(),
            config.api_key.partial_redact()
        );

        let provider: Box<dyn Provider> = match kind {
            ProviderType::OpenAI => Box::new(OpenAIProvider::new(config)),
            ProviderType::Groq => Box::new(GroqProvider::new(config)),
            ProviderType::WatsonX => {
                let project_id = options
                    .project_id
                    .filter(|p| !p.trim().is_empty())
                    .ok_or_else(|| ProviderError::MissingRequiredConfig {
                        provider: kind.display_name().to_string(),
                        field: "WATSONX_PROJECT_ID".to_string(),
                    })?;
                Box::new(WatsonXProvider::new(
                    config.with_extra(EXTRA_PROJECT_ID, Value::String(project_id)),
                ))
            }
        };

        if !provider.is_available() {
            return Err(ProviderError::ProviderNotConfigured {
                provider: provider.name().to_string(),
            });
        }

        info!(
            "Successfully created {} provider with model: {}",
            provider.name(),
            provider.model()
        );
        Ok(provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_providers_order() {
        assert_eq!(ProviderFactory::supported_providers(), vec!["openai", "groq", "watsonx"]);
    }

    #[test]
    fn test_empty_model_falls_back_to_default() {
        let provider =
            ProviderFactory::create_provider("groq", "gsk-test", Some(""), FactoryOptions::new())
                .unwrap();
        assert_eq!(provider.model(), "llama3-70b-8192");
    }

    #[test]
    fn test_project_id_from_extra_is_not_enough() {
        // The project id must come through the dedicated option.
        let options = FactoryOptions::new().with_extra(EXTRA_PROJECT_ID, Value::from("p"));
        let err = ProviderFactory::create_provider("watsonx", "key", None, options).err().unwrap();
        assert!(matches!(err, ProviderError::MissingRequiredConfig { .. }));
    }
}
