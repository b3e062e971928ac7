//! Typed application settings
//!
//! Settings come either from environment variables or from a YAML/JSON file.
//! Both routes end in [`Settings::validate`].

use super::env::EnvSource;
use super::error::{ConfigError, ValidationError};
use super::secrets::SecretString;
use crate::providers::adapter::{ProviderType, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use url::Url;

/// Credentials and model selection for a single backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub api_key: Option<SecretString>,
    pub model: Option<String>,
    /// WatsonX only
    pub project_id: Option<String>,
    /// Overrides the backend's default endpoint
    pub url: Option<String>,
}

impl BackendSettings {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Provider type tag selecting the active backend
    pub provider: String,
    pub openai: BackendSettings,
    pub groq: BackendSettings,
    pub watsonx: BackendSettings,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderType::OpenAI.as_str().to_string(),
            openai: BackendSettings::default(),
            groq: BackendSettings::default(),
            watsonx: BackendSettings::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl Settings {
    /// Read settings from environment variables.
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_env(env: &impl EnvSource) -> Result<Self, ConfigError> {
        let backend = |prefix: &str| BackendSettings {
            api_key: env
                .non_empty(&format!("{prefix}_API_KEY"))
                .map(SecretString::new),
            model: env.non_empty(&format!("{prefix}_MODEL")),
            project_id: None,
            url: None,
        };

        let mut watsonx = backend("WATSONX");
        watsonx.project_id = env.non_empty("WATSONX_PROJECT_ID");
        watsonx.url = env.non_empty("WATSONX_URL");

        let defaults = Self::default();
        let settings = Self {
            provider: env
                .non_empty("LLM_PROVIDER")
                .map(|p| p.trim().to_lowercase())
                .unwrap_or(defaults.provider),
            openai: backend("OPENAI"),
            groq: backend("GROQ"),
            watsonx,
            max_tokens: parse_var(env, "MAX_TOKENS", "a positive integer")?
                .unwrap_or(defaults.max_tokens),
            temperature: parse_var(env, "TEMPERATURE", "a number between 0 and 2")?
                .unwrap_or(defaults.temperature),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Backend settings for the given provider type
    pub fn backend(&self, provider_type: ProviderType) -> &BackendSettings {
        match provider_type {
            ProviderType::OpenAI => &self.openai,
            ProviderType::Groq => &self.groq,
            ProviderType::WatsonX => &self.watsonx,
        }
    }

    /// The active provider type, if `provider` names a supported one
    pub fn provider_type(&self) -> Option<ProviderType> {
        ProviderType::parse(&self.provider)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider_type().is_none() {
            return Err(ValidationError::invalid_value(
                "provider",
                "one of openai, groq, watsonx",
                self.provider.clone(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ValidationError::out_of_range(
                "max_tokens",
                "must be greater than 0",
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::out_of_range(
                "temperature",
                format!("{} is outside [0, 2]", self.temperature),
            ));
        }

        for provider_type in ProviderType::ALL {
            if let Some(url) = &self.backend(provider_type).url {
                Url::parse(url).map_err(|e| {
                    ValidationError::invalid_url(
                        format!("{}.url", provider_type.as_str()),
                        e.to_string(),
                    )
                })?;
            }
        }

        Ok(())
    }
}

fn parse_var<T: FromStr>(
    env: &impl EnvSource,
    var: &str,
    expected: &str,
) -> Result<Option<T>, ConfigError> {
    match env.non_empty(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                value,
                expected: expected.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_from_empty_env() {
        let settings = Settings::from_env(&env(&[])).unwrap();
        assert_eq!(settings.provider, "openai");
        assert_eq!(settings.max_tokens, 500);
        assert_eq!(settings.temperature, 0.7);
        assert!(!settings.openai.has_api_key());
    }

    #[test]
    fn test_reads_backend_variables() {
        let settings = Settings::from_env(&env(&[
            ("LLM_PROVIDER", "WatsonX"),
            ("WATSONX_API_KEY", "ibm-key"),
            ("WATSONX_PROJECT_ID", "proj"),
            ("WATSONX_URL", "https://eu-de.ml.cloud.ibm.com"),
            ("GROQ_MODEL", "mixtral-8x7b-32768"),
            ("MAX_TOKENS", "256"),
        ]))
        .unwrap();

        assert_eq!(settings.provider_type(), Some(ProviderType::WatsonX));
        assert!(settings.watsonx.has_api_key());
        assert_eq!(settings.watsonx.project_id.as_deref(), Some("proj"));
        assert_eq!(settings.groq.model.as_deref(), Some("mixtral-8x7b-32768"));
        assert_eq!(settings.max_tokens, 256);
    }

    #[test]
    fn test_bad_number_names_the_variable() {
        let err = Settings::from_env(&env(&[("MAX_TOKENS", "lots")])).unwrap_err();
        match err {
            ConfigError::InvalidValue { var, value, .. } => {
                assert_eq!(var, "MAX_TOKENS");
                assert_eq!(value, "lots");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut settings = Settings::default();
        settings.temperature = 2.5;
        assert_eq!(settings.validate().unwrap_err().field_path, "temperature");

        let mut settings = Settings::default();
        settings.max_tokens = 0;
        assert_eq!(settings.validate().unwrap_err().field_path, "max_tokens");
    }

    #[test]
    fn test_validate_rejects_unknown_provider_and_bad_url() {
        let mut settings = Settings::default();
        settings.provider = "anthropic".to_string();
        assert_eq!(settings.validate().unwrap_err().field_path, "provider");

        let mut settings = Settings::default();
        settings.watsonx.url = Some("not a url".to_string());
        assert_eq!(settings.validate().unwrap_err().field_path, "watsonx.url");
    }
}
