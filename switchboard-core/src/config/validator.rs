//! Environment checks for provider credentials

use super::env::{EnvSource, ProcessEnv};
use super::settings::Settings;
use crate::providers::adapter::ProviderType;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{error, info};

/// Variables each provider type needs, and the ones it can use
struct ProviderVars {
    required: &'static [&'static str],
    optional: &'static [&'static str],
}

fn provider_vars(provider_type: ProviderType) -> ProviderVars {
    match provider_type {
        ProviderType::OpenAI => ProviderVars {
            required: &["OPENAI_API_KEY"],
            optional: &["OPENAI_MODEL"],
        },
        ProviderType::Groq => ProviderVars {
            required: &["GROQ_API_KEY"],
            optional: &["GROQ_MODEL"],
        },
        ProviderType::WatsonX => ProviderVars {
            required: &["WATSONX_API_KEY", "WATSONX_PROJECT_ID"],
            optional: &["WATSONX_MODEL", "WATSONX_URL"],
        },
    }
}

/// Variables a provider type can use beyond its required ones
pub fn optional_vars(provider_type: ProviderType) -> &'static [&'static str] {
    provider_vars(provider_type).optional
}

/// Outcome of checking one provider type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Missing variables in declaration order
    pub missing_vars: Vec<String>,
}

/// Results for every supported provider type, in canonical order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    pub entries: Vec<(ProviderType, ValidationResult)>,
}

impl ConfigReport {
    /// Check loaded settings instead of the environment.
    ///
    /// A `*_PROJECT_ID` variable counts as present when the backend has a
    /// project id, every other required variable when it has an API key.
    pub fn from_settings(settings: &Settings) -> Self {
        let entries = ProviderType::ALL
            .iter()
            .map(|&provider_type| {
                let backend = settings.backend(provider_type);
                let missing_vars: Vec<String> = provider_vars(provider_type)
                    .required
                    .iter()
                    .filter(|var| {
                        if var.ends_with("_PROJECT_ID") {
                            backend.project_id.as_deref().is_none_or(str::is_empty)
                        } else {
                            !backend.has_api_key()
                        }
                    })
                    .map(|var| var.to_string())
                    .collect();

                let result = ValidationResult {
                    valid: missing_vars.is_empty(),
                    missing_vars,
                };
                (provider_type, result)
            })
            .collect();

        Self { entries }
    }

    pub fn get(&self, provider_type: ProviderType) -> Option<&ValidationResult> {
        self.entries
            .iter()
            .find(|(t, _)| *t == provider_type)
            .map(|(_, r)| r)
    }

    pub fn configured(&self) -> impl Iterator<Item = ProviderType> + '_ {
        self.entries.iter().filter(|(_, r)| r.valid).map(|(t, _)| *t)
    }

    pub fn any_valid(&self) -> bool {
        self.configured().next().is_some()
    }

    pub fn summary(&self) -> String {
        let rule = "=".repeat(50);

        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "LLM Provider Configuration Status:");
        let _ = writeln!(out, "{rule}");

        for (provider_type, result) in &self.entries {
            let (icon, status) = if result.valid {
                ("✓", "Configured")
            } else {
                ("✗", "Not configured")
            };
            let _ = writeln!(
                out,
                "{icon} {}: {status}",
                provider_type.as_str().to_uppercase()
            );
            if !result.valid {
                let _ = writeln!(out, "   Missing: {}", result.missing_vars.join(", "));
            }
        }

        let _ = write!(out, "{rule}");
        out
    }
}

/// Checks the environment for the credentials each provider needs
#[derive(Debug, Clone, Default)]
pub struct ConfigValidator<E: EnvSource = ProcessEnv> {
    env: E,
}

impl ConfigValidator<ProcessEnv> {
    /// Validator reading the process environment
    pub fn new() -> Self {
        Self { env: ProcessEnv }
    }
}

impl<E: EnvSource> ConfigValidator<E> {
    pub fn with_env(env: E) -> Self {
        Self { env }
    }

    /// Check the required variables for `provider_type`.
    ///
    /// An unknown type is reported as invalid with a single
    /// `"Unknown provider: <type>"` entry.
    pub fn validate_provider_config(&self, provider_type: &str) -> ValidationResult {
        let Some(kind) = ProviderType::parse(provider_type) else {
            return ValidationResult {
                valid: false,
                missing_vars: vec![format!("Unknown provider: {provider_type}")],
            };
        };

        let missing_vars: Vec<String> = provider_vars(kind)
            .required
            .iter()
            .filter(|var| self.env.non_empty(var).is_none())
            .map(|var| var.to_string())
            .collect();

        ValidationResult {
            valid: missing_vars.is_empty(),
            missing_vars,
        }
    }

    pub fn validate_all_configs(&self) -> ConfigReport {
        ConfigReport {
            entries: ProviderType::ALL
                .iter()
                .map(|t| (*t, self.validate_provider_config(t.as_str())))
                .collect(),
        }
    }

    /// Human-readable configuration status for every provider type
    pub fn summary(&self) -> String {
        self.validate_all_configs().summary()
    }

    /// Log the summary; true when at least one provider is configured
    pub fn validate_environment(&self) -> bool {
        let report = self.validate_all_configs();
        info!("\n{}", report.summary());

        if report.any_valid() {
            let configured: Vec<&str> = report.configured().map(|t| t.as_str()).collect();
            info!("Configured providers: {}", configured.join(", "));
            true
        } else {
            error!("No LLM providers are properly configured!");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn validator(pairs: &[(&str, &str)]) -> ConfigValidator<HashMap<String, String>> {
        ConfigValidator::with_env(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_unknown_provider() {
        let result = validator(&[]).validate_provider_config("anthropic");
        assert!(!result.valid);
        assert_eq!(result.missing_vars, vec!["Unknown provider: anthropic"]);
    }

    #[test]
    fn test_watsonx_reports_missing_in_order() {
        let result = validator(&[]).validate_provider_config("watsonx");
        assert_eq!(
            result.missing_vars,
            vec!["WATSONX_API_KEY", "WATSONX_PROJECT_ID"]
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let result = validator(&[("OPENAI_API_KEY", "")]).validate_provider_config("openai");
        assert!(!result.valid);
        assert_eq!(result.missing_vars, vec!["OPENAI_API_KEY"]);
    }

    #[test]
    fn test_summary_format() {
        let summary = validator(&[("GROQ_API_KEY", "gsk")]).summary();
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines[0], "=".repeat(50));
        assert_eq!(lines[1], "LLM Provider Configuration Status:");
        assert_eq!(lines[3], "✗ OPENAI: Not configured");
        assert_eq!(lines[4], "   Missing: OPENAI_API_KEY");
        assert_eq!(lines[5], "✓ GROQ: Configured");
        assert_eq!(lines[6], "✗ WATSONX: Not configured");
        assert_eq!(lines[7], "   Missing: WATSONX_API_KEY, WATSONX_PROJECT_ID");
        assert_eq!(*lines.last().unwrap(), "=".repeat(50));
    }

    #[test]
    fn test_validate_environment() {
        assert!(!validator(&[]).validate_environment());
        assert!(validator(&[("OPENAI_API_KEY", "sk")]).validate_environment());
    }

    #[test]
    fn test_report_from_settings() {
        let mut settings = Settings::default();
        settings.groq.api_key = Some("gsk_abcdefgh1234".into());
        settings.watsonx.api_key = Some("ibm-key".into());

        let report = ConfigReport::from_settings(&settings);
        assert!(!report.get(ProviderType::OpenAI).unwrap().valid);
        assert!(report.get(ProviderType::Groq).unwrap().valid);
        assert_eq!(
            report.get(ProviderType::WatsonX).unwrap().missing_vars,
            vec!["WATSONX_PROJECT_ID"]
        );

        settings.watsonx.project_id = Some("proj".to_string());
        let report = ConfigReport::from_settings(&settings);
        let configured: Vec<ProviderType> = report.configured().collect();
        assert_eq!(configured, vec![ProviderType::Groq, ProviderType::WatsonX]);
    }

    #[test]
    fn test_report_from_default_settings_matches_empty_env() {
        let from_settings = ConfigReport::from_settings(&Settings::default());
        assert_eq!(from_settings, validator(&[]).validate_all_configs());
        assert_eq!(from_settings.summary(), validator(&[]).summary());
    }

    #[test]
    fn test_optional_vars() {
        assert_eq!(optional_vars(ProviderType::WatsonX), &["WATSONX_MODEL", "WATSONX_URL"]);
    }
}
