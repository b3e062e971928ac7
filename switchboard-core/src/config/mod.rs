//! Configuration module for Switchboard
//!
//! Settings are read from the environment or from a YAML/JSON file whose
//! `${VAR}` placeholders are filled from the environment before parsing.

mod env;
mod error;
mod secrets;
mod settings;
mod validator;

pub use env::{interpolate_env_vars, EnvSource, ProcessEnv};
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrorKind};
pub use secrets::SecretString;
pub use settings::{BackendSettings, Settings};
pub use validator::{optional_vars, ConfigReport, ConfigValidator, ValidationResult};

use std::fs;
use std::path::Path;

fn read_interpolated(path: &Path, env: &impl EnvSource) -> ConfigResult<String> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    interpolate_env_vars(&content, env)
}

/// Load settings from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P, env: &impl EnvSource) -> ConfigResult<Settings> {
    let path = path.as_ref();
    let interpolated = read_interpolated(path, env)?;

    let settings: Settings =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;

    settings.validate()?;
    Ok(settings)
}

/// Load settings from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P, env: &impl EnvSource) -> ConfigResult<Settings> {
    let path = path.as_ref();
    let interpolated = read_interpolated(path, env)?;

    let settings: Settings =
        serde_json::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })?;

    settings.validate()?;
    Ok(settings)
}

/// Load settings from a file, picking the format from its extension
pub fn load_from_file<P: AsRef<Path>>(path: P, env: &impl EnvSource) -> ConfigResult<Settings> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_from_json(path, env),
        Some("yaml") | Some("yml") => load_from_yaml(path, env),
        other => Err(ConfigError::Invalid {
            message: format!(
                "unsupported config file extension {:?} for '{}'",
                other.unwrap_or(""),
                path.display()
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_settings() {
        let yaml = r#"
provider: groq
groq:
  api_key: gsk-test
  model: llama3-8b-8192
max_tokens: 200
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.provider, "groq");
        assert_eq!(settings.groq.model.as_deref(), Some("llama3-8b-8192"));
        assert_eq!(settings.max_tokens, 200);
        // Unspecified fields keep their defaults
        assert_eq!(settings.temperature, 0.7);
        assert!(!settings.openai.has_api_key());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = load_from_file("settings.toml", &ProcessEnv).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
