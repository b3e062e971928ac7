//! Environment access and variable interpolation for configuration

use super::error::ConfigError;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
});

/// Source of environment variables.
///
/// Settings and the config validator read through this trait so tests can
/// supply a map instead of touching the process environment.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;

    /// The variable's value, treating an empty string as unset
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.trim().is_empty())
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// Replace every `${VAR}` in `content` with its value from `env`.
///
/// Fails on the first referenced variable that is not set.
pub fn interpolate_env_vars(content: &str, env: &impl EnvSource) -> Result<String, ConfigError> {
    let mut missing = None;

    let result = ENV_VAR_PATTERN.replace_all(content, |caps: &regex::Captures<'_>| {
        let var_name = &caps[1];
        match env.var(var_name) {
            Some(value) => value,
            None => {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            }
        }
    });

    if let Some(var) = missing {
        return Err(ConfigError::EnvVarNotFound { var });
    }

    Ok(result.into_owned())
}
