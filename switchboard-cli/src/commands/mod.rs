//! CLI commands.

pub mod chat;
pub mod check;
pub mod providers;
pub mod smoke;

pub use chat::ChatArgs;

use anyhow::Context;
use std::path::Path;
use switchboard_core::config::{self, ProcessEnv, Settings};

/// Settings from `path` when given, otherwise from the environment
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => config::load_from_file(path, &ProcessEnv)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Settings::from_env(&ProcessEnv).context("invalid settings in environment"),
    }
}
