//! Credential status for every provider type.

use super::load_settings;
use std::path::Path;
use std::process::ExitCode;
use switchboard_core::config::{ConfigReport, Settings};
use switchboard_core::ConfigValidator;

/// Report for the loaded settings, or for the process environment
fn report(settings: Option<&Settings>) -> ConfigReport {
    match settings {
        Some(settings) => ConfigReport::from_settings(settings),
        None => ConfigValidator::new().validate_all_configs(),
    }
}

/// With `--config`, checks the credentials in that file; otherwise checks
/// the environment variables each provider reads.
pub fn execute(config: Option<&Path>) -> anyhow::Result<ExitCode> {
    let settings = config.map(|path| load_settings(Some(path))).transpose()?;
    let report = report(settings.as_ref());
    println!("{}", report.summary());

    if report.any_valid() {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("No LLM providers are properly configured");
        Ok(ExitCode::FAILURE)
    }
}
