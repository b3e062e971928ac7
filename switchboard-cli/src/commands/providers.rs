use super::load_settings;
use std::path::Path;
use std::process::ExitCode;
use switchboard_core::config::optional_vars;
use switchboard_core::ProviderType;

fn provider_line(provider_type: ProviderType, current: &str) -> String {
    let name = provider_type.as_str();
    let marker = if name == current { "*" } else { " " };
    format!(
        "  {marker} {name:8} (optional: {})",
        optional_vars(provider_type).join(", ")
    )
}

pub fn execute(config: Option<&Path>) -> anyhow::Result<ExitCode> {
    let settings = load_settings(config)?;

    println!("Supported providers:");
    for provider_type in ProviderType::ALL {
        println!("{}", provider_line(provider_type, &settings.provider));
    }
    println!();
    println!("Current provider: {}", settings.provider);

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_line_marks_current_and_lists_optional_vars() {
        assert_eq!(
            provider_line(ProviderType::WatsonX, "watsonx"),
            "  * watsonx  (optional: WATSONX_MODEL, WATSONX_URL)"
        );
        assert_eq!(
            provider_line(ProviderType::Groq, "watsonx"),
            "    groq     (optional: GROQ_MODEL)"
        );
    }
}
