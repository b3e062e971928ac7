use super::load_settings;
use anyhow::Context;
use clap::Args;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use switchboard_core::{ChatService, PerformanceMonitor, ProviderFactory, RetryPolicy};

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Message to send.
    pub message: String,

    /// Override the provider type from settings.
    #[arg(short, long, value_name = "TYPE")]
    pub provider: Option<String>,

    /// Attempts per message, including the first.
    #[arg(long, default_value_t = 3)]
    pub retries: u32,
}

pub async fn execute(config: Option<&Path>, args: ChatArgs) -> anyhow::Result<ExitCode> {
    let mut settings = load_settings(config)?;
    if let Some(provider) = args.provider {
        settings.provider = provider.trim().to_lowercase();
    }

    let provider = ProviderFactory::create_from_settings(&settings)
        .with_context(|| format!("could not create provider '{}'", settings.provider))?;

    let monitor = Arc::new(PerformanceMonitor::new());
    let retry = RetryPolicy::new(args.retries);
    let service = ChatService::new(Arc::from(provider), monitor.clone(), retry);

    let status = service.status();
    println!("{} ({})", status.name, status.model);

    let reply = service.chat(&args.message, &[]).await?;
    println!();
    println!("{}", reply.reply);
    println!();
    println!("{}", serde_json::to_string_pretty(&monitor.get_stats(None))?);

    if reply.success {
        Ok(ExitCode::SUCCESS)
    } else {
        if let Some(error) = reply.error {
            eprintln!("Error: {error}");
        }
        Ok(ExitCode::FAILURE)
    }
}
