//! Switchboard CLI - check provider configuration and talk to a backend.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

/// Switchboard: one calling convention for OpenAI, Groq and WatsonX
#[derive(Debug, Parser)]
#[command(name = "switchboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (can be repeated: -v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (YAML or JSON). Defaults to environment variables.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show which providers have their credentials configured.
    Check,

    /// List supported provider types and the active one.
    Providers,

    /// Send one message and print the reply.
    Chat(commands::ChatArgs),

    /// Send a test message through every configured provider.
    Smoke,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Check => commands::check::execute(cli.config.as_deref()),
        Command::Providers => commands::providers::execute(cli.config.as_deref()),
        Command::Chat(args) => commands::chat::execute(cli.config.as_deref(), args).await,
        Command::Smoke => commands::smoke::execute(cli.config.as_deref()).await,
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        ExitCode::FAILURE
    })
}
