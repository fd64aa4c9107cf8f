//! swarmchat - terminal client for an AI agent chat server
//!
#![doc = "swarmchat - terminal client for an AI agent chat server"]
#![doc = "Main entry point for the swarmchat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use swarmchat::cli::{Cli, Commands};
use swarmchat::commands;
use swarmchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { .. } => {
            tracing::info!("Starting interactive chat with {}", config.agent.name);
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Send { message, json, .. } => {
            tracing::debug!("Sending one-shot message to {}", config.server.base_url);
            commands::send::run_send(config, message, json).await?;
            Ok(())
        }
        Commands::Settings { command } => {
            tracing::info!("Starting settings command");
            commands::settings::handle_settings(&config, command).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so chat output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "swarmchat=debug"
    } else {
        "swarmchat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
