mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use deepscout_ai::LlmProvider;
use deepscout_core::{ResearchConfig, ResearchSystem, Settings};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::CliConfig;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error::handle_error(err);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let cli_config = CliConfig::load();
    cli_config.apply_api_key_env();

    init_tracing(cli.verbose);

    let settings = Settings::from_env()?;
    let db_path = cli
        .db_path
        .clone()
        .or_else(|| cli_config.default.db_path.clone())
        .map(PathBuf::from);
    tracing::debug!(?db_path, "CLI initialized");

    match cli.command {
        Commands::Research(args) => {
            let mut config = ResearchConfig::from_settings(&settings);
            config.verbose = cli.verbose;

            let provider = args
                .provider
                .clone()
                .or_else(|| cli_config.default.provider.clone());
            if let Some(name) = provider {
                config.provider = LlmProvider::parse(&name)?;
            }
            config.model = args
                .model
                .clone()
                .or_else(|| cli_config.default.model.clone());
            if let Some(max) = args.max_iterations {
                config.max_iterations = max;
            }
            config.enable_rag = !args.no_rag;
            config.memory_enabled = !args.no_memory;

            let mut system = ResearchSystem::new(settings, config, db_path)?;
            commands::research::run(&mut system, &args, cli.format, cli.verbose).await
        }
        Commands::Memory { command } => {
            let config = ResearchConfig::from_settings(&settings);
            let mut system = ResearchSystem::new(settings, config, db_path)?;
            commands::memory::run(&mut system, command, cli.format)
        }
        Commands::Sessions { command } => {
            let config = ResearchConfig::from_settings(&settings);
            let system = ResearchSystem::new(settings, config, db_path)?;
            commands::sessions::run(&system, command, cli.format)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,deepscout=debug,deepscout_ai=debug,deepscout_core=debug,deepscout_storage=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
