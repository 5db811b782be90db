use anyhow::Result;
use clap::Parser;
use std::path::Path;

mod cli;
mod commands;

use cli::{Commands, ConfigCommands};
use hybrid_savings::{config, config::Config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Dispatch to appropriate command handler
    match args.get_command() {
        Commands::Serve => commands::serve::execute(load(&args.config)?).await?,
        Commands::Calculate {
            brand,
            model,
            spend,
            select,
        } => {
            let cfg = load(&args.config)?;
            commands::calculate::execute(&cfg, brand, model, spend, select).await?;
        }
        Commands::Brands => commands::catalog::brands(&load(&args.config)?).await?,
        Commands::Models { brand } => {
            commands::catalog::models(&load(&args.config)?, brand).await?;
        }
        Commands::Config { action } => {
            let cfg = load(&args.config)?;
            match action {
                ConfigCommands::Show => commands::config::show(&cfg)?,
                ConfigCommands::Validate => commands::config::validate(&cfg)?,
            }
        }
        Commands::Version => {
            println!("Hybrid Savings v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Load configuration and start logging with its level and format
fn load(config_path: &Path) -> Result<Config> {
    let cfg = config::load_config(config_path)?;
    init_tracing(&cfg.server.log_level, &cfg.server.log_format);
    Ok(cfg)
}
