use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hybrid-savings", version, about = "Hybrid vehicle fuel savings estimator")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP API (default)
    Serve,

    /// Compare a vehicle against the hybrid lineup
    Calculate {
        /// Brand id of the current vehicle
        #[arg(short, long)]
        brand: i64,

        /// Model id of the current vehicle
        #[arg(short, long)]
        model: i64,

        /// Monthly fuel spend
        #[arg(short, long)]
        spend: f64,

        /// Hybrid id to show annual savings for
        #[arg(long)]
        select: Option<i64>,
    },

    /// List vehicle brands
    Brands,

    /// List models of a brand
    Models {
        /// Brand id
        #[arg(short, long)]
        brand: i64,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show current configuration (API key masked)
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Serve if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
