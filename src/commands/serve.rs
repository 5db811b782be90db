use anyhow::Result;
use colored::Colorize;
use hybrid_savings::{config::Config, server};
use tracing::info;

/// Execute the serve command
///
/// Blocks until a shutdown signal is received
pub async fn execute(cfg: Config) -> Result<()> {
    println!(
        "{} {}:{}",
        "Starting hybrid savings API on".green(),
        cfg.server.host,
        cfg.server.port
    );
    info!(data_source = ?cfg.data_source.kind, "Starting server in foreground mode");

    server::start_server(cfg).await
}
