use anyhow::Result;
use colored::Colorize;
use hybrid_savings::config::{Config, DataSourceKind};
use tracing::info;

/// Execute the config show command
///
/// Displays the current configuration with the API key masked
pub fn show(cfg: &Config) -> Result<()> {
    info!("Displaying configuration");

    let sanitized = sanitize_secrets(cfg);
    println!("{}", "Current Configuration:".bold());
    println!();
    println!("{}", toml::to_string_pretty(&sanitized)?);

    Ok(())
}

/// Execute the config validate command
///
/// Configuration is validated while loading; this prints a summary
pub fn validate(cfg: &Config) -> Result<()> {
    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!(
        "  {}: {} ({})",
        "Logging".cyan(),
        cfg.server.log_level,
        cfg.server.log_format
    );
    match cfg.data_source.kind {
        DataSourceKind::Rest => println!(
            "  {}: rest {}",
            "Data Source".cyan(),
            cfg.data_source.base_url.as_deref().unwrap_or_default()
        ),
        DataSourceKind::Sqlite => println!(
            "  {}: sqlite {}",
            "Data Source".cyan(),
            cfg.data_source.database_path
        ),
    }
    println!("  {}: {}", "Hybrid Brand".cyan(), cfg.catalog.hybrid_brand);
    println!("  {}: {}", "Gas Price Key".cyan(), cfg.catalog.gas_price_key);

    info!("Configuration validation successful");
    Ok(())
}

/// Sanitize secrets in configuration for safe display
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    if let Some(key) = sanitized.data_source.api_key.as_mut() {
        *key = mask_api_key(key);
    }
    sanitized
}

/// Mask an API key for safe display
///
/// Shows first 7 and last 4 characters with dots in between
/// Example: "sb-1234567890abcdef" -> "sb-1234...cdef"
fn mask_api_key(key: &str) -> String {
    if key.len() <= 11 || !key.is_ascii() {
        return "***".to_string();
    }

    let prefix = &key[..7];
    let suffix = &key[key.len() - 4..];

    format!("{}...{}", prefix, suffix)
}
