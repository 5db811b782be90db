use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data_source: DataSourceConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// PostgREST endpoint (Supabase)
    Rest,
    /// Local SQLite file with bundled reference data
    Sqlite,
}

/// Where vehicle reference data is read from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataSourceConfig {
    #[serde(default = "default_kind")]
    pub kind: DataSourceKind,

    /// SQLite database path (default: "./data/reference.db")
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Project URL, e.g. "https://xyz.supabase.co"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Anon/service key sent as `apikey` and bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            database_path: default_database_path(),
            base_url: None,
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Which reference rows count as hybrids and as the fuel price
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Brand whose hybrid versions are offered (default: "Toyota")
    #[serde(default = "default_hybrid_brand")]
    pub hybrid_brand: String,

    /// Key of the fuel price row in the `config` table
    #[serde(default = "default_gas_price_key")]
    pub gas_price_key: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            hybrid_brand: default_hybrid_brand(),
            gas_price_key: default_gas_price_key(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_kind() -> DataSourceKind {
    DataSourceKind::Sqlite
}

fn default_database_path() -> String {
    "./data/reference.db".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_hybrid_brand() -> String {
    "Toyota".to_string()
}

fn default_gas_price_key() -> String {
    "FUEL_PRICE_PER_LITER".to_string()
}

/// Load configuration from `path` (optional) layered with
/// `HYBRID_SAVINGS__SECTION__KEY` environment variables
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("HYBRID_SAVINGS").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if !matches!(cfg.server.log_format.as_str(), "text" | "json") {
        anyhow::bail!(
            "server.log_format must be \"text\" or \"json\", got \"{}\"",
            cfg.server.log_format
        );
    }

    match cfg.data_source.kind {
        DataSourceKind::Rest => {
            let base_url = cfg.data_source.base_url.as_deref().unwrap_or_default();
            if base_url.is_empty() {
                anyhow::bail!("data_source.base_url is required for the rest data source");
            }
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                anyhow::bail!("data_source.base_url must be an http(s) URL");
            }
            if cfg.data_source.api_key.as_deref().unwrap_or_default().is_empty() {
                anyhow::bail!("data_source.api_key is required for the rest data source");
            }
            if cfg.data_source.timeout_seconds == 0 {
                anyhow::bail!("data_source.timeout_seconds must be > 0");
            }
        }
        DataSourceKind::Sqlite => {
            if cfg.data_source.database_path.is_empty() {
                anyhow::bail!("data_source.database_path cannot be empty");
            }
        }
    }

    if cfg.catalog.hybrid_brand.trim().is_empty() {
        anyhow::bail!("catalog.hybrid_brand cannot be empty");
    }
    if cfg.catalog.gas_price_key.trim().is_empty() {
        anyhow::bail!("catalog.gas_price_key cannot be empty");
    }

    Ok(())
}
