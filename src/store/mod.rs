//! Read-only access to vehicle reference data.
//!
//! Two backends implement [`VehicleStore`]:
//! - [`RestStore`]: PostgREST endpoint (Supabase)
//! - [`SqliteStore`]: local SQLite database seeded by the bundled migrations
//!
//! Brand/model/version nesting is resolved inside each backend, so callers
//! only ever see flat [`HybridCandidate`] records.

pub mod rest;
pub mod sqlite;

pub use rest::RestStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::{CatalogConfig, DataSourceConfig, DataSourceKind};
use crate::logging::SensitiveApiKey;
use crate::models::{Brand, HybridCandidate, Model};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data source returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid data source configuration: {0}")]
    Config(String),
}

/// Queries the calculation core and the pickers depend on.
///
/// `Ok(None)` means the store answered but has no usable value; transport
/// and database failures are `Err`.
#[async_trait]
pub trait VehicleStore: Send + Sync {
    /// Best efficiency across all versions of a model
    async fn max_efficiency_for_model(&self, model_id: i64) -> Result<Option<f64>, StoreError>;

    /// Hybrid versions of the configured brand, best efficiency first
    async fn hybrid_candidates(&self) -> Result<Option<Vec<HybridCandidate>>, StoreError>;

    async fn gas_price_per_liter(&self) -> Result<Option<f64>, StoreError>;

    async fn brand_name(&self, brand_id: i64) -> Result<Option<String>, StoreError>;

    /// Model row, carrying the brand it belongs to
    async fn model(&self, model_id: i64) -> Result<Option<Model>, StoreError>;

    /// All brands, alphabetical
    async fn brands(&self) -> Result<Vec<Brand>, StoreError>;

    /// Models of one brand, alphabetical
    async fn models_by_brand(&self, brand_id: i64) -> Result<Vec<Model>, StoreError>;
}

/// Build the backend selected in configuration
pub async fn build_store(
    data_source: &DataSourceConfig,
    catalog: &CatalogConfig,
) -> Result<Arc<dyn VehicleStore>, StoreError> {
    match data_source.kind {
        DataSourceKind::Rest => {
            let base_url = data_source
                .base_url
                .as_deref()
                .ok_or_else(|| StoreError::Config("rest data source requires base_url".into()))?;
            let api_key = data_source.api_key.clone().unwrap_or_default();
            info!(
                base_url = %base_url,
                api_key = %SensitiveApiKey::new(&api_key),
                "Using REST reference data store"
            );
            let store = RestStore::new(
                base_url,
                api_key,
                data_source.timeout_seconds,
                catalog.clone(),
            )?;
            Ok(Arc::new(store))
        }
        DataSourceKind::Sqlite => {
            info!(
                database = %data_source.database_path,
                "Using SQLite reference data store"
            );
            let store = SqliteStore::open(&data_source.database_path, catalog.clone()).await?;
            Ok(Arc::new(store))
        }
    }
}
