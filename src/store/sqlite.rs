use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::{StoreError, VehicleStore};
use crate::config::CatalogConfig;
use crate::models::{Brand, HybridCandidate, Model};

/// Reference data kept in a local SQLite database
pub struct SqliteStore {
    db_pool: SqlitePool,
    catalog: CatalogConfig,
}

impl SqliteStore {
    pub fn new(db_pool: SqlitePool, catalog: CatalogConfig) -> Self {
        Self { db_pool, catalog }
    }

    /// Open (creating if needed) the database file and apply migrations
    pub async fn open(path: &str, catalog: CatalogConfig) -> Result<Self, StoreError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Config(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
        let pool = SqlitePool::connect_with(options).await?;

        info!("Running reference data migrations...");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await?;

        Ok(Self::new(pool, catalog))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db_pool
    }
}

#[async_trait]
impl VehicleStore for SqliteStore {
    async fn max_efficiency_for_model(&self, model_id: i64) -> Result<Option<f64>, StoreError> {
        let row = sqlx::query_as::<_, (Option<f64>,)>(
            "SELECT MAX(km_per_gallon) FROM versions WHERE model_id = ?",
        )
        .bind(model_id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(row.0)
    }

    async fn hybrid_candidates(&self) -> Result<Option<Vec<HybridCandidate>>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String, f64, Option<String>, String, String)>(
            r#"
            SELECT v.id, v.specific_version, v.km_per_gallon, v.image_url,
                   b.name, m.name
            FROM versions v
            JOIN models m ON m.id = v.model_id
            JOIN brands b ON b.id = m.brand_id
            WHERE v.is_hybrid = 1 AND b.name = ?
            ORDER BY v.km_per_gallon DESC, v.id
            "#,
        )
        .bind(&self.catalog.hybrid_brand)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(Some(
            rows.into_iter()
                .map(
                    |(id, variant_label, efficiency, image_ref, brand_name, model_name)| {
                        HybridCandidate {
                            id,
                            variant_label,
                            efficiency,
                            image_ref,
                            brand_name,
                            model_name,
                        }
                    },
                )
                .collect(),
        ))
    }

    async fn gas_price_per_liter(&self) -> Result<Option<f64>, StoreError> {
        let row = sqlx::query_as::<_, (f64,)>("SELECT value FROM config WHERE key = ?")
            .bind(&self.catalog.gas_price_key)
            .fetch_optional(&self.db_pool)
            .await?;

        if row.is_none() {
            warn!(key = %self.catalog.gas_price_key, "Gas price key not found in config table");
        }
        Ok(row.map(|(value,)| value))
    }

    async fn brand_name(&self, brand_id: i64) -> Result<Option<String>, StoreError> {
        let row = sqlx::query_as::<_, (String,)>("SELECT name FROM brands WHERE id = ?")
            .bind(brand_id)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(row.map(|(name,)| name).filter(|name| !name.is_empty()))
    }

    async fn model(&self, model_id: i64) -> Result<Option<Model>, StoreError> {
        let row = sqlx::query_as::<_, (i64, i64, String)>(
            "SELECT id, brand_id, name FROM models WHERE id = ?",
        )
        .bind(model_id)
        .fetch_optional(&self.db_pool)
        .await?;
        Ok(row.map(|(id, brand_id, name)| Model { id, brand_id, name }))
    }

    async fn brands(&self) -> Result<Vec<Brand>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM brands ORDER BY name")
            .fetch_all(&self.db_pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| Brand { id, name })
            .collect())
    }

    async fn models_by_brand(&self, brand_id: i64) -> Result<Vec<Model>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, i64, String)>(
            "SELECT id, brand_id, name FROM models WHERE brand_id = ? ORDER BY name",
        )
        .bind(brand_id)
        .fetch_all(&self.db_pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(id, brand_id, name)| Model { id, brand_id, name })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_store() -> SqliteStore {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        SqliteStore::new(pool, CatalogConfig::default())
    }

    #[tokio::test]
    async fn test_max_efficiency_takes_best_version() {
        let store = seeded_store().await;
        // Corolla has a 14.5 standard version and a 22.0 hybrid version
        assert_eq!(store.max_efficiency_for_model(1).await.unwrap(), Some(22.0));
        assert_eq!(store.max_efficiency_for_model(16).await.unwrap(), Some(13.0));
        assert_eq!(store.max_efficiency_for_model(9999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_hybrid_candidates_are_flat_and_ordered() {
        let store = seeded_store().await;
        let hybrids = store.hybrid_candidates().await.unwrap().unwrap();

        assert_eq!(hybrids.len(), 4);
        assert_eq!(hybrids[0].model_name, "Yaris Cross");
        assert_eq!(hybrids[0].brand_name, "Toyota");
        assert_eq!(hybrids[0].efficiency, 23.5);
        assert!(hybrids.windows(2).all(|w| w[0].efficiency >= w[1].efficiency));
    }

    #[tokio::test]
    async fn test_hybrid_candidates_respect_brand_filter() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        let catalog = CatalogConfig {
            hybrid_brand: "Honda".to_string(),
            ..CatalogConfig::default()
        };
        let store = SqliteStore::new(pool, catalog);

        assert_eq!(store.hybrid_candidates().await.unwrap(), Some(vec![]));
    }

    #[tokio::test]
    async fn test_gas_price_and_names() {
        let store = seeded_store().await;
        assert_eq!(store.gas_price_per_liter().await.unwrap(), Some(16.5));
        assert_eq!(store.brand_name(4).await.unwrap().as_deref(), Some("Nissan"));
        let kicks = store.model(16).await.unwrap().unwrap();
        assert_eq!(kicks.name, "Kicks");
        assert_eq!(kicks.brand_id, 4);
        assert_eq!(store.brand_name(404).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_brands_and_models_are_alphabetical() {
        let store = seeded_store().await;
        let brands = store.brands().await.unwrap();
        assert_eq!(brands.len(), 10);
        assert_eq!(brands[0].name, "Chevrolet");

        let models = store.models_by_brand(1).await.unwrap();
        let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Camry", "Corolla", "Corolla Cross", "RAV4", "Yaris", "Yaris Cross"]
        );
    }
}
