use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{StoreError, VehicleStore};
use crate::config::CatalogConfig;
use crate::models::{optional_number_or_string, Brand, HybridCandidate, Model};

/// PostgREST client for the `brands`, `models`, `versions` and `config` tables
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    catalog: CatalogConfig,
}

#[derive(Debug, Deserialize)]
struct NameRow {
    name: String,
}

#[derive(Debug, Deserialize)]
struct EfficiencyRow {
    #[serde(default, deserialize_with = "optional_number_or_string")]
    km_per_gallon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConfigValueRow {
    #[serde(default, deserialize_with = "optional_number_or_string")]
    value: Option<f64>,
}

/// `versions` row with `models!inner(..., brands!inner(...))` embedded
#[derive(Debug, Deserialize)]
struct HybridVersionRow {
    id: i64,
    specific_version: String,
    #[serde(default, deserialize_with = "optional_number_or_string")]
    km_per_gallon: Option<f64>,
    image_url: Option<String>,
    models: EmbeddedModel,
}

#[derive(Debug, Deserialize)]
struct EmbeddedModel {
    name: String,
    brands: EmbeddedBrand,
}

#[derive(Debug, Deserialize)]
struct EmbeddedBrand {
    name: String,
}

impl HybridVersionRow {
    /// `None` when the row has no efficiency to compare with
    fn into_candidate(self) -> Option<HybridCandidate> {
        let Some(efficiency) = self.km_per_gallon else {
            warn!(hybrid_id = self.id, "Skipping hybrid version without km_per_gallon");
            return None;
        };

        Some(HybridCandidate {
            id: self.id,
            variant_label: self.specific_version,
            efficiency,
            image_ref: self.image_url,
            brand_name: self.models.brands.name,
            model_name: self.models.name,
        })
    }
}

impl RestStore {
    pub fn new(
        base_url: &str,
        api_key: String,
        timeout_seconds: u64,
        catalog: CatalogConfig,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            catalog,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Run a PostgREST select; the body is a JSON array, or `null`
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Option<Vec<T>>, StoreError> {
        let response = self
            .client
            .get(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(table, %status, "Reference data query failed");
            return Err(StoreError::Status { status, message });
        }

        let body = response.bytes().await?;
        debug!(table, bytes = body.len(), "Reference data query succeeded");

        serde_json::from_slice::<Option<Vec<T>>>(&body)
            .map_err(|e| StoreError::Decode(format!("{}: {}", table, e)))
    }

    async fn select_first<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, StoreError> {
        Ok(self
            .select::<T>(table, query)
            .await?
            .and_then(|rows| rows.into_iter().next()))
    }
}

#[async_trait]
impl VehicleStore for RestStore {
    async fn max_efficiency_for_model(&self, model_id: i64) -> Result<Option<f64>, StoreError> {
        let row: Option<EfficiencyRow> = self
            .select_first(
                "versions",
                &[
                    ("select", "km_per_gallon".to_string()),
                    ("model_id", format!("eq.{}", model_id)),
                    ("order", "km_per_gallon.desc.nullslast".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(row.and_then(|r| r.km_per_gallon))
    }

    async fn hybrid_candidates(&self) -> Result<Option<Vec<HybridCandidate>>, StoreError> {
        let rows: Option<Vec<HybridVersionRow>> = self
            .select(
                "versions",
                &[
                    (
                        "select",
                        "id,specific_version,km_per_gallon,image_url,models!inner(id,name,brands!inner(id,name))"
                            .to_string(),
                    ),
                    ("is_hybrid", "eq.true".to_string()),
                    ("models.brands.name", format!("eq.{}", self.catalog.hybrid_brand)),
                    ("order", "km_per_gallon.desc".to_string()),
                ],
            )
            .await?;
        Ok(rows.map(|rows| {
            rows.into_iter()
                .filter_map(HybridVersionRow::into_candidate)
                .collect()
        }))
    }

    async fn gas_price_per_liter(&self) -> Result<Option<f64>, StoreError> {
        let row: Option<ConfigValueRow> = self
            .select_first(
                "config",
                &[
                    ("select", "value".to_string()),
                    ("key", format!("eq.{}", self.catalog.gas_price_key)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        let value = row.and_then(|r| r.value);
        if value.is_none() {
            warn!(key = %self.catalog.gas_price_key, "Gas price key missing or empty in config table");
        }
        Ok(value)
    }

    async fn brand_name(&self, brand_id: i64) -> Result<Option<String>, StoreError> {
        let row: Option<NameRow> = self
            .select_first(
                "brands",
                &[
                    ("select", "name".to_string()),
                    ("id", format!("eq.{}", brand_id)),
                ],
            )
            .await?;
        Ok(row.map(|r| r.name).filter(|name| !name.is_empty()))
    }

    async fn model(&self, model_id: i64) -> Result<Option<Model>, StoreError> {
        self.select_first(
            "models",
            &[
                ("select", "id,brand_id,name".to_string()),
                ("id", format!("eq.{}", model_id)),
            ],
        )
        .await
    }

    async fn brands(&self) -> Result<Vec<Brand>, StoreError> {
        Ok(self
            .select(
                "brands",
                &[
                    ("select", "id,name".to_string()),
                    ("order", "name.asc".to_string()),
                ],
            )
            .await?
            .unwrap_or_default())
    }

    async fn models_by_brand(&self, brand_id: i64) -> Result<Vec<Model>, StoreError> {
        Ok(self
            .select(
                "models",
                &[
                    ("select", "id,brand_id,name".to_string()),
                    ("brand_id", format!("eq.{}", brand_id)),
                    ("order", "name.asc".to_string()),
                ],
            )
            .await?
            .unwrap_or_default())
    }
}
