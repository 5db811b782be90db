use serde::{Deserialize, Deserializer, Serialize};

/// Vehicle brand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
}

/// Vehicle model belonging to a brand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: i64,
    pub brand_id: i64,
    pub name: String,
}

/// Concrete version of a model, the unit reference efficiencies are kept for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub id: i64,
    pub model_id: i64,
    pub specific_version: String,
    /// Distance units per gallon
    #[serde(deserialize_with = "number_or_string")]
    pub km_per_gallon: f64,
    pub is_hybrid: bool,
    pub image_url: Option<String>,
}

/// Key/value entry of the reference `config` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    #[serde(deserialize_with = "number_or_string")]
    pub value: f64,
    pub description: Option<String>,
}

/// Hybrid version with its brand and model names already resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridCandidate {
    pub id: i64,
    pub variant_label: String,
    pub efficiency: f64,
    pub image_ref: Option<String>,
    pub brand_name: String,
    pub model_name: String,
}

/// Values collected by the first step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormInput {
    pub brand_id: i64,
    pub model_id: i64,
    /// Monthly fuel spend in currency units
    pub monthly_spend: f64,
}

/// One hybrid candidate evaluated against the user's current vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridComparison {
    pub id: i64,
    pub variant_label: String,
    pub brand_name: String,
    pub model_name: String,
    pub efficiency: f64,
    pub image_ref: Option<String>,
    /// Distance the hybrid covers with the user's monthly spend
    pub distance: f64,
    /// What the hybrid spends to cover the user's monthly distance
    pub equivalent_spend: f64,
    /// Monthly savings, never negative
    pub savings: f64,
}

impl HybridComparison {
    /// "Toyota Corolla" style label
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand_name, self.model_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub current_vehicle_name: String,
    pub current_efficiency: f64,
    pub monthly_distance: f64,
    pub monthly_spend: f64,
    /// Sorted by savings, highest first
    pub hybrid_comparisons: Vec<HybridComparison>,
    pub gas_price_per_liter: f64,
}

impl CalculationResult {
    pub fn find_comparison(&self, hybrid_id: i64) -> Option<&HybridComparison> {
        self.hybrid_comparisons.iter().find(|h| h.id == hybrid_id)
    }
}

/// Hybrid chosen in the second step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedHybrid {
    #[serde(flatten)]
    pub comparison: HybridComparison,
    pub annual_savings: f64,
    pub current_monthly_spend: f64,
}

/// PostgREST renders `numeric` columns either as JSON numbers or strings
pub(crate) fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

/// Like [`number_or_string`], but `null` and blank strings read as `None`
pub(crate) fn optional_number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
