//! Savings comparison between the user's vehicle and the hybrid lineup.
//!
//! [`calculate`] fans out the five reference-data reads, validates what came
//! back and evaluates every hybrid candidate. [`select`] turns one entry of a
//! finished comparison into the annualized figure shown in the last step.

use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculator::{self, round2};
use crate::models::{
    CalculationResult, FormInput, HybridCandidate, HybridComparison, Model, SelectedHybrid,
};
use crate::store::{StoreError, VehicleStore};

/// Category of reference data that was absent or unusable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingData {
    Efficiency,
    HybridCandidates,
    GasPrice,
    VehicleIdentification,
}

impl fmt::Display for MissingData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Efficiency => "no efficiency data for model",
            Self::HybridCandidates => "no hybrid candidates available",
            Self::GasPrice => "no gas price configured",
            Self::VehicleIdentification => "vehicle identification incomplete",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Error)]
pub enum CalculationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    MissingReferenceData(MissingData),

    /// The store answered with an empty hybrid list
    #[error("no hybrid candidates available")]
    EmptyCandidateSet,

    /// The chosen id is not part of the comparison it was picked from
    #[error("selection not found: hybrid {hybrid_id} is not in the current comparison")]
    SelectionNotFound { hybrid_id: i64 },

    #[error("reference data unavailable: {0}")]
    DataSource(#[from] StoreError),
}

impl CalculationError {
    /// Stable machine-readable name, used in API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::MissingReferenceData(_) => "missing_reference_data",
            Self::EmptyCandidateSet => "empty_candidate_set",
            Self::SelectionNotFound { .. } => "selection_not_found",
            Self::DataSource(_) => "data_source_error",
        }
    }
}

impl FormInput {
    pub fn new(brand_id: i64, model_id: i64, monthly_spend: f64) -> Result<Self, CalculationError> {
        let input = Self {
            brand_id,
            model_id,
            monthly_spend,
        };
        input.validate()?;
        Ok(input)
    }

    /// Ids must be positive and the spend a finite amount above zero
    pub fn validate(&self) -> Result<(), CalculationError> {
        if self.brand_id <= 0 {
            return Err(CalculationError::InvalidInput(format!(
                "brand id must be positive, got {}",
                self.brand_id
            )));
        }
        if self.model_id <= 0 {
            return Err(CalculationError::InvalidInput(format!(
                "model id must be positive, got {}",
                self.model_id
            )));
        }
        if !self.monthly_spend.is_finite() || self.monthly_spend <= 0.0 {
            return Err(CalculationError::InvalidInput(format!(
                "monthly spend must be greater than zero, got {}",
                self.monthly_spend
            )));
        }
        Ok(())
    }
}

/// Reference data gathered for one calculation
struct ReferenceData {
    efficiency: Option<f64>,
    candidates: Option<Vec<HybridCandidate>>,
    gas_price: Option<f64>,
    brand_name: Option<String>,
    model_name: Option<String>,
}

/// Validated reference data; checks run in a fixed order and the first
/// failure wins
struct Validated {
    efficiency: f64,
    candidates: Vec<HybridCandidate>,
    gas_price: f64,
    vehicle_name: String,
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

impl ReferenceData {
    fn validate(self) -> Result<Validated, CalculationError> {
        let efficiency = positive(self.efficiency)
            .ok_or(CalculationError::MissingReferenceData(MissingData::Efficiency))?;

        let candidates = match self.candidates {
            None => {
                return Err(CalculationError::MissingReferenceData(
                    MissingData::HybridCandidates,
                ))
            }
            Some(list) if list.is_empty() => return Err(CalculationError::EmptyCandidateSet),
            Some(list) => list,
        };

        let gas_price = positive(self.gas_price)
            .ok_or(CalculationError::MissingReferenceData(MissingData::GasPrice))?;

        let (brand_name, model_name) = match (self.brand_name, self.model_name) {
            (Some(brand), Some(model)) => (brand, model),
            _ => {
                return Err(CalculationError::MissingReferenceData(
                    MissingData::VehicleIdentification,
                ))
            }
        };

        Ok(Validated {
            efficiency,
            candidates,
            gas_price,
            vehicle_name: format!("{} {}", brand_name, model_name),
        })
    }
}

fn belongs_to_other_brand(model: &Model, input: &FormInput) -> bool {
    model.brand_id != input.brand_id
}

/// Run the first step: fetch, validate, compare against every hybrid
pub async fn calculate<S>(store: &S, input: &FormInput) -> Result<CalculationResult, CalculationError>
where
    S: VehicleStore + ?Sized,
{
    input.validate()?;

    debug!(
        brand_id = input.brand_id,
        model_id = input.model_id,
        "Fetching reference data"
    );

    let (efficiency, candidates, gas_price, brand_name, model) = futures::try_join!(
        store.max_efficiency_for_model(input.model_id),
        store.hybrid_candidates(),
        store.gas_price_per_liter(),
        store.brand_name(input.brand_id),
        store.model(input.model_id),
    )
    .map_err(|e| {
        warn!(error = %e, "Reference data fetch failed");
        CalculationError::DataSource(e)
    })?;

    if let Some(model) = model.as_ref().filter(|m| belongs_to_other_brand(m, input)) {
        warn!(
            model_id = input.model_id,
            brand_id = input.brand_id,
            model_brand_id = model.brand_id,
            "Model does not belong to the selected brand"
        );
    }
    let model_name = model.map(|m| m.name).filter(|name| !name.is_empty());

    let data = ReferenceData {
        efficiency,
        candidates,
        gas_price,
        brand_name,
        model_name,
    }
    .validate()
    .inspect_err(|e| warn!(model_id = input.model_id, "Calculation rejected: {}", e))?;

    let result = compare(input.monthly_spend, data)?;

    info!(
        vehicle = %result.current_vehicle_name,
        monthly_distance = result.monthly_distance,
        candidates = result.hybrid_comparisons.len(),
        "Savings comparison computed"
    );

    Ok(result)
}

fn compare(monthly_spend: f64, data: Validated) -> Result<CalculationResult, CalculationError> {
    let Validated {
        efficiency,
        candidates,
        gas_price,
        vehicle_name,
    } = data;

    // Every figure derives from the spend to the cent, so the stored spend
    // minus a hybrid's equivalent spend gives its savings
    let monthly_spend = round2(monthly_spend);

    let user_distance = calculator::monthly_distance(monthly_spend, gas_price, efficiency)
        .map_err(|e| CalculationError::InvalidInput(e.to_string()))?;

    let mut comparisons = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match evaluate(&candidate, monthly_spend, user_distance, gas_price) {
            Ok(comparison) => comparisons.push(comparison),
            Err(e) => warn!(hybrid_id = candidate.id, "Skipping hybrid candidate: {}", e),
        }
    }

    if comparisons.is_empty() {
        return Err(CalculationError::EmptyCandidateSet);
    }

    // sort_by is stable, equal savings keep the store's order
    comparisons.sort_by(|a, b| b.savings.total_cmp(&a.savings));

    Ok(CalculationResult {
        current_vehicle_name: vehicle_name,
        current_efficiency: efficiency,
        monthly_distance: round2(user_distance),
        monthly_spend,
        hybrid_comparisons: comparisons,
        gas_price_per_liter: gas_price,
    })
}

fn evaluate(
    candidate: &HybridCandidate,
    monthly_spend: f64,
    user_distance: f64,
    gas_price: f64,
) -> Result<HybridComparison, calculator::CalcError> {
    let distance = calculator::monthly_distance(monthly_spend, gas_price, candidate.efficiency)?;
    let equivalent_spend =
        calculator::hybrid_equivalent_spend(user_distance, gas_price, candidate.efficiency)?;
    let savings = calculator::monthly_savings(monthly_spend, equivalent_spend).max(0.0);

    Ok(HybridComparison {
        id: candidate.id,
        variant_label: candidate.variant_label.clone(),
        brand_name: candidate.brand_name.clone(),
        model_name: candidate.model_name.clone(),
        efficiency: candidate.efficiency,
        image_ref: candidate.image_ref.clone(),
        distance: round2(distance),
        equivalent_spend: round2(equivalent_spend),
        savings: round2(savings),
    })
}

/// Run the second step: pick one hybrid out of a finished comparison
pub fn select(result: &CalculationResult, hybrid_id: i64) -> Result<SelectedHybrid, CalculationError> {
    let comparison = result.find_comparison(hybrid_id).ok_or_else(|| {
        warn!(hybrid_id, "Selected hybrid is not part of the comparison");
        CalculationError::SelectionNotFound { hybrid_id }
    })?;

    let savings = comparison.savings.max(0.0);

    Ok(SelectedHybrid {
        comparison: comparison.clone(),
        annual_savings: calculator::annual_savings(savings),
        current_monthly_spend: result.monthly_spend,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Brand;
    use async_trait::async_trait;

    /// Canned answers for each query
    #[derive(Clone)]
    pub(crate) struct StubStore {
        pub efficiency: Option<f64>,
        pub candidates: Option<Vec<HybridCandidate>>,
        pub gas_price: Option<f64>,
        pub brand_name: Option<String>,
        pub model_name: Option<String>,
        pub model_brand_id: i64,
        pub fail_gas_price: bool,
    }

    pub(crate) fn candidate(id: i64, model: &str, efficiency: f64) -> HybridCandidate {
        HybridCandidate {
            id,
            variant_label: format!("{} HEV", model),
            efficiency,
            image_ref: None,
            brand_name: "Toyota".to_string(),
            model_name: model.to_string(),
        }
    }

    impl Default for StubStore {
        fn default() -> Self {
            Self {
                efficiency: Some(13.0),
                candidates: Some(vec![
                    candidate(44, "RAV4", 20.0),
                    candidate(41, "Yaris Cross", 23.5),
                    candidate(42, "Corolla", 22.0),
                ]),
                gas_price: Some(16.5),
                brand_name: Some("Nissan".to_string()),
                model_name: Some("Kicks".to_string()),
                model_brand_id: 4,
                fail_gas_price: false,
            }
        }
    }

    #[async_trait]
    impl VehicleStore for StubStore {
        async fn max_efficiency_for_model(&self, _model_id: i64) -> Result<Option<f64>, StoreError> {
            Ok(self.efficiency)
        }

        async fn hybrid_candidates(&self) -> Result<Option<Vec<HybridCandidate>>, StoreError> {
            Ok(self.candidates.clone())
        }

        async fn gas_price_per_liter(&self) -> Result<Option<f64>, StoreError> {
            if self.fail_gas_price {
                return Err(StoreError::Decode("config: unexpected payload".to_string()));
            }
            Ok(self.gas_price)
        }

        async fn brand_name(&self, _brand_id: i64) -> Result<Option<String>, StoreError> {
            Ok(self.brand_name.clone())
        }

        async fn model(&self, model_id: i64) -> Result<Option<Model>, StoreError> {
            Ok(self.model_name.clone().map(|name| Model {
                id: model_id,
                brand_id: self.model_brand_id,
                name,
            }))
        }

        async fn brands(&self) -> Result<Vec<Brand>, StoreError> {
            Ok(vec![])
        }

        async fn models_by_brand(&self, _brand_id: i64) -> Result<Vec<Model>, StoreError> {
            Ok(vec![])
        }
    }

    fn input() -> FormInput {
        FormInput::new(4, 16, 480.0).unwrap()
    }

    fn assert_missing(result: Result<CalculationResult, CalculationError>, expected: MissingData) {
        match result {
            Err(CalculationError::MissingReferenceData(kind)) => assert_eq!(kind, expected),
            other => panic!("expected missing {:?}, got {:?}", expected, other),
        }
    }

    #[tokio::test]
    async fn test_calculate_reference_scenario() {
        let result = calculate(&StubStore::default(), &input()).await.unwrap();

        assert_eq!(result.current_vehicle_name, "Nissan Kicks");
        assert_eq!(result.current_efficiency, 13.0);
        assert_eq!(result.monthly_distance, 99.91);
        assert_eq!(result.monthly_spend, 480.0);
        assert_eq!(result.gas_price_per_liter, 16.5);

        let ids: Vec<i64> = result.hybrid_comparisons.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![41, 42, 44]);

        let yaris = &result.hybrid_comparisons[0];
        assert_eq!(yaris.distance, 180.6);
        assert_eq!(yaris.equivalent_spend, 265.53);
        assert_eq!(yaris.savings, 214.47);

        let rav4 = &result.hybrid_comparisons[2];
        assert_eq!(rav4.equivalent_spend, 312.0);
        assert_eq!(rav4.savings, 168.0);
    }

    #[tokio::test]
    async fn test_calculate_sorted_by_savings_descending() {
        let result = calculate(&StubStore::default(), &input()).await.unwrap();
        assert!(result
            .hybrid_comparisons
            .windows(2)
            .all(|w| w[0].savings >= w[1].savings));
    }

    #[tokio::test]
    async fn test_calculate_clamps_negative_savings() {
        let store = StubStore {
            efficiency: Some(30.0),
            ..StubStore::default()
        };
        let result = calculate(&store, &input()).await.unwrap();
        assert!(result.hybrid_comparisons.iter().all(|h| h.savings == 0.0));
        // equivalent spend still reflects the real cost
        assert!(result.hybrid_comparisons.iter().all(|h| h.equivalent_spend > 480.0));
    }

    #[tokio::test]
    async fn test_calculate_ties_keep_input_order() {
        let store = StubStore {
            efficiency: Some(40.0),
            ..StubStore::default()
        };
        let result = calculate(&store, &input()).await.unwrap();
        let ids: Vec<i64> = result.hybrid_comparisons.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![44, 41, 42]);
    }

    #[tokio::test]
    async fn test_missing_efficiency() {
        let store = StubStore {
            efficiency: None,
            ..StubStore::default()
        };
        assert_missing(calculate(&store, &input()).await, MissingData::Efficiency);

        let store = StubStore {
            efficiency: Some(0.0),
            ..StubStore::default()
        };
        assert_missing(calculate(&store, &input()).await, MissingData::Efficiency);
    }

    #[tokio::test]
    async fn test_missing_candidates() {
        let store = StubStore {
            candidates: None,
            ..StubStore::default()
        };
        assert_missing(calculate(&store, &input()).await, MissingData::HybridCandidates);
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let store = StubStore {
            candidates: Some(vec![]),
            ..StubStore::default()
        };
        let err = calculate(&store, &input()).await.unwrap_err();
        assert!(matches!(err, CalculationError::EmptyCandidateSet));
        assert_eq!(err.to_string(), "no hybrid candidates available");
    }

    #[tokio::test]
    async fn test_unusable_candidates_are_skipped() {
        let store = StubStore {
            candidates: Some(vec![candidate(1, "Broken", 0.0), candidate(2, "Prius", 25.0)]),
            ..StubStore::default()
        };
        let result = calculate(&store, &input()).await.unwrap();
        assert_eq!(result.hybrid_comparisons.len(), 1);
        assert_eq!(result.hybrid_comparisons[0].id, 2);

        let store = StubStore {
            candidates: Some(vec![candidate(1, "Broken", -3.0)]),
            ..StubStore::default()
        };
        let err = calculate(&store, &input()).await.unwrap_err();
        assert!(matches!(err, CalculationError::EmptyCandidateSet));
    }

    #[tokio::test]
    async fn test_missing_gas_price() {
        let store = StubStore {
            gas_price: None,
            ..StubStore::default()
        };
        assert_missing(calculate(&store, &input()).await, MissingData::GasPrice);

        let store = StubStore {
            gas_price: Some(-1.0),
            ..StubStore::default()
        };
        assert_missing(calculate(&store, &input()).await, MissingData::GasPrice);
    }

    #[tokio::test]
    async fn test_missing_vehicle_names() {
        let store = StubStore {
            brand_name: None,
            ..StubStore::default()
        };
        assert_missing(calculate(&store, &input()).await, MissingData::VehicleIdentification);

        let store = StubStore {
            model_name: None,
            ..StubStore::default()
        };
        assert_missing(calculate(&store, &input()).await, MissingData::VehicleIdentification);
    }

    #[tokio::test]
    async fn test_first_failed_check_wins() {
        let store = StubStore {
            efficiency: None,
            candidates: Some(vec![]),
            gas_price: None,
            brand_name: None,
            ..StubStore::default()
        };
        assert_missing(calculate(&store, &input()).await, MissingData::Efficiency);

        let store = StubStore {
            candidates: Some(vec![]),
            gas_price: None,
            ..StubStore::default()
        };
        let err = calculate(&store, &input()).await.unwrap_err();
        assert!(matches!(err, CalculationError::EmptyCandidateSet));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_calculation() {
        let store = StubStore {
            fail_gas_price: true,
            ..StubStore::default()
        };
        let err = calculate(&store, &input()).await.unwrap_err();
        assert!(matches!(err, CalculationError::DataSource(_)));
        assert_eq!(err.kind(), "data_source_error");
    }

    #[tokio::test]
    async fn test_spend_is_kept_to_the_cent() {
        let half_cent = FormInput::new(4, 16, 480.125).unwrap();
        let result = calculate(&StubStore::default(), &half_cent).await.unwrap();
        assert_eq!(result.monthly_spend, 480.13);

        let whole_cent = FormInput::new(4, 16, 480.13).unwrap();
        let same = calculate(&StubStore::default(), &whole_cent).await.unwrap();
        assert_eq!(result, same);

        for hybrid in &result.hybrid_comparisons {
            let derived = result.monthly_spend - hybrid.equivalent_spend;
            assert!(
                (derived - hybrid.savings).abs() < 0.011,
                "hybrid {}: {} - {} != {}",
                hybrid.id,
                result.monthly_spend,
                hybrid.equivalent_spend,
                hybrid.savings
            );
        }
    }

    #[tokio::test]
    async fn test_model_of_another_brand_is_flagged_but_computed() {
        let store = StubStore {
            model_name: Some("Corolla".to_string()),
            model_brand_id: 1,
            ..StubStore::default()
        };
        let model = store.model(1).await.unwrap().unwrap();
        assert!(belongs_to_other_brand(&model, &input()));

        let own = StubStore::default().model(16).await.unwrap().unwrap();
        assert!(!belongs_to_other_brand(&own, &input()));

        let result = calculate(&store, &input()).await.unwrap();
        assert_eq!(result.current_vehicle_name, "Nissan Corolla");
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_fetching() {
        let bad = FormInput {
            brand_id: 4,
            model_id: 16,
            monthly_spend: 0.0,
        };
        let err = calculate(&StubStore::default(), &bad).await.unwrap_err();
        assert!(matches!(err, CalculationError::InvalidInput(_)));
    }

    #[test]
    fn test_form_input_validation() {
        assert!(FormInput::new(1, 1, 100.0).is_ok());
        assert!(FormInput::new(0, 1, 100.0).is_err());
        assert!(FormInput::new(1, -2, 100.0).is_err());
        assert!(FormInput::new(1, 1, f64::NAN).is_err());
        assert!(FormInput::new(1, 1, -5.0).is_err());
    }

    #[tokio::test]
    async fn test_select_annualizes_savings() {
        let result = calculate(&StubStore::default(), &input()).await.unwrap();
        let selected = select(&result, 42).unwrap();

        assert_eq!(selected.comparison.id, 42);
        assert_eq!(selected.comparison.savings, 196.36);
        assert_eq!(selected.annual_savings, 2356.32);
        assert_eq!(selected.current_monthly_spend, 480.0);
    }

    #[tokio::test]
    async fn test_select_unknown_id() {
        let result = calculate(&StubStore::default(), &input()).await.unwrap();
        let err = select(&result, 999).unwrap_err();
        assert!(matches!(
            err,
            CalculationError::SelectionNotFound { hybrid_id: 999 }
        ));
    }

    #[test]
    fn test_missing_data_messages() {
        assert_eq!(
            CalculationError::MissingReferenceData(MissingData::GasPrice).to_string(),
            "no gas price configured"
        );
        assert_eq!(
            CalculationError::MissingReferenceData(MissingData::VehicleIdentification).to_string(),
            "vehicle identification incomplete"
        );
    }
}
