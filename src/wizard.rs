//! Three-step flow state.
//!
//! ```text
//! Input --submit--> Compared --select--> Result
//!   ^                 |  ^                  |
//!   +------back-------+  +-------back-------+
//!   ^                                       |
//!   +----------------reset------------------+
//! ```
//!
//! Every transition consumes the current state and returns the next one.
//! Transitions that make no sense for the current step leave it untouched.

use tracing::{debug, warn};

use crate::comparison::{self, CalculationError};
use crate::models::{CalculationResult, FormInput, SelectedHybrid};
use crate::store::VehicleStore;

#[derive(Debug, Default)]
pub enum Wizard {
    /// Collecting brand, model and monthly spend
    #[default]
    Input,
    /// Last attempt failed; still collecting input
    Failed { error: CalculationError },
    /// Comparison computed, waiting for a hybrid to be picked
    Compared {
        input: FormInput,
        result: CalculationResult,
    },
    /// Hybrid picked, showing annual savings
    Result {
        input: FormInput,
        result: CalculationResult,
        selection: SelectedHybrid,
    },
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based step number as shown to the user
    pub fn step(&self) -> u8 {
        match self {
            Self::Input | Self::Failed { .. } => 1,
            Self::Compared { .. } => 2,
            Self::Result { .. } => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Input | Self::Failed { .. } => "input",
            Self::Compared { .. } => "compared",
            Self::Result { .. } => "result",
        }
    }

    /// Error surfaced by the last failed transition, if any
    pub fn error(&self) -> Option<&CalculationError> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&CalculationResult> {
        match self {
            Self::Compared { result, .. } | Self::Result { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<&SelectedHybrid> {
        match self {
            Self::Result { selection, .. } => Some(selection),
            _ => None,
        }
    }

    /// Input -> Compared on success; stays in the first step with the error
    /// otherwise
    pub async fn submit<S>(self, store: &S, input: FormInput) -> Self
    where
        S: VehicleStore + ?Sized,
    {
        match self {
            Self::Input | Self::Failed { .. } => match comparison::calculate(store, &input).await {
                Ok(result) => {
                    debug!("wizard: input -> compared");
                    Self::Compared { input, result }
                }
                Err(error) => Self::Failed { error },
            },
            other => {
                warn!(state = other.name(), "submit ignored outside the input step");
                other
            }
        }
    }

    /// Compared -> Result. An unknown id means the comparison is stale, so
    /// the flow restarts from the first step carrying the error.
    pub fn select(self, hybrid_id: i64) -> Self {
        match self {
            Self::Compared { input, result } => match comparison::select(&result, hybrid_id) {
                Ok(selection) => {
                    debug!(hybrid_id, "wizard: compared -> result");
                    Self::Result {
                        input,
                        result,
                        selection,
                    }
                }
                Err(error) => Self::Failed { error },
            },
            other => {
                warn!(state = other.name(), "select ignored outside the comparison step");
                other
            }
        }
    }

    /// Result -> Compared (drops the selection), Compared -> Input (drops the
    /// result)
    pub fn back(self) -> Self {
        match self {
            Self::Result { input, result, .. } => Self::Compared { input, result },
            Self::Compared { .. } => Self::Input,
            other => other,
        }
    }

    /// Back to an empty first step from anywhere
    pub fn reset(self) -> Self {
        Self::Input
    }
}
