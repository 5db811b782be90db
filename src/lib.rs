pub mod calculator;
pub mod comparison;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod server;
pub mod signals;
pub mod store;
pub mod wizard;

pub use comparison::{calculate, select, CalculationError, MissingData};
pub use logging::init_tracing;
pub use models::{CalculationResult, FormInput, HybridComparison, SelectedHybrid};
pub use store::{StoreError, VehicleStore};
pub use wizard::Wizard;
