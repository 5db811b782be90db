pub mod calculations;
pub mod catalog;
pub mod health;

use std::sync::Arc;

use crate::store::VehicleStore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VehicleStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn VehicleStore>) -> Self {
        Self { store }
    }
}
