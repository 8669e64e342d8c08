use std::sync::Arc;

use crate::deposit::DepositStore;
use crate::intake::TransferIntakeCoordinator;

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    /// Intake pipeline for chain transfer notifications
    pub coordinator: Arc<TransferIntakeCoordinator>,
    /// Read side for deposit queries and health checks
    pub store: Arc<dyn DepositStore>,
}

impl AppState {
    pub fn new(coordinator: Arc<TransferIntakeCoordinator>, store: Arc<dyn DepositStore>) -> Self {
        Self { coordinator, store }
    }
}
