use thiserror::Error;

use crate::deposit::StoreError;

/// Errors surfaced to the ingest caller
///
/// Below-threshold and duplicate notifications are outcomes, not errors, and
/// delivery failures never reach the caller.
#[derive(Error, Debug, Clone)]
pub enum IntakeError {
    #[error("Deposit store error: {0}")]
    Store(#[from] StoreError),
}

impl IntakeError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            IntakeError::Store(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            IntakeError::Store(_) => 500,
        }
    }
}
