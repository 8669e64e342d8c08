//! Transfer intake
//!
//! Entry point for chain transfer notifications. Applies the confirmation
//! gate, records the deposit exactly once per transaction hash, and launches
//! webhook delivery without waiting for it.

pub mod coordinator;
pub mod error;
pub mod types;

pub use coordinator::{DEFAULT_CONFIRMATION_THRESHOLD, TransferIntakeCoordinator};
pub use error::IntakeError;
pub use types::{IngestOutcome, MerchantInfo, TransferNotification};
