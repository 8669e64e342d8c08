use async_trait::async_trait;

use super::error::StoreError;
use super::types::{DepositRecord, DepositStatus, InsertOutcome, UpdateOutcome};

/// Deposit persistence keyed by transaction hash
///
/// The store is the only shared mutable resource of the pipeline. Its
/// insert-if-absent is the single synchronization point deduplication relies on.
#[async_trait]
pub trait DepositStore: Send + Sync {
    /// Insert `record` unless a deposit with the same `tx_hash` exists.
    ///
    /// Existence check and insert are one atomic unit: for concurrent calls
    /// with the same hash exactly one observes `Inserted`.
    async fn try_insert(&self, record: &DepositRecord) -> Result<InsertOutcome, StoreError>;

    /// Overwrite the status of an existing deposit (last writer wins).
    async fn update_status(
        &self,
        tx_hash: &str,
        status: DepositStatus,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Deposits newest `created_at` first, optionally restricted to one merchant.
    async fn list_by_merchant(
        &self,
        merchant_id: Option<&str>,
    ) -> Result<Vec<DepositRecord>, StoreError>;

    async fn get(&self, tx_hash: &str) -> Result<Option<DepositRecord>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
