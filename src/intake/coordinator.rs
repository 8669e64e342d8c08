use std::sync::Arc;
use tracing::{debug, info};

use super::error::IntakeError;
use super::types::{IngestOutcome, TransferNotification};
use crate::deposit::{DepositStore, InsertOutcome};
use crate::webhook::WebhookDeliveryEngine;

/// Confirmations required before a transfer is recorded
pub const DEFAULT_CONFIRMATION_THRESHOLD: u32 = 12;

/// Gates inbound transfers on confirmations and hands new deposits to the
/// delivery engine.
///
/// Flow: threshold check → atomic insert-if-absent → detached delivery.
/// The caller gets its answer as soon as the insert settles; it never waits
/// on the merchant.
pub struct TransferIntakeCoordinator {
    store: Arc<dyn DepositStore>,
    engine: Arc<WebhookDeliveryEngine>,
    confirmation_threshold: u32,
}

impl TransferIntakeCoordinator {
    pub fn new(
        store: Arc<dyn DepositStore>,
        engine: Arc<WebhookDeliveryEngine>,
        confirmation_threshold: u32,
    ) -> Self {
        Self {
            store,
            engine,
            confirmation_threshold,
        }
    }

    pub fn confirmation_threshold(&self) -> u32 {
        self.confirmation_threshold
    }

    pub async fn ingest(
        &self,
        notification: TransferNotification,
    ) -> Result<IngestOutcome, IntakeError> {
        if notification.confirmations < self.confirmation_threshold {
            debug!(
                tx_hash = %notification.tx_hash,
                confirmations = notification.confirmations,
                threshold = self.confirmation_threshold,
                "Transfer below confirmation threshold"
            );
            return Ok(IngestOutcome::BelowThreshold);
        }

        let record = notification.to_pending_record();
        match self.store.try_insert(&record).await? {
            InsertOutcome::AlreadyExists => {
                info!(tx_hash = %notification.tx_hash, "Duplicate transfer ignored");
                Ok(IngestOutcome::DuplicateIgnored)
            }
            InsertOutcome::Inserted => {
                info!(
                    tx_hash = %notification.tx_hash,
                    merchant_id = %notification.merchant.id,
                    asset = %notification.asset,
                    amount = %notification.amount,
                    confirmations = notification.confirmations,
                    "Deposit recorded, dispatching webhook"
                );
                // Detached: the task outlives this call
                drop(self.engine.deliver(notification));
                Ok(IngestOutcome::Accepted)
            }
        }
    }
}
