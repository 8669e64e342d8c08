//! Webhook Delivery Engine
//!
//! Notifies the merchant of a confirmed deposit with bounded retry:
//!
//! ```text
//! attempt 1 ──fail──▶ sleep 1s ──▶ attempt 2 ──fail──▶ sleep 2s ──▶ attempt 3 ──fail──▶ dead letter
//!     │                                │                                │
//!    200                              200                              200
//!     └────────────────────────────────┴────────────────────────────────┴──▶ status = confirmed
//! ```
//!
//! Only HTTP 200 counts as success. Once the merchant has answered 200 the
//! engine never calls it again for that transaction, even if marking the
//! deposit confirmed fails afterwards.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::client::WebhookClient;
use super::payload::WebhookPayload;
use super::retry::RetryPolicy;
use crate::dead_letter::DeadLetterRecorder;
use crate::deposit::{DepositStatus, DepositStore, UpdateOutcome};
use crate::intake::TransferNotification;

/// Terminal state of one delivery sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Merchant answered 200 on attempt `attempts`
    Delivered { attempts: u32 },
    /// Every attempt failed; the transaction went to the dead-letter log
    DeadLettered { attempts: u32 },
}

pub struct WebhookDeliveryEngine {
    store: Arc<dyn DepositStore>,
    dead_letters: Arc<dyn DeadLetterRecorder>,
    client: Arc<dyn WebhookClient>,
    policy: RetryPolicy,
}

impl WebhookDeliveryEngine {
    pub fn new(
        store: Arc<dyn DepositStore>,
        dead_letters: Arc<dyn DeadLetterRecorder>,
        client: Arc<dyn WebhookClient>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            store,
            dead_letters,
            client,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Start delivery on a detached task and return immediately.
    ///
    /// The task runs to its terminal state whether or not the handle is kept.
    pub fn deliver(
        self: &Arc<Self>,
        notification: TransferNotification,
    ) -> JoinHandle<DeliveryOutcome> {
        let engine = Arc::clone(self);
        tokio::spawn(async move { engine.run(&notification).await })
    }

    /// Drive one delivery sequence to completion
    pub async fn run(&self, notification: &TransferNotification) -> DeliveryOutcome {
        let tx_hash = notification.tx_hash.as_str();
        let merchant = &notification.merchant;
        let payload = WebhookPayload::deposit_confirmed(notification);

        let mut attempt = 0;
        while attempt < self.policy.max_attempts {
            attempt += 1;

            match self
                .client
                .post(
                    &merchant.webhook_url,
                    &merchant.webhook_secret,
                    &payload,
                    self.policy.attempt_timeout,
                )
                .await
            {
                Ok(200) => {
                    info!(
                        tx_hash = %tx_hash,
                        merchant_id = %merchant.id,
                        attempt,
                        "Webhook delivered"
                    );
                    self.mark_confirmed(tx_hash).await;
                    return DeliveryOutcome::Delivered { attempts: attempt };
                }
                Ok(status) => {
                    warn!(
                        tx_hash = %tx_hash,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        status,
                        "Webhook rejected by merchant"
                    );
                }
                Err(e) => {
                    warn!(
                        tx_hash = %tx_hash,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %e,
                        "Webhook call failed"
                    );
                }
            }

            if let Some(delay) = self.policy.backoff_after(attempt) {
                tokio::time::sleep(delay).await;
            }
        }

        error!(
            tx_hash = %tx_hash,
            attempts = attempt,
            "Webhook delivery exhausted all attempts"
        );
        self.record_dead_letter(tx_hash).await;
        DeliveryOutcome::DeadLettered { attempts: attempt }
    }

    /// The webhook already fired, so failures here are logged and never retried
    async fn mark_confirmed(&self, tx_hash: &str) {
        match self
            .store
            .update_status(tx_hash, DepositStatus::Confirmed)
            .await
        {
            Ok(UpdateOutcome::Updated) => {
                info!(tx_hash = %tx_hash, "Deposit marked confirmed");
            }
            Ok(UpdateOutcome::NotFound) => {
                error!(tx_hash = %tx_hash, "Delivered deposit not found when marking confirmed");
            }
            Err(e) => {
                error!(tx_hash = %tx_hash, error = %e, "Failed to mark deposit confirmed");
            }
        }
    }

    async fn record_dead_letter(&self, tx_hash: &str) {
        if let Err(e) = self.dead_letters.record(tx_hash).await {
            error!(tx_hash = %tx_hash, error = %e, "Failed to write dead-letter entry");
        }
    }
}
