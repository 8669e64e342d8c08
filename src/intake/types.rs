use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::deposit::{DepositRecord, DepositStatus};

/// Merchant delivery coordinates
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantInfo {
    pub id: String,
    pub webhook_url: String,
    pub webhook_secret: String,
}

// Keep the shared secret out of logs
impl fmt::Debug for MerchantInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantInfo")
            .field("id", &self.id)
            .field("webhook_url", &self.webhook_url)
            .field("webhook_secret", &"***")
            .finish()
    }
}

/// Inbound transfer event, already format-validated by the transport
///
/// Lives for the duration of one intake call (and the delivery it launches).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferNotification {
    pub tx_hash: String,
    pub network: String,
    pub asset: String,
    pub amount: Decimal,
    pub from_address: String,
    pub to_address: String,
    pub confirmations: u32,
    pub occurred_at: DateTime<Utc>,
    pub merchant: MerchantInfo,
}

impl TransferNotification {
    /// Initial record for this transfer; the store overwrites the bookkeeping
    /// timestamps on insert.
    pub fn to_pending_record(&self) -> DepositRecord {
        let now = Utc::now();
        DepositRecord {
            tx_hash: self.tx_hash.clone(),
            network: self.network.clone(),
            asset: self.asset.clone(),
            amount: self.amount,
            from_address: self.from_address.clone(),
            to_address: self.to_address.clone(),
            confirmations: self.confirmations,
            status: DepositStatus::Pending,
            merchant_id: self.merchant.id.clone(),
            occurred_at: self.occurred_at,
            created_at: now,
            updated_at: now,
        }
    }
}

/// What `ingest` did with a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngestOutcome {
    /// Recorded as pending; webhook delivery launched
    Accepted,
    /// Not enough confirmations yet; nothing stored
    BelowThreshold,
    /// A deposit with this hash already exists; nothing changed
    DuplicateIgnored,
}

impl IngestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestOutcome::Accepted => "ACCEPTED",
            IngestOutcome::BelowThreshold => "BELOW_THRESHOLD",
            IngestOutcome::DuplicateIgnored => "DUPLICATE_IGNORED",
        }
    }
}

impl fmt::Display for IngestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
