//! Shared fixtures for unit tests

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Mutex;

use crate::dead_letter::{DeadLetterError, DeadLetterRecorder};
use crate::deposit::DepositRecord;
use crate::intake::{MerchantInfo, TransferNotification};

pub const FROM_ADDRESS: &str = "0x1111111111111111111111111111111111111111";
pub const TO_ADDRESS: &str = "0x2222222222222222222222222222222222222222";

/// 1.5 ETH to merchant123, occurred 2024-01-15T10:30:00Z
pub fn notification(tx_hash: &str, confirmations: u32) -> TransferNotification {
    TransferNotification {
        tx_hash: tx_hash.to_string(),
        network: "ethereum".to_string(),
        asset: "ETH".to_string(),
        amount: Decimal::new(15, 1),
        from_address: FROM_ADDRESS.to_string(),
        to_address: TO_ADDRESS.to_string(),
        confirmations,
        occurred_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        merchant: MerchantInfo {
            id: "merchant123".to_string(),
            webhook_url: "http://merchant.test/webhook".to_string(),
            webhook_secret: "secret123".to_string(),
        },
    }
}

pub fn pending_record(tx_hash: &str, merchant_id: &str) -> DepositRecord {
    let mut n = notification(tx_hash, 15);
    n.merchant.id = merchant_id.to_string();
    n.to_pending_record()
}

/// Dead-letter recorder that keeps hashes in memory
#[derive(Default)]
pub struct MemoryDeadLetters {
    entries: Mutex<Vec<String>>,
}

impl MemoryDeadLetters {
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeadLetterRecorder for MemoryDeadLetters {
    async fn record(&self, tx_hash: &str) -> Result<(), DeadLetterError> {
        self.entries.lock().unwrap().push(tx_hash.to_string());
        Ok(())
    }
}
