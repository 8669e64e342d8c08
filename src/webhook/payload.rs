use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::intake::TransferNotification;

pub const EVENT_DEPOSIT_UPDATED: &str = "deposit.updated";
pub const STATUS_CONFIRMED: &str = "confirmed";

/// Body POSTed to the merchant webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub event_type: String,
    pub tx_hash: String,
    pub status: String,
    pub asset: String,
    pub amount: Decimal,
    pub to_address: String,
    pub confirmations: u32,
    pub merchant_id: String,
    pub occurred_at: DateTime<Utc>,
}

impl WebhookPayload {
    pub fn deposit_confirmed(notification: &TransferNotification) -> Self {
        Self {
            event_type: EVENT_DEPOSIT_UPDATED.to_string(),
            tx_hash: notification.tx_hash.clone(),
            status: STATUS_CONFIRMED.to_string(),
            asset: notification.asset.clone(),
            amount: notification.amount,
            to_address: notification.to_address.clone(),
            confirmations: notification.confirmations,
            merchant_id: notification.merchant.id.clone(),
            occurred_at: notification.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::notification;

    #[test]
    fn test_payload_shape() {
        let n = notification("0xabc", 15);
        let payload = WebhookPayload::deposit_confirmed(&n);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["type"], "deposit.updated");
        assert_eq!(value["txHash"], "0xabc");
        assert_eq!(value["status"], "confirmed");
        assert_eq!(value["asset"], "ETH");
        assert_eq!(value["amount"], "1.5");
        assert_eq!(value["toAddress"], n.to_address);
        assert_eq!(value["confirmations"], 15);
        assert_eq!(value["merchantId"], "merchant123");
        assert_eq!(value["occurredAt"], "2024-01-15T10:30:00Z");

        // Delivery coordinates never leak into the body
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 9);
        assert!(!value.to_string().contains(&n.merchant.webhook_secret));
    }
}
