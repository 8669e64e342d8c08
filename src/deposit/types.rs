use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Deposit lifecycle status
///
/// `Pending` is the only legal initial value. `Confirmed` is terminal and is
/// only set after the merchant acknowledged the webhook. `InProgress` is part
/// of the stored schema but nothing assigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, ToSchema)]
pub enum DepositStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "inProgress")]
    InProgress,
    #[serde(rename = "confirmed")]
    Confirmed,
}

impl DepositStatus {
    /// Storage / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositStatus::Pending => "pending",
            DepositStatus::InProgress => "inProgress",
            DepositStatus::Confirmed => "confirmed",
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, DepositStatus::Confirmed)
    }
}

impl fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepositStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DepositStatus::Pending),
            "inProgress" => Ok(DepositStatus::InProgress),
            "confirmed" => Ok(DepositStatus::Confirmed),
            _ => Err(format!("Invalid deposit status: {}", s)),
        }
    }
}

/// Durable record of a transfer that passed the confirmation gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    #[schema(example = "0xabc123")]
    pub tx_hash: String,
    pub network: String,
    pub asset: String,
    #[schema(value_type = String, example = "1.5")]
    pub amount: Decimal,
    pub from_address: String,
    pub to_address: String,
    /// Confirmation count seen at ingestion time
    pub confirmations: u32,
    pub status: DepositStatus,
    pub merchant_id: String,
    /// Time of the on-chain event
    pub occurred_at: DateTime<Utc>,
    /// Assigned by the store on insert
    pub created_at: DateTime<Utc>,
    /// Assigned by the store on every write
    pub updated_at: DateTime<Utc>,
}

/// Result of an insert-if-absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// Result of a status update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(DepositStatus::Pending.as_str(), "pending");
        assert_eq!(DepositStatus::InProgress.as_str(), "inProgress");
        assert_eq!(DepositStatus::Confirmed.to_string(), "confirmed");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("inProgress".parse::<DepositStatus>(), Ok(DepositStatus::InProgress));
        assert_eq!("confirmed".parse::<DepositStatus>(), Ok(DepositStatus::Confirmed));
        assert!("CONFIRMED".parse::<DepositStatus>().is_err());
        assert!("".parse::<DepositStatus>().is_err());
    }

    #[test]
    fn test_status_default_and_terminal() {
        assert_eq!(DepositStatus::default(), DepositStatus::Pending);
        assert!(DepositStatus::Confirmed.is_terminal());
        assert!(!DepositStatus::Pending.is_terminal());
        assert!(!DepositStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_status_serde_matches_storage_strings() {
        let json = serde_json::to_string(&DepositStatus::InProgress).unwrap();
        assert_eq!(json, "\"inProgress\"");
        let back: DepositStatus = serde_json::from_str("\"confirmed\"").unwrap();
        assert_eq!(back, DepositStatus::Confirmed);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let now = Utc::now();
        let record = DepositRecord {
            tx_hash: "0xabc".to_string(),
            network: "ethereum".to_string(),
            asset: "ETH".to_string(),
            amount: Decimal::new(150, 2),
            from_address: "0xfrom".to_string(),
            to_address: "0xto".to_string(),
            confirmations: 15,
            status: DepositStatus::Pending,
            merchant_id: "merchant123".to_string(),
            occurred_at: now,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["txHash"], "0xabc");
        assert_eq!(value["merchantId"], "merchant123");
        assert_eq!(value["amount"], "1.50");
        assert_eq!(value["status"], "pending");
    }
}
