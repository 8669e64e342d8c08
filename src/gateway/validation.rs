//! Chain transfer request validation
//!
//! - `ChainTransferRequest`: wire format of `POST /chain-transfer`
//! - `validate_chain_transfer`: format checks, then conversion to
//!   `TransferNotification`
//! - `ValidatedTransferExtractor`: Axum extractor so handlers never see
//!   unvalidated input

use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use utoipa::ToSchema;

use super::types::{ApiResponse, error_codes};
use crate::intake::{MerchantInfo, TransferNotification};

const MAX_TX_HASH_LEN: usize = 255;
const MAX_NETWORK_LEN: usize = 50;
const MAX_ASSET_LEN: usize = 20;
const MAX_MERCHANT_ID_LEN: usize = 255;
const MAX_WEBHOOK_URL_LEN: usize = 500;
const MAX_WEBHOOK_SECRET_LEN: usize = 255;
const ADDRESS_HEX_LEN: usize = 40;
const MAX_AMOUNT_FRACTION_DIGITS: usize = 8;

/// Merchant block of a chain transfer request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantRequest {
    #[schema(example = "merchant123", max_length = 255)]
    pub id: String,
    #[schema(example = "https://merchant.example.com/webhook", max_length = 500)]
    pub webhook_url: String,
    #[schema(max_length = 255)]
    pub webhook_secret: String,
}

/// Chain transfer notification (HTTP request deserialization)
///
/// `amount` stays a string until validated so `1e5` or `.5` can be rejected
/// before decimal parsing.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainTransferRequest {
    #[schema(example = "0xabc123", max_length = 255)]
    pub tx_hash: String,
    #[schema(example = "ethereum", max_length = 50)]
    pub network: String,
    #[schema(example = "ETH", max_length = 20)]
    pub asset: String,
    #[schema(example = "1.5")]
    pub amount: String,
    #[schema(example = "0x1111111111111111111111111111111111111111")]
    pub from_address: String,
    #[schema(example = "0x2222222222222222222222222222222222222222")]
    pub to_address: String,
    #[schema(example = 15, minimum = 0)]
    pub confirmations: i64,
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub occurred_at: String,
    pub merchant: MerchantRequest,
}

/// Validate a request and convert it into an intake notification.
///
/// Returns the first violation found.
pub fn validate_chain_transfer(req: ChainTransferRequest) -> Result<TransferNotification, String> {
    require_text("txHash", &req.tx_hash, MAX_TX_HASH_LEN)?;
    if !is_prefixed_hex(&req.tx_hash) {
        return Err("txHash must be 0x-prefixed hex".to_string());
    }

    require_text("network", &req.network, MAX_NETWORK_LEN)?;
    require_text("asset", &req.asset, MAX_ASSET_LEN)?;

    let amount = parse_amount(&req.amount)?;

    if !is_address(&req.from_address) {
        return Err("fromAddress must be 0x followed by 40 hex characters".to_string());
    }
    if !is_address(&req.to_address) {
        return Err("toAddress must be 0x followed by 40 hex characters".to_string());
    }

    if req.confirmations < 0 {
        return Err("confirmations must not be negative".to_string());
    }
    let confirmations =
        u32::try_from(req.confirmations).map_err(|_| "confirmations out of range".to_string())?;

    let occurred_at = DateTime::parse_from_rfc3339(&req.occurred_at)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| "occurredAt must be an RFC 3339 timestamp".to_string())?;

    let merchant = req.merchant;
    require_text("merchant.id", &merchant.id, MAX_MERCHANT_ID_LEN)?;
    require_text(
        "merchant.webhookUrl",
        &merchant.webhook_url,
        MAX_WEBHOOK_URL_LEN,
    )?;
    require_text(
        "merchant.webhookSecret",
        &merchant.webhook_secret,
        MAX_WEBHOOK_SECRET_LEN,
    )?;

    Ok(TransferNotification {
        tx_hash: req.tx_hash,
        network: req.network,
        asset: req.asset,
        amount,
        from_address: req.from_address,
        to_address: req.to_address,
        confirmations,
        occurred_at,
        merchant: MerchantInfo {
            id: merchant.id,
            webhook_url: merchant.webhook_url,
            webhook_secret: merchant.webhook_secret,
        },
    })
}

fn require_text(field: &str, value: &str, max_chars: usize) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    if value.chars().count() > max_chars {
        return Err(format!("{} must be at most {} characters", field, max_chars));
    }
    Ok(())
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_prefixed_hex(s: &str) -> bool {
    s.strip_prefix("0x").is_some_and(is_hex)
}

fn is_address(s: &str) -> bool {
    s.strip_prefix("0x")
        .is_some_and(|hex| hex.len() == ADDRESS_HEX_LEN && is_hex(hex))
}

/// Plain decimal: digits, optionally `.` and 1-8 fraction digits
fn parse_amount(s: &str) -> Result<Decimal, String> {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    let well_formed = match s.split_once('.') {
        Some((int, frac)) => {
            all_digits(int) && all_digits(frac) && frac.len() <= MAX_AMOUNT_FRACTION_DIGITS
        }
        None => all_digits(s),
    };
    if !well_formed {
        return Err(format!(
            "amount must be a non-negative decimal with at most {} fraction digits",
            MAX_AMOUNT_FRACTION_DIGITS
        ));
    }

    Decimal::from_str(s).map_err(|_| "amount out of range".to_string())
}

// ============================================================================
// ValidatedTransferExtractor: Axum Framework Integration
// ============================================================================

/// Validated chain transfer - rejected before the handler runs if malformed.
#[derive(Debug)]
pub struct ValidatedTransferExtractor(pub TransferNotification);

/// Rejection type for ValidatedTransferExtractor
#[derive(Debug)]
pub struct TransferValidationRejection {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for TransferValidationRejection {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::error(
            error_codes::INVALID_PARAMETER,
            self.message,
        ));
        (self.status, body).into_response()
    }
}

impl<S> FromRequest<S> for ValidatedTransferExtractor
where
    S: Send + Sync,
{
    type Rejection = TransferValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // 1. Extract JSON body
        let Json(request): Json<ChainTransferRequest> = Json::from_request(req, state)
            .await
            .map_err(|e| TransferValidationRejection {
                status: StatusCode::BAD_REQUEST,
                message: format!("Invalid JSON: {}", e.body_text()),
            })?;

        // 2. Format validation
        let notification =
            validate_chain_transfer(request).map_err(|message| TransferValidationRejection {
                status: StatusCode::BAD_REQUEST,
                message,
            })?;

        Ok(ValidatedTransferExtractor(notification))
    }
}
