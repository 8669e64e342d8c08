//! API response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `error_codes`: Standard error code constants

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::deposit::DepositRecord;
use crate::intake::IngestOutcome;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = 0)]
    pub code: i32,
    #[schema(example = "ok")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// POST /chain-transfer response data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChainTransferData {
    pub outcome: IngestOutcome,
}

/// GET /deposits response data
#[derive(Debug, Serialize, ToSchema)]
pub struct DepositListData {
    pub deposits: Vec<DepositRecord>,
}

/// GET /health response data
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthData {
    #[schema(example = 1705314600000_i64)]
    pub timestamp_ms: i64,
}

/// GET /deposits query string
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DepositsQuery {
    /// Only deposits of this merchant; empty or absent lists all
    #[serde(rename = "merchantId")]
    pub merchant_id: Option<String>,
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}
