use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::error;

use super::state::AppState;
use super::types::{
    ApiResponse, ChainTransferData, DepositListData, DepositsQuery, HealthData, error_codes,
};
use super::validation::{ChainTransferRequest, ValidatedTransferExtractor};

type ApiError = (StatusCode, Json<ApiResponse<()>>);
type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn api_error(status: StatusCode, code: i32, msg: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::<()>::error(code, msg)))
}

/// POST /chain-transfer
///
/// Every intake outcome answers 201; the outcome field tells them apart.
#[utoipa::path(
    post,
    path = "/chain-transfer",
    request_body = ChainTransferRequest,
    responses(
        (status = 201, description = "Transfer processed; see outcome", body = ApiResponse<ChainTransferData>, content_type = "application/json"),
        (status = 400, description = "Malformed or invalid transfer"),
        (status = 500, description = "Deposit store unavailable")
    ),
    tag = "Deposits"
)]
pub async fn create_chain_transfer(
    State(state): State<Arc<AppState>>,
    ValidatedTransferExtractor(notification): ValidatedTransferExtractor,
) -> ApiResult<ChainTransferData> {
    let tx_hash = notification.tx_hash.clone();

    let outcome = state.coordinator.ingest(notification).await.map_err(|e| {
        error!(tx_hash = %tx_hash, error = %e, "Chain transfer intake failed");
        api_error(
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            error_codes::INTERNAL_ERROR,
            e.code(),
        )
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ChainTransferData { outcome })),
    ))
}

/// GET /deposits?merchantId=
///
/// Newest first; all deposits when `merchantId` is absent or empty.
#[utoipa::path(
    get,
    path = "/deposits",
    params(DepositsQuery),
    responses(
        (status = 200, description = "Deposits, newest first", body = ApiResponse<DepositListData>, content_type = "application/json"),
        (status = 500, description = "Deposit store unavailable")
    ),
    tag = "Deposits"
)]
pub async fn list_deposits(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DepositsQuery>,
) -> ApiResult<DepositListData> {
    let deposits = state
        .store
        .list_by_merchant(query.merchant_id.as_deref().filter(|m| !m.is_empty()))
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list deposits");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "failed to list deposits",
            )
        })?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(DepositListData { deposits })),
    ))
}

/// GET /health
///
/// - Healthy: 200 OK + {code: 0, data: {timestamp_ms}}
/// - Unhealthy: 503 + {code: 5001, msg: "unavailable"}, internals stay in the log
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = ApiResponse<HealthData>, content_type = "application/json"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<HealthData> {
    if let Err(e) = state.store.health_check().await {
        error!(error = %e, "Deposit store health check failed");
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            "unavailable",
        ));
    }

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(HealthData {
            timestamp_ms: Utc::now().timestamp_millis(),
        })),
    ))
}
