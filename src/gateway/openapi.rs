//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::deposit::{DepositRecord, DepositStatus};
use crate::gateway::types::{ChainTransferData, DepositListData, HealthData};
use crate::gateway::validation::{ChainTransferRequest, MerchantRequest};
use crate::intake::IngestOutcome;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Depositor API",
        version = "1.0.0",
        description = "Chain transfer intake with at-least-once merchant webhook delivery."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::create_chain_transfer,
        crate::gateway::handlers::list_deposits,
        crate::gateway::handlers::health_check,
    ),
    components(
        schemas(
            ChainTransferRequest,
            MerchantRequest,
            ChainTransferData,
            IngestOutcome,
            DepositListData,
            DepositRecord,
            DepositStatus,
            HealthData,
        )
    ),
    tags(
        (name = "Deposits", description = "Chain transfer intake and deposit queries"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
