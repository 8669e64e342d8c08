//! HTTP gateway
//!
//! | Method | Path              | Handler                  |
//! |--------|-------------------|--------------------------|
//! | POST   | `/chain-transfer` | `create_chain_transfer`  |
//! | GET    | `/deposits`       | `list_deposits`          |
//! | GET    | `/health`         | `health_check`           |
//!
//! Swagger UI is served at `/docs`, the OpenAPI document at
//! `/api-docs/openapi.json`.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;
pub mod validation;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use state::AppState;
pub use types::{ApiResponse, error_codes};

/// Build the gateway router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chain-transfer", post(handlers::create_chain_transfer))
        .route("/deposits", get(handlers::list_deposits))
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Bind `host:port` and serve until Ctrl-C
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> std::io::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Gateway listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler, keep serving
            error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    }
}
