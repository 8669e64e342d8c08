use anyhow::Context;
use std::sync::Arc;

use depositor::config::AppConfig;
use depositor::db::Database;
use depositor::dead_letter::FileDeadLetterLog;
use depositor::deposit::{DepositStore, InMemoryDepositStore, PgDepositStore};
use depositor::gateway::{self, AppState};
use depositor::intake::TransferIntakeCoordinator;
use depositor::webhook::{HttpWebhookClient, WebhookDeliveryEngine};

/// Get environment from command line (--env or -e), default "dev"
fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

async fn build_store(app_config: &AppConfig) -> anyhow::Result<Arc<dyn DepositStore>> {
    match &app_config.postgres_url {
        Some(url) => {
            let db = Database::connect(url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            db.migrate().await.context("Failed to apply schema")?;
            tracing::info!("PostgreSQL deposit store ready");
            Ok(Arc::new(PgDepositStore::new(db.pool().clone())))
        }
        None => {
            tracing::warn!("No postgres_url configured, deposits are kept in memory only");
            Ok(Arc::new(InMemoryDepositStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config = AppConfig::load(&env).context("Failed to load configuration")?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    let _log_guard = depositor::logging::init_logging(&app_config);

    tracing::info!(
        env = %env,
        confirmation_threshold = app_config.intake.confirmation_threshold,
        "Starting depositor"
    );

    let store = build_store(&app_config).await?;
    let dead_letters = Arc::new(FileDeadLetterLog::new(&app_config.dead_letter.path));
    let client = Arc::new(HttpWebhookClient::new().context("Failed to build HTTP client")?);

    let engine = Arc::new(WebhookDeliveryEngine::new(
        store.clone(),
        dead_letters,
        client,
        app_config.retry_policy(),
    ));
    let coordinator = Arc::new(TransferIntakeCoordinator::new(
        store.clone(),
        engine,
        app_config.intake.confirmation_threshold,
    ));
    let state = Arc::new(AppState::new(coordinator, store));

    gateway::run_server(&app_config.gateway.host, app_config.gateway.port, state)
        .await
        .context("Gateway server error")?;

    Ok(())
}
