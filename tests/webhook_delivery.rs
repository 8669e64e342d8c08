//! Webhook delivery over real HTTP against a throwaway merchant server

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempdir::TempDir;
use tokio::net::TcpListener;

use depositor::dead_letter::FileDeadLetterLog;
use depositor::deposit::{DepositStatus, DepositStore, InMemoryDepositStore};
use depositor::intake::{MerchantInfo, TransferNotification};
use depositor::webhook::{DeliveryOutcome, HttpWebhookClient, RetryPolicy, WebhookDeliveryEngine};

#[derive(Default)]
struct Merchant {
    /// Status codes to answer with, in order; 200 once exhausted
    script: Mutex<VecDeque<u16>>,
    /// Delay before answering
    delay: Option<Duration>,
    received: Mutex<Vec<(Option<String>, serde_json::Value)>>,
}

impl Merchant {
    fn scripted(statuses: &[u16]) -> Self {
        Self {
            script: Mutex::new(statuses.iter().copied().collect()),
            ..Self::default()
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    fn received(&self) -> Vec<(Option<String>, serde_json::Value)> {
        self.received.lock().unwrap().clone()
    }
}

async fn webhook(
    State(merchant): State<Arc<Merchant>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    let secret = headers
        .get("x-webhook-secret")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    merchant.received.lock().unwrap().push((secret, body));

    if let Some(delay) = merchant.delay {
        tokio::time::sleep(delay).await;
    }

    let status = merchant.script.lock().unwrap().pop_front().unwrap_or(200);
    StatusCode::from_u16(status).unwrap()
}

/// Start a merchant endpoint on an ephemeral port, return its webhook URL
async fn spawn_merchant(merchant: Arc<Merchant>) -> String {
    let app = Router::new()
        .route("/webhook", post(webhook))
        .with_state(merchant);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/webhook", addr)
}

fn notification(tx_hash: &str, webhook_url: &str) -> TransferNotification {
    TransferNotification {
        tx_hash: tx_hash.to_string(),
        network: "ethereum".to_string(),
        asset: "USDT".to_string(),
        amount: Decimal::new(10025, 2),
        from_address: "0x1111111111111111111111111111111111111111".to_string(),
        to_address: "0x2222222222222222222222222222222222222222".to_string(),
        confirmations: 15,
        occurred_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        merchant: MerchantInfo {
            id: "merchant123".to_string(),
            webhook_url: webhook_url.to_string(),
            webhook_secret: "secret123".to_string(),
        },
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(20),
        attempt_timeout: Duration::from_millis(300),
    }
}

struct Setup {
    store: Arc<InMemoryDepositStore>,
    engine: WebhookDeliveryEngine,
    dead_letter_path: std::path::PathBuf,
    _dir: TempDir,
}

fn setup(policy: RetryPolicy) -> Setup {
    let dir = TempDir::new("depositor-webhook").unwrap();
    let dead_letter_path = dir.path().join("dead_letter_log.log");
    let store = Arc::new(InMemoryDepositStore::new());
    let engine = WebhookDeliveryEngine::new(
        store.clone(),
        Arc::new(FileDeadLetterLog::new(&dead_letter_path)),
        Arc::new(HttpWebhookClient::new().unwrap()),
        policy,
    );
    Setup {
        store,
        engine,
        dead_letter_path,
        _dir: dir,
    }
}

async fn seed(store: &InMemoryDepositStore, n: &TransferNotification) {
    store.try_insert(&n.to_pending_record()).await.unwrap();
}

#[tokio::test]
async fn test_headers_and_body_reach_merchant() {
    let merchant = Arc::new(Merchant::default());
    let url = spawn_merchant(merchant.clone()).await;
    let s = setup(fast_policy());
    let n = notification("0xfeed01", &url);
    seed(&s.store, &n).await;

    let outcome = s.engine.run(&n).await;

    assert_eq!(outcome, DeliveryOutcome::Delivered { attempts: 1 });
    let received = merchant.received();
    assert_eq!(received.len(), 1);
    let (secret, body) = &received[0];
    assert_eq!(secret.as_deref(), Some("secret123"));
    assert_eq!(body["type"], "deposit.updated");
    assert_eq!(body["txHash"], "0xfeed01");
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["asset"], "USDT");
    assert_eq!(body["amount"], "100.25");
    assert_eq!(body["toAddress"], "0x2222222222222222222222222222222222222222");
    assert_eq!(body["confirmations"], 15);
    assert_eq!(body["merchantId"], "merchant123");
    assert!(body.get("webhookSecret").is_none());

    let record = s.store.get("0xfeed01").await.unwrap().unwrap();
    assert_eq!(record.status, DepositStatus::Confirmed);
}

#[tokio::test]
async fn test_two_failures_then_success_confirms() {
    let merchant = Arc::new(Merchant::scripted(&[500, 503, 200]));
    let url = spawn_merchant(merchant.clone()).await;
    let s = setup(fast_policy());
    let n = notification("0xfeed02", &url);
    seed(&s.store, &n).await;

    let outcome = s.engine.run(&n).await;

    assert_eq!(outcome, DeliveryOutcome::Delivered { attempts: 3 });
    assert_eq!(merchant.received().len(), 3);
    let record = s.store.get("0xfeed02").await.unwrap().unwrap();
    assert_eq!(record.status, DepositStatus::Confirmed);
    assert!(!s.dead_letter_path.exists());
}

#[tokio::test]
async fn test_exhausted_delivery_appends_dead_letter_line() {
    let merchant = Arc::new(Merchant::scripted(&[500, 500, 500, 500]));
    let url = spawn_merchant(merchant.clone()).await;
    let s = setup(fast_policy());
    let n = notification("0xfeed03", &url);
    seed(&s.store, &n).await;

    let outcome = s.engine.run(&n).await;

    assert_eq!(outcome, DeliveryOutcome::DeadLettered { attempts: 3 });
    assert_eq!(merchant.received().len(), 3);

    let log = std::fs::read_to_string(&s.dead_letter_path).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(" - Transaction ID: 0xfeed03"), "{}", lines[0]);

    let record = s.store.get("0xfeed03").await.unwrap().unwrap();
    assert_eq!(record.status, DepositStatus::Pending);
}

#[tokio::test]
async fn test_slow_merchant_counts_as_failure() {
    let merchant = Arc::new(Merchant::slow(Duration::from_millis(500)));
    let url = spawn_merchant(merchant.clone()).await;
    let s = setup(RetryPolicy {
        max_attempts: 2,
        initial_backoff: Duration::from_millis(10),
        attempt_timeout: Duration::from_millis(100),
    });
    let n = notification("0xfeed04", &url);
    seed(&s.store, &n).await;

    let outcome = s.engine.run(&n).await;

    assert_eq!(outcome, DeliveryOutcome::DeadLettered { attempts: 2 });
    let record = s.store.get("0xfeed04").await.unwrap().unwrap();
    assert_eq!(record.status, DepositStatus::Pending);
}

#[tokio::test]
async fn test_unreachable_merchant_dead_letters() {
    // Grab a free port, then close it
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let s = setup(fast_policy());
    let n = notification("0xfeed05", &format!("http://{}/webhook", addr));
    seed(&s.store, &n).await;

    let outcome = s.engine.run(&n).await;

    assert_eq!(outcome, DeliveryOutcome::DeadLettered { attempts: 3 });
    let log = std::fs::read_to_string(&s.dead_letter_path).unwrap();
    assert_eq!(log.lines().count(), 1);
}
