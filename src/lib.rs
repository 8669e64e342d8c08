//! Depositor - Chain Deposit Intake and Merchant Webhook Service
//!
//! Accepts confirmed on-chain transfer notifications, records each
//! transaction once, and notifies the owning merchant by webhook with
//! bounded retry and a dead-letter log.
//!
//! # Modules
//!
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`deposit`] - Deposit records and stores (PostgreSQL, in-memory)
//! - [`dead_letter`] - Append-only log of undeliverable webhooks
//! - [`webhook`] - Payload, HTTP client, retry policy, delivery engine
//! - [`intake`] - Confirmation gate and duplicate suppression
//! - [`gateway`] - axum HTTP surface

pub mod config;
pub mod dead_letter;
pub mod db;
pub mod deposit;
pub mod gateway;
pub mod intake;
pub mod logging;
pub mod webhook;

#[cfg(test)]
pub(crate) mod test_support;

// Convenient re-exports at crate root
pub use config::{AppConfig, ConfigError};
pub use dead_letter::{DeadLetterRecorder, FileDeadLetterLog};
pub use deposit::{
    DepositRecord, DepositStatus, DepositStore, InMemoryDepositStore, PgDepositStore,
};
pub use intake::{IngestOutcome, TransferIntakeCoordinator, TransferNotification};
pub use webhook::{HttpWebhookClient, RetryPolicy, WebhookDeliveryEngine};
