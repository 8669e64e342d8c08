//! Webhook Delivery
//!
//! - [`WebhookPayload`]: fixed `deposit.updated` body
//! - [`WebhookClient`]: outbound transport ([`HttpWebhookClient`] over reqwest)
//! - [`RetryPolicy`]: attempts, exponential backoff, per-attempt timeout
//! - [`WebhookDeliveryEngine`]: detached delivery with dead-lettering

pub mod client;
pub mod engine;
pub mod error;
pub mod payload;
pub mod retry;

pub use client::{HttpWebhookClient, SECRET_HEADER, WebhookClient};
pub use engine::{DeliveryOutcome, WebhookDeliveryEngine};
pub use error::WebhookError;
pub use payload::{EVENT_DEPOSIT_UPDATED, STATUS_CONFIRMED, WebhookPayload};
pub use retry::RetryPolicy;
