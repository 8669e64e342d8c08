use std::time::Duration;
use thiserror::Error;

/// Failure of a single webhook attempt (a non-200 status is not an error here)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WebhookError {
    #[error("Webhook call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Webhook transport error: {0}")]
    Transport(String),

    #[error("Failed to build webhook client: {0}")]
    Client(String),
}
