use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use super::error::WebhookError;
use super::payload::WebhookPayload;

/// Header carrying the merchant's shared secret
pub const SECRET_HEADER: &str = "X-Webhook-Secret";

/// Outbound webhook transport
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// POST `payload` as JSON to `url` and return the HTTP status code.
    async fn post(
        &self,
        url: &str,
        secret: &str,
        payload: &WebhookPayload,
        timeout: Duration,
    ) -> Result<u16, WebhookError>;
}

/// `reqwest`-backed webhook client
#[derive(Clone)]
pub struct HttpWebhookClient {
    http: reqwest::Client,
}

impl HttpWebhookClient {
    pub fn new() -> Result<Self, WebhookError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("depositor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WebhookError::Client(e.to_string()))?;
        Ok(Self { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn post(
        &self,
        url: &str,
        secret: &str,
        payload: &WebhookPayload,
        timeout: Duration,
    ) -> Result<u16, WebhookError> {
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(SECRET_HEADER, secret)
            .json(payload)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WebhookError::Timeout(timeout)
                } else {
                    WebhookError::Transport(e.to_string())
                }
            })?;

        Ok(response.status().as_u16())
    }
}
