use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

use crate::intake::DEFAULT_CONFIRMATION_THRESHOLD;
use crate::webhook::RetryPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL; the in-memory store is used when absent
    #[serde(default)]
    pub postgres_url: Option<String>,
    #[serde(default)]
    pub intake: IntakeConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub dead_letter: DeadLetterConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IntakeConfig {
    pub confirmation_threshold: u32,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            confirmation_threshold: DEFAULT_CONFIRMATION_THRESHOLD,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WebhookConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub timeout_ms: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
            timeout_ms: policy.attempt_timeout.as_millis() as u64,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeadLetterConfig {
    pub path: String,
}

impl Default for DeadLetterConfig {
    fn default() -> Self {
        Self {
            path: "dead_letter_log.log".to_string(),
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml` and apply environment overrides.
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
            path: config_path.clone(),
            source,
        })?;
        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overrides honoured for deployments that configure through the environment:
    /// `CONFIRMATION_THRESHOLD`, `DB_URL` and `PORT`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("CONFIRMATION_THRESHOLD") {
            self.intake.confirmation_threshold = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("CONFIRMATION_THRESHOLD is not a count: {}", raw))
            })?;
        }
        if let Some(url) = lookup("DB_URL")
            && !url.is_empty()
        {
            self.postgres_url = Some(url);
        }
        if let Some(raw) = lookup("PORT") {
            self.gateway.port = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a port: {}", raw)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.webhook.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "webhook.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.webhook.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "webhook.timeout_ms must be positive".to_string(),
            ));
        }
        if self.dead_letter.path.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "dead_letter.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.webhook)
    }
}
