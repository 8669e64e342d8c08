//! Dead-Letter Recorder
//!
//! Append-only log of transactions whose webhook delivery exhausted all
//! retries. One line per entry:
//!
//! ```text
//! 2024-01-15T10:30:07.123Z - Transaction ID: 0xabc
//! ```
//!
//! The log is an audit trail for manual remediation; nothing reads it back.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Error)]
pub enum DeadLetterError {
    #[error("Dead-letter log IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait DeadLetterRecorder: Send + Sync {
    /// Append an entry for `tx_hash` stamped with the current UTC time.
    async fn record(&self, tx_hash: &str) -> Result<(), DeadLetterError>;
}

/// Format one log line (newline included)
pub fn format_entry(at: DateTime<Utc>, tx_hash: &str) -> String {
    format!(
        "{} - Transaction ID: {}\n",
        at.to_rfc3339_opts(SecondsFormat::Millis, true),
        tx_hash
    )
}

/// File-backed dead-letter log
pub struct FileDeadLetterLog {
    path: PathBuf,
    /// Serializes appends so concurrent entries never interleave
    write_lock: Mutex<()>,
}

impl FileDeadLetterLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DeadLetterRecorder for FileDeadLetterLog {
    async fn record(&self, tx_hash: &str) -> Result<(), DeadLetterError> {
        let line = format_entry(Utc::now(), tx_hash);

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        info!(tx_hash = %tx_hash, path = %self.path.display(), "Dead-letter entry written");
        Ok(())
    }
}
