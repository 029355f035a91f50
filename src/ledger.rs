//! Upload ledger recording one entry per stored file.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::StorageError;

/// Ledger row written after an object is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    /// Generated object key.
    pub file_key: String,
    /// File name supplied by the client.
    pub original_filename: String,
    /// Processing status, `uploaded` for fresh uploads.
    pub status: String,
    /// Pipeline stage that wrote the record.
    pub stage: String,
    /// When the object was stored.
    pub upload_time: DateTime<Utc>,
}

impl UploadRecord {
    /// Creates an `uploaded` record for the `upload` stage.
    pub fn uploaded(
        file_key: impl Into<String>,
        original_filename: impl Into<String>,
        upload_time: DateTime<Utc>,
    ) -> Self {
        Self {
            file_key: file_key.into(),
            original_filename: original_filename.into(),
            status: "uploaded".to_owned(),
            stage: "upload".to_owned(),
            upload_time,
        }
    }
}

/// Sink for upload records.
#[async_trait::async_trait]
pub trait UploadLedger: Send + Sync + 'static {
    /// Records a completed upload.
    async fn record(&self, record: UploadRecord) -> Result<(), StorageError>;
}

/// Ledger that discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLedger;

#[async_trait::async_trait]
impl UploadLedger for NoopLedger {
    async fn record(&self, _record: UploadRecord) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Ledger keeping records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    records: Arc<RwLock<Vec<UploadRecord>>>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all records, oldest first.
    pub async fn records(&self) -> Vec<UploadRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait::async_trait]
impl UploadLedger for MemoryLedger {
    async fn record(&self, record: UploadRecord) -> Result<(), StorageError> {
        self.records.write().await.push(record);
        Ok(())
    }
}
