#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core crate surface for `formdrop`.
//!
//! [`parser`] turns a fully buffered `multipart/form-data` body into named
//! fields. [`Uploader`] wraps it into a request handler that stores the
//! uploaded file and answers with a JSON envelope.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Fluent builder API.
pub mod builder;
/// Upload handler configuration.
pub mod config;
/// Request and response envelope.
pub mod envelope;
/// Error types exposed by this crate.
pub mod error;
/// Parsed field values.
pub mod field;
/// Object key generation.
pub mod key;
/// Upload ledger trait and implementations.
pub mod ledger;
/// Request size limits.
pub mod limits;
/// Multipart body parser.
pub mod parser;
/// Object store trait and implementations.
pub mod storage;

#[cfg(feature = "hyper")]
pub mod hyper;

pub use builder::UploaderBuilder;
pub use config::UploadConfig;
pub use envelope::{UploadRequest, UploadResponse};
pub use error::{ConfigError, ParseError, SkipReason, StorageError, UploadError};
pub use field::{FieldKind, FieldValue, ParseResult};
pub use ledger::{MemoryLedger, NoopLedger, UploadLedger, UploadRecord};
pub use limits::Limits;
pub use parser::{parse, parse_with_report, MultipartParser, ParseReport, SkippedSegment};
pub use storage::{DiskStore, DiskStoreBuilder, MemoryStore, ObjectStore, PutObject, StoredObject};

const UPLOAD_TIME_METADATA: &str = "upload_time";

/// Summary of a successfully stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Generated object key.
    pub file_key: String,
    /// File name supplied by the client.
    pub filename: String,
    /// Stored size in bytes.
    pub size: u64,
    /// When the object was stored.
    pub uploaded_at: DateTime<Utc>,
}

/// Upload request handler.
#[derive(Debug)]
pub struct Uploader<S, L = NoopLedger> {
    config: UploadConfig,
    store: S,
    ledger: L,
}

impl<S, L> Uploader<S, L> {
    /// Creates an uploader with explicit validated configuration.
    pub fn with_config(store: S, ledger: L, config: UploadConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            ledger,
        })
    }

    /// Returns an immutable reference to the active configuration.
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Returns an immutable reference to the object store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns an immutable reference to the upload ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Decodes the request body and parses its multipart form.
    pub fn parse_form(&self, request: &UploadRequest) -> Result<ParseReport, UploadError> {
        let body = request.body_bytes()?;
        self.config.limits.check_body_size(body.len())?;

        let content_type = request
            .header(http::header::CONTENT_TYPE.as_str())
            .ok_or(UploadError::MissingContentType)?;
        let boundary = parser::extract_multipart_boundary(content_type)?;
        let report = parse_with_report(&body, &boundary)?;

        #[cfg(feature = "tracing")]
        if !report.skipped.is_empty() {
            tracing::warn!(
                skipped = ?report.skipped,
                "uploader: request contained malformed multipart parts"
            );
        }

        Ok(report)
    }
}

impl<S, L> Uploader<S, L>
where
    S: ObjectStore,
    L: UploadLedger,
{
    /// Parses, validates and stores the uploaded file.
    pub async fn process(&self, request: &UploadRequest) -> Result<UploadReceipt, UploadError> {
        let mut report = self.parse_form(request)?;
        let (filename, content) = self.take_file(&mut report)?;

        let uploaded_at = Utc::now();
        let file_key = key::generate_object_key(uploaded_at, &self.config.key_extension);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            file_name = filename.as_str(),
            size = content.len(),
            file_key = file_key.as_str(),
            "uploader: storing uploaded file"
        );

        let mut metadata = BTreeMap::new();
        metadata.insert(UPLOAD_TIME_METADATA.to_owned(), uploaded_at.to_rfc3339());

        let stored = self
            .store
            .put(PutObject {
                bucket: self.config.bucket.clone(),
                key: file_key.clone(),
                body: content,
                content_type: self.config.object_content_type.clone(),
                metadata,
            })
            .await?;

        let record = UploadRecord::uploaded(file_key.clone(), filename.clone(), uploaded_at);
        if let Err(_err) = self.ledger.record(record).await {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                file_key = file_key.as_str(),
                error = %_err,
                "uploader: failed to record upload in ledger"
            );
        }

        Ok(UploadReceipt {
            file_key,
            filename,
            size: stored.size,
            uploaded_at,
        })
    }

    /// Handles a request end to end and always produces a response envelope.
    pub async fn handle(&self, request: &UploadRequest) -> UploadResponse {
        match self.process(request).await {
            Ok(receipt) => UploadResponse::success(&receipt.file_key, &self.config.allow_origin),
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::error!(code = err.code(), error = %err, "uploader: upload failed");
                UploadResponse::failure(&err, &self.config.allow_origin)
            }
        }
    }

    fn take_file(&self, report: &mut ParseReport) -> Result<(String, Bytes), UploadError> {
        let field = &self.config.file_field;
        let (filename, content) = match report.fields.remove(field) {
            Some(FieldValue::File { filename, content }) => (filename, content),
            Some(FieldValue::Text { .. }) => {
                return Err(UploadError::NotAFile {
                    field: field.clone(),
                })
            }
            None => {
                return Err(UploadError::MissingRequiredField {
                    field: field.clone(),
                })
            }
        };

        if content.is_empty() {
            return Err(UploadError::EmptyFile {
                field: field.clone(),
            });
        }
        self.config.limits.check_file_size(field, content.len())?;

        Ok((filename, content))
    }
}
