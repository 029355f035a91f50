use serde::{Deserialize, Serialize};

use crate::error::UploadError;

/// Request size limits enforced by the upload handler.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum decoded request body size in bytes.
    pub max_body_size: Option<u64>,
    /// Maximum accepted size in bytes for the uploaded file.
    pub max_file_size: Option<u64>,
}

impl Limits {
    /// Creates a permissive limits configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when a decoded body of `size` bytes exceeds `max_body_size`.
    pub fn check_body_size(&self, size: usize) -> Result<(), UploadError> {
        match self.max_body_size {
            Some(max_body_size) if size as u64 > max_body_size => {
                Err(UploadError::BodyTooLarge { max_body_size })
            }
            _ => Ok(()),
        }
    }

    /// Fails when a file of `size` bytes exceeds `max_file_size`.
    pub fn check_file_size(&self, field: &str, size: usize) -> Result<(), UploadError> {
        match self.max_file_size {
            Some(max_file_size) if size as u64 > max_file_size => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    field = field,
                    size = size,
                    max_file_size = max_file_size,
                    "limits: file rejected by size limit"
                );

                Err(UploadError::FileTooLarge {
                    field: field.to_owned(),
                    max_file_size,
                })
            }
            _ => Ok(()),
        }
    }
}
