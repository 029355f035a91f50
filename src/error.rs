use std::fmt;

use thiserror::Error;

/// Configuration-time validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The required file field name was empty.
    #[error("file field name cannot be empty")]
    EmptyFieldName,
    /// The destination bucket name was empty.
    #[error("bucket name cannot be empty")]
    EmptyBucket,
    /// The object key extension was empty.
    #[error("object key extension cannot be empty")]
    EmptyKeyExtension,
    /// The stored object content type does not parse as a MIME type.
    #[error("invalid object content type `{value}`")]
    InvalidContentType {
        /// The rejected content type value.
        value: String,
    },
    /// A configured numeric limit must be strictly greater than zero.
    #[error("limit `{limit}` must be greater than 0")]
    InvalidLimitValue {
        /// Name of the limit.
        limit: &'static str,
    },
    /// A required environment variable was not set.
    #[error("missing environment variable `{name}`")]
    MissingEnv {
        /// Name of the environment variable.
        name: &'static str,
    },
}

/// Structurally fatal multipart failures.
///
/// Malformed individual parts never surface here; they are reported as
/// [`SkipReason`] values next to the parsed fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The `Content-Type` value carries no usable `boundary` parameter.
    #[error("missing multipart boundary parameter")]
    MissingBoundary,
    /// The boundary token cannot delimit parts.
    #[error("invalid multipart boundary: {reason}")]
    InvalidBoundary {
        /// Why the boundary was rejected.
        reason: &'static str,
    },
    /// The body contains no framed boundary delimiter at all.
    #[error("multipart boundary not found in body")]
    BoundaryNotFound,
}

/// Reason a single multipart segment was skipped during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The segment has no blank line separating headers from body.
    MissingHeaderSeparator,
    /// The header block is not valid UTF-8.
    HeadersNotUtf8,
    /// No `Content-Disposition` header line was present.
    MissingContentDisposition,
    /// The disposition type is something other than `form-data`.
    NotFormData,
    /// The disposition parameters could not be tokenized.
    MalformedDisposition,
    /// The disposition has no non-empty `name` parameter.
    MissingName,
    /// A text field value is not valid UTF-8.
    TextNotUtf8,
    /// The final part ends without a framed closing delimiter.
    Unterminated,
}

impl SkipReason {
    /// Returns a stable identifier for logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingHeaderSeparator => "missing_header_separator",
            Self::HeadersNotUtf8 => "headers_not_utf8",
            Self::MissingContentDisposition => "missing_content_disposition",
            Self::NotFormData => "not_form_data",
            Self::MalformedDisposition => "malformed_disposition",
            Self::MissingName => "missing_name",
            Self::TextNotUtf8 => "text_not_utf8",
            Self::Unterminated => "unterminated",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage and ledger backend failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Generic storage failure with message context.
    #[error("{message}")]
    Message {
        /// Storage failure message.
        message: String,
    },
}

impl StorageError {
    /// Creates a storage error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Runtime error type used by the upload handler.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UploadError {
    /// Configuration error surfaced at runtime.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Fatal multipart parser failure.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Object storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The request carries no `Content-Type` header.
    #[error("missing 'Content-Type' header")]
    MissingContentType,
    /// The request body could not be decoded.
    #[error("invalid request body: {reason}")]
    InvalidBody {
        /// Decoder failure message.
        reason: String,
    },
    /// The decoded request body exceeded the configured limit.
    #[error("request body exceeded max body size of {max_body_size} bytes")]
    BodyTooLarge {
        /// Maximum allowed decoded body size in bytes.
        max_body_size: u64,
    },
    /// The uploaded file exceeded the configured size limit.
    #[error("file field `{field}` exceeded max file size of {max_file_size} bytes")]
    FileTooLarge {
        /// Name of the file field.
        field: String,
        /// Maximum allowed file size in bytes.
        max_file_size: u64,
    },
    /// The required file field is absent from the form.
    #[error("missing field `{field}` in the request")]
    MissingRequiredField {
        /// Name of the required field.
        field: String,
    },
    /// The required field was sent as plain text instead of a file.
    #[error("field `{field}` is not a file upload")]
    NotAFile {
        /// Name of the required field.
        field: String,
    },
    /// The uploaded file has no content.
    #[error("file content in field `{field}` is empty")]
    EmptyFile {
        /// Name of the required field.
        field: String,
    },
}

impl UploadError {
    /// Returns a stable snake_case code describing the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Parse(ParseError::MissingBoundary) => "missing_boundary",
            Self::Parse(ParseError::InvalidBoundary { .. }) => "invalid_boundary",
            Self::Parse(ParseError::BoundaryNotFound) => "boundary_not_found",
            Self::Storage(_) => "storage_error",
            Self::MissingContentType => "missing_content_type",
            Self::InvalidBody { .. } => "invalid_body",
            Self::BodyTooLarge { .. } => "body_too_large",
            Self::FileTooLarge { .. } => "file_too_large",
            Self::MissingRequiredField { .. } => "missing_required_field",
            Self::NotAFile { .. } => "not_a_file",
            Self::EmptyFile { .. } => "empty_file",
        }
    }
}
