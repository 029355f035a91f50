use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, limits::Limits};

/// Environment variable naming the destination bucket.
pub const BUCKET_ENV: &str = "INPUT_BUCKET";
/// Environment variable overriding the CORS allowed origin.
pub const ALLOW_ORIGIN_ENV: &str = "UPLOAD_ALLOW_ORIGIN";

const DEFAULT_FILE_FIELD: &str = "file";
const DEFAULT_OBJECT_CONTENT_TYPE: &str = "audio/mpeg";
const DEFAULT_KEY_EXTENSION: &str = "mp3";
const DEFAULT_ALLOW_ORIGIN: &str = "*";

/// Upload handler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Bucket receiving uploaded objects.
    pub bucket: String,
    /// Form field that must carry the uploaded file.
    pub file_field: String,
    /// Content type recorded on stored objects.
    pub object_content_type: String,
    /// Extension appended to generated object keys.
    pub key_extension: String,
    /// Value of the `Access-Control-Allow-Origin` response header.
    pub allow_origin: String,
    /// Request limits.
    pub limits: Limits,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            file_field: DEFAULT_FILE_FIELD.to_owned(),
            object_content_type: DEFAULT_OBJECT_CONTENT_TYPE.to_owned(),
            key_extension: DEFAULT_KEY_EXTENSION.to_owned(),
            allow_origin: DEFAULT_ALLOW_ORIGIN.to_owned(),
            limits: Limits::default(),
        }
    }
}

impl UploadConfig {
    /// Creates a default configuration targeting `bucket`.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket = lookup(BUCKET_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingEnv { name: BUCKET_ENV })?;

        let mut config = Self::new(bucket.trim());
        if let Some(origin) = lookup(ALLOW_ORIGIN_ENV).filter(|value| !value.is_empty()) {
            config.allow_origin = origin;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates configuration invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::EmptyBucket);
        }

        if self.file_field.trim().is_empty() {
            return Err(ConfigError::EmptyFieldName);
        }

        if self.key_extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::EmptyKeyExtension);
        }

        if self.object_content_type.parse::<mime::Mime>().is_err() {
            return Err(ConfigError::InvalidContentType {
                value: self.object_content_type.clone(),
            });
        }

        validate_positive("max_body_size", self.limits.max_body_size)?;
        validate_positive("max_file_size", self.limits.max_file_size)?;
        Ok(())
    }
}

fn validate_positive(limit: &'static str, value: Option<u64>) -> Result<(), ConfigError> {
    if value == Some(0) {
        return Err(ConfigError::InvalidLimitValue { limit });
    }
    Ok(())
}
