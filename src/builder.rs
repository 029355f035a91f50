use crate::{
    config::UploadConfig,
    error::ConfigError,
    ledger::{NoopLedger, UploadLedger},
    limits::Limits,
    storage::ObjectStore,
    Uploader,
};

/// Builder for configuring an [`Uploader`].
#[derive(Debug, Clone, Default)]
pub struct UploaderBuilder {
    config: UploadConfig,
}

impl UploaderBuilder {
    /// Creates a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current builder configuration snapshot.
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Replaces the full builder configuration.
    pub fn with_config(mut self, config: UploadConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the destination bucket.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config.bucket = bucket.into();
        self
    }

    /// Sets the form field that must carry the file.
    pub fn file_field(mut self, name: impl Into<String>) -> Self {
        self.config.file_field = name.into();
        self
    }

    /// Sets the content type recorded on stored objects.
    pub fn object_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.config.object_content_type = content_type.into();
        self
    }

    /// Sets the extension of generated object keys.
    pub fn key_extension(mut self, extension: impl Into<String>) -> Self {
        self.config.key_extension = extension.into();
        self
    }

    /// Sets the CORS allowed origin.
    pub fn allow_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.allow_origin = origin.into();
        self
    }

    /// Sets request limits.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Validates builder configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()
    }

    /// Finalizes and returns validated configuration.
    pub fn build_config(self) -> Result<UploadConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Builds an uploader that writes to `store` and keeps no ledger.
    pub fn build<S>(self, store: S) -> Result<Uploader<S>, ConfigError>
    where
        S: ObjectStore,
    {
        self.build_with_ledger(store, NoopLedger)
    }

    /// Builds an uploader that writes to `store` and records into `ledger`.
    pub fn build_with_ledger<S, L>(self, store: S, ledger: L) -> Result<Uploader<S, L>, ConfigError>
    where
        S: ObjectStore,
        L: UploadLedger,
    {
        Uploader::with_config(store, ledger, self.config)
    }
}
