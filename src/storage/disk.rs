use std::path::PathBuf;

use serde::Serialize;
use tokio::io::AsyncWriteExt;

use super::{sanitize_component, ObjectStore, PutObject, StoredObject};
use crate::StorageError;

const METADATA_SUFFIX: &str = ".metadata.json";

/// Builder for [`DiskStore`].
#[derive(Debug, Clone)]
pub struct DiskStoreBuilder {
    root: PathBuf,
    write_metadata: bool,
}

impl DiskStoreBuilder {
    /// Sets the directory that holds one subdirectory per bucket.
    pub fn destination(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Enables or disables the JSON metadata sidecar file.
    pub fn write_metadata(mut self, enabled: bool) -> Self {
        self.write_metadata = enabled;
        self
    }

    /// Builds a validated disk store.
    pub fn build(self) -> Result<DiskStore, StorageError> {
        if self.root.as_os_str().is_empty() {
            return Err(StorageError::new("disk store root path cannot be empty"));
        }

        Ok(DiskStore {
            root: self.root,
            write_metadata: self.write_metadata,
        })
    }
}

impl Default for DiskStoreBuilder {
    fn default() -> Self {
        Self {
            root: std::env::temp_dir().join("formdrop"),
            write_metadata: true,
        }
    }
}

/// Object store writing `<root>/<bucket>/<key>` files.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
    write_metadata: bool,
}

#[derive(Serialize)]
struct MetadataSidecar<'a> {
    content_type: &'a str,
    size: u64,
    metadata: &'a std::collections::BTreeMap<String, String>,
}

impl DiskStore {
    /// Creates a disk store builder.
    pub fn builder() -> DiskStoreBuilder {
        DiskStoreBuilder::default()
    }

    /// Returns the path an object with this bucket and key is written to.
    pub fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root
            .join(sanitize_component(bucket))
            .join(sanitize_component(key))
    }
}

#[async_trait::async_trait]
impl ObjectStore for DiskStore {
    async fn put(&self, object: PutObject) -> Result<StoredObject, StorageError> {
        let path = self.object_path(&object.bucket, &object.key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                StorageError::new(format!("failed to create bucket directory: {err}"))
            })?;
        }

        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|err| StorageError::new(format!("failed to create object file: {err}")))?;
        file.write_all(&object.body)
            .await
            .map_err(|err| StorageError::new(format!("failed to write object file: {err}")))?;
        file.flush()
            .await
            .map_err(|err| StorageError::new(format!("failed to flush object file: {err}")))?;

        let size = object.body.len() as u64;

        if self.write_metadata {
            let sidecar = MetadataSidecar {
                content_type: &object.content_type,
                size,
                metadata: &object.metadata,
            };
            let json = serde_json::to_vec_pretty(&sidecar)
                .map_err(|err| StorageError::new(format!("failed to encode metadata: {err}")))?;

            let mut sidecar_name = path.as_os_str().to_owned();
            sidecar_name.push(METADATA_SUFFIX);
            tokio::fs::write(PathBuf::from(sidecar_name), json)
                .await
                .map_err(|err| StorageError::new(format!("failed to write metadata: {err}")))?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            bucket = object.bucket.as_str(),
            key = object.key.as_str(),
            size = size,
            path = %path.display(),
            "disk store: object stored"
        );

        Ok(StoredObject {
            bucket: object.bucket,
            key: object.key,
            size,
            path: Some(path),
        })
    }
}
