//! Object storage abstractions and built-in implementations.

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::StorageError;

/// Disk-backed object store.
pub mod disk;
/// In-memory object store.
pub mod memory;
pub use disk::{DiskStore, DiskStoreBuilder};
pub use memory::MemoryStore;

/// A single object write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObject {
    /// Destination bucket.
    pub bucket: String,
    /// Object key inside the bucket.
    pub key: String,
    /// Object payload.
    pub body: Bytes,
    /// Content type recorded with the object.
    pub content_type: String,
    /// User metadata recorded with the object.
    pub metadata: BTreeMap<String, String>,
}

/// Metadata describing a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Destination bucket.
    pub bucket: String,
    /// Object key inside the bucket.
    pub key: String,
    /// Persisted size in bytes.
    pub size: u64,
    /// Final filesystem path when stored on disk.
    pub path: Option<std::path::PathBuf>,
}

/// Blob store receiving uploaded files.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Writes one object, replacing any existing object under the same key.
    async fn put(&self, object: PutObject) -> Result<StoredObject, StorageError>;
}

/// Sanitizes a bucket or key so it stays a single safe path component.
pub fn sanitize_component(input: &str) -> String {
    let base = std::path::Path::new(input)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("object");

    let sanitized: String = base
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.trim_matches(['.', ' ']);
    if sanitized.is_empty() {
        return "object".to_owned();
    }

    sanitized.to_owned()
}
