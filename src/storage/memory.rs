use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use super::{ObjectStore, PutObject, StoredObject};
use crate::StorageError;

/// In-memory object store keyed by `(bucket, key)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    objects: Arc<RwLock<HashMap<(String, String), PutObject>>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a previously stored object.
    pub async fn get(&self, bucket: &str, key: &str) -> Option<PutObject> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_owned(), key.to_owned()))
            .cloned()
    }

    /// Returns the current number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Returns `true` when no objects are stored.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Returns every stored key in `bucket`, sorted.
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .await
            .keys()
            .filter(|(stored_bucket, _)| stored_bucket == bucket)
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, object: PutObject) -> Result<StoredObject, StorageError> {
        let stored = StoredObject {
            bucket: object.bucket.clone(),
            key: object.key.clone(),
            size: object.body.len() as u64,
            path: None,
        };

        self.objects
            .write()
            .await
            .insert((object.bucket.clone(), object.key.clone()), object);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            bucket = stored.bucket.as_str(),
            key = stored.key.as_str(),
            size = stored.size,
            "memory store: object stored"
        );

        Ok(stored)
    }
}
