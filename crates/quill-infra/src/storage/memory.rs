//! In-memory blob store - used as fallback when S3 is not configured.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::error::StoreError;
use quill_core::ports::BlobStore;

#[derive(Clone)]
struct StoredBlob {
    content: Vec<u8>,
    content_type: String,
}

/// In-memory blob store using a HashMap with async RwLock.
///
/// Signed URLs are fake `memory://` links carrying the requested lifetime;
/// like the real store, presigning does not check that the key exists.
/// Note: Data is lost on process restart.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// True when a blob is stored under the key.
    pub async fn contains(&self, key: &str) -> bool {
        self.blobs.read().await.contains_key(key)
    }

    /// Content and content type stored under the key, if any.
    pub async fn stored(&self, key: &str) -> Option<(Vec<u8>, String)> {
        let blobs = self.blobs.read().await;
        blobs
            .get(key)
            .map(|blob| (blob.content.clone(), blob.content_type.clone()))
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        key: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().await;
        blobs.insert(
            key.to_string(),
            StoredBlob {
                content: content.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StoreError> {
        Ok(format!("memory://{}?expires_in={}", key, ttl.as_secs()))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut blobs = self.blobs.write().await;
        blobs.remove(key);
        Ok(())
    }
}
