use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreError;

/// Blob storage operations - must be implemented by all content backends.
///
/// Keys are opaque to the store; the service derives them from post ids.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob under the given key with the given content type,
    /// replacing any existing blob at that key.
    async fn put(&self, key: &str, content: &[u8], content_type: &str)
    -> Result<(), StoreError>;

    /// Generate a short-lived signed read URL for a blob.
    async fn presign_get(&self, key: &str, ttl: Duration) -> Result<String, StoreError>;

    /// Delete a blob. Deleting a key that does not exist is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
