use async_trait::async_trait;

use crate::cursor::ScanKey;
use crate::domain::{AdminUser, Post};
use crate::error::StoreError;
use crate::patch::RecordPatch;

/// Attribute names of the post metadata record.
///
/// Shared by the service (which names attributes in patches) and the
/// adapters (which marshal records); keep the two in sync through these
/// constants rather than string literals.
pub mod attr {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const TAGS: &str = "tags";
    pub const HTML_KEY: &str = "html_s3_key";
    pub const MD_KEY: &str = "md_s3_key";
    pub const CREATED_AT: &str = "createdAt";
    pub const MODIFIED_AT: &str = "modifiedAt";
}

/// One page of a metadata scan.
#[derive(Debug, Clone)]
pub struct ScanPage {
    pub posts: Vec<Post>,
    /// Resumption key for the next page, absent when the scan is exhausted.
    pub next_key: Option<ScanKey>,
}

/// Post metadata operations.
///
/// Records are keyed by `(id, created_at)`; writes that address an existing
/// record must therefore carry both parts of the key.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Insert a full metadata record.
    async fn put(&self, post: &Post) -> Result<(), StoreError>;

    /// Apply a partial update to an existing record, identified by the
    /// patch's id plus `created_at`. Fails with
    /// [`StoreError::ConditionFailed`] when no such record exists.
    async fn update(&self, patch: &RecordPatch, created_at: i64) -> Result<(), StoreError>;

    /// Fetch the newest record for an id, or `None` when the id is unknown.
    async fn get_latest(&self, id: &str) -> Result<Option<Post>, StoreError>;

    /// Scan up to `limit` records, resuming from `start_key` when given.
    async fn scan(&self, limit: i32, start_key: Option<ScanKey>) -> Result<ScanPage, StoreError>;

    /// Delete a record by full key. Fails with
    /// [`StoreError::ConditionFailed`] when no such record exists.
    async fn delete(&self, id: &str, created_at: i64) -> Result<(), StoreError>;
}

/// Admin account lookups used by login.
#[async_trait]
pub trait AdminUserStore: Send + Sync {
    /// Fetch the newest account record for a username.
    async fn get_by_username(&self, username: &str) -> Result<Option<AdminUser>, StoreError>;
}
