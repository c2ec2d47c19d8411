//! In-memory metadata store - used as fallback when DynamoDB is not
//! configured.
//!
//! Records live in a BTreeMap keyed by `(id, created_at)`, so scans walk a
//! deterministic key order and pagination behaves like a real keyed scan.
//! Patches that name an attribute the record does not have are rejected as
//! corrupt instead of being applied loosely; this is stricter than a
//! schema-less store but catches drift between the service and adapters.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::cursor::{KeyAttr, ScanKey};
use quill_core::domain::{AdminUser, Post};
use quill_core::error::StoreError;
use quill_core::patch::{AttrValue, RecordPatch, SetClause};
use quill_core::ports::{AdminUserStore, MetadataStore, ScanPage, attr};

/// In-memory post metadata store.
///
/// Note: Data is lost on process restart.
pub struct InMemoryMetadataStore {
    records: RwLock<BTreeMap<(String, i64), Post>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for InMemoryMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn put(&self, post: &Post) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert((post.id.clone(), post.created_at), post.clone());
        Ok(())
    }

    async fn update(&self, patch: &RecordPatch, created_at: i64) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let key = (patch.id().to_string(), created_at);

        let Some(post) = records.get_mut(&key) else {
            return Err(StoreError::ConditionFailed);
        };

        for clause in patch.clauses() {
            apply_clause(post, clause)?;
        }

        Ok(())
    }

    async fn get_latest(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let records = self.records.read().await;
        let post = records
            .range((id.to_string(), i64::MIN)..=(id.to_string(), i64::MAX))
            .next_back()
            .map(|(_, post)| post.clone());
        Ok(post)
    }

    async fn scan(&self, limit: i32, start_key: Option<ScanKey>) -> Result<ScanPage, StoreError> {
        let lower = match start_key {
            Some(key) => Bound::Excluded(decode_start(&key)?),
            None => Bound::Unbounded,
        };
        let limit = limit.max(1) as usize;

        let records = self.records.read().await;

        let mut posts = Vec::new();
        let mut last_key: Option<(String, i64)> = None;
        let mut more = false;

        for (key, post) in records.range((lower, Bound::Unbounded)) {
            if posts.len() == limit {
                more = true;
                break;
            }
            posts.push(post.clone());
            last_key = Some(key.clone());
        }

        let next_key = match (more, last_key) {
            (true, Some((id, created_at))) => Some(encode_key(&id, created_at)),
            _ => None,
        };

        Ok(ScanPage { posts, next_key })
    }

    async fn delete(&self, id: &str, created_at: i64) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        match records.remove(&(id.to_string(), created_at)) {
            Some(_) => Ok(()),
            None => Err(StoreError::ConditionFailed),
        }
    }
}

fn apply_clause(post: &mut Post, clause: &SetClause) -> Result<(), StoreError> {
    match (clause.attribute(), clause.value()) {
        (attr::TITLE, AttrValue::S(title)) => post.title = title.clone(),
        (attr::TAGS, AttrValue::Ss(tags)) => post.tags = tags.clone(),
        (attr::HTML_KEY, AttrValue::S(key)) => post.html_key = key.clone(),
        (attr::MD_KEY, AttrValue::S(key)) => post.md_key = key.clone(),
        (attr::MODIFIED_AT, AttrValue::N(at)) => post.modified_at = *at,
        (name, _) => {
            return Err(StoreError::Corrupt(format!(
                "unsupported patch attribute {name}"
            )));
        }
    }
    Ok(())
}

/// Lower the scan key into the map's key form. A key that carries only an
/// id resumes after every record of that id.
fn decode_start(key: &ScanKey) -> Result<(String, i64), StoreError> {
    let id = match key.get(attr::ID) {
        Some(KeyAttr::S(id)) => id.clone(),
        _ => return Err(StoreError::Corrupt("scan key is missing the id attribute".into())),
    };

    let created_at = match key.get(attr::CREATED_AT) {
        Some(KeyAttr::N(n)) => n
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("non-numeric creation time in scan key: {n}")))?,
        Some(KeyAttr::S(_)) => {
            return Err(StoreError::Corrupt(
                "creation time in scan key must be numeric".into(),
            ));
        }
        None => i64::MAX,
    };

    Ok((id, created_at))
}

fn encode_key(id: &str, created_at: i64) -> ScanKey {
    let mut key = ScanKey::new();
    key.insert(attr::ID.to_string(), KeyAttr::S(id.to_string()));
    key.insert(
        attr::CREATED_AT.to_string(),
        KeyAttr::N(created_at.to_string()),
    );
    key
}

/// In-memory admin account store.
pub struct InMemoryAdminUserStore {
    users: RwLock<HashMap<String, AdminUser>>,
}

impl InMemoryAdminUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace an account. Used to seed development credentials.
    pub async fn insert(&self, user: AdminUser) {
        let mut users = self.users.write().await;
        users.insert(user.username.clone(), user);
    }
}

impl Default for InMemoryAdminUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdminUserStore for InMemoryAdminUserStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<AdminUser>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }
}
