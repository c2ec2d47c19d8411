//! DynamoDB-backed metadata store.
//!
//! Post records live in a table keyed by `(id, createdAt)`; admin accounts
//! in a table keyed by `(username, modifiedAt)`. "Latest" lookups are
//! queries with descending sort-key order and a limit of one.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;

use quill_core::cursor::{KeyAttr, ScanKey};
use quill_core::domain::{AdminUser, Post};
use quill_core::error::StoreError;
use quill_core::patch::{AttrValue, RecordPatch};
use quill_core::ports::{AdminUserStore, MetadataStore, ScanPage, attr};

// Admin account attribute names; the table key is (username, modifiedAt).
const USER_USERNAME: &str = "username";
const USER_ROLE: &str = "role";
const USER_PASSWORD_HASH: &str = "password_hash";
const USER_CREATED_AT: &str = "createdAt";
const USER_MODIFIED_AT: &str = "modifiedAt";

/// Table names for the DynamoDB-backed store.
#[derive(Debug, Clone)]
pub struct DynamoConfig {
    pub post_table: String,
    pub auth_table: String,
}

/// Metadata store backed by DynamoDB.
#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    config: DynamoConfig,
}

impl DynamoStore {
    pub fn new(client: Client, config: DynamoConfig) -> Self {
        Self { client, config }
    }

    fn map_aws_error(err: impl std::error::Error + Send + Sync + 'static) -> StoreError {
        StoreError::backend(err)
    }

    /// Insert or replace an admin account record. Used by provisioning,
    /// not by the API server.
    pub async fn put_admin_user(&self, user: &AdminUser) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.config.auth_table)
            .set_item(Some(admin_user_to_item(user)))
            .send()
            .await
            .map_err(Self::map_aws_error)?;

        Ok(())
    }
}

#[async_trait]
impl MetadataStore for DynamoStore {
    async fn put(&self, post: &Post) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.config.post_table)
            .set_item(Some(post_to_item(post)))
            .send()
            .await
            .map_err(Self::map_aws_error)?;

        tracing::debug!(id = %post.id, "post metadata stored");
        Ok(())
    }

    async fn update(&self, patch: &RecordPatch, created_at: i64) -> Result<(), StoreError> {
        let (expression, names, values) = render_patch(patch);

        self.client
            .update_item()
            .table_name(&self.config.post_table)
            .key(attr::ID, AttributeValue::S(patch.id().to_string()))
            .key(attr::CREATED_AT, AttributeValue::N(created_at.to_string()))
            .update_expression(expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .condition_expression("attribute_exists(id)")
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception())
                {
                    StoreError::ConditionFailed
                } else {
                    Self::map_aws_error(err)
                }
            })?;

        Ok(())
    }

    async fn get_latest(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let result = self
            .client
            .query()
            .table_name(&self.config.post_table)
            .key_condition_expression("id = :id")
            .expression_attribute_values(":id", AttributeValue::S(id.to_string()))
            .scan_index_forward(false)
            .limit(1)
            .send()
            .await
            .map_err(Self::map_aws_error)?;

        match result.items().first() {
            Some(item) => post_from_item(item).map(Some),
            None => Ok(None),
        }
    }

    async fn scan(&self, limit: i32, start_key: Option<ScanKey>) -> Result<ScanPage, StoreError> {
        let mut request = self
            .client
            .scan()
            .table_name(&self.config.post_table)
            .limit(limit);

        if let Some(key) = start_key {
            request = request.set_exclusive_start_key(Some(scan_key_to_attrs(key)));
        }

        let result = request.send().await.map_err(Self::map_aws_error)?;

        let posts = result
            .items()
            .iter()
            .map(post_from_item)
            .collect::<Result<Vec<_>, _>>()?;
        let next_key = result.last_evaluated_key().map(scan_key_from_attrs);

        Ok(ScanPage { posts, next_key })
    }

    async fn delete(&self, id: &str, created_at: i64) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.config.post_table)
            .key(attr::ID, AttributeValue::S(id.to_string()))
            .key(attr::CREATED_AT, AttributeValue::N(created_at.to_string()))
            .condition_expression("attribute_exists(id)")
            .send()
            .await
            .map_err(|err| {
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception())
                {
                    StoreError::ConditionFailed
                } else {
                    Self::map_aws_error(err)
                }
            })?;

        tracing::debug!(id, "post metadata deleted");
        Ok(())
    }
}

#[async_trait]
impl AdminUserStore for DynamoStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<AdminUser>, StoreError> {
        let result = self
            .client
            .query()
            .table_name(&self.config.auth_table)
            .key_condition_expression("username = :username")
            .expression_attribute_values(":username", AttributeValue::S(username.to_string()))
            .scan_index_forward(false)
            .limit(1)
            .send()
            .await
            .map_err(Self::map_aws_error)?;

        match result.items().first() {
            Some(item) => admin_user_from_item(item).map(Some),
            None => Ok(None),
        }
    }
}

/// Renders a patch into an UpdateItem SET expression plus its name and
/// value placeholder maps. Placeholders keep attribute names out of the
/// expression text, so store-reserved words cannot clash.
fn render_patch(
    patch: &RecordPatch,
) -> (
    String,
    HashMap<String, String>,
    HashMap<String, AttributeValue>,
) {
    let mut assignments = Vec::with_capacity(patch.clauses().len());
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    for clause in patch.clauses() {
        let name = clause.name_placeholder();
        let value = clause.value_placeholder();
        assignments.push(format!("{name} = {value}"));
        names.insert(name, clause.attribute().to_string());
        values.insert(value, to_attribute_value(clause.value()));
    }

    (format!("SET {}", assignments.join(", ")), names, values)
}

fn to_attribute_value(value: &AttrValue) -> AttributeValue {
    match value {
        AttrValue::S(s) => AttributeValue::S(s.clone()),
        AttrValue::N(n) => AttributeValue::N(n.to_string()),
        AttrValue::Ss(ss) => AttributeValue::Ss(ss.clone()),
    }
}

fn post_to_item(post: &Post) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::from([
        (attr::ID.to_string(), AttributeValue::S(post.id.clone())),
        (
            attr::TITLE.to_string(),
            AttributeValue::S(post.title.clone()),
        ),
        (
            attr::HTML_KEY.to_string(),
            AttributeValue::S(post.html_key.clone()),
        ),
        (
            attr::MD_KEY.to_string(),
            AttributeValue::S(post.md_key.clone()),
        ),
        (
            attr::CREATED_AT.to_string(),
            AttributeValue::N(post.created_at.to_string()),
        ),
        (
            attr::MODIFIED_AT.to_string(),
            AttributeValue::N(post.modified_at.to_string()),
        ),
    ]);

    // DynamoDB rejects empty string sets; an absent attribute means "no tags".
    if !post.tags.is_empty() {
        item.insert(
            attr::TAGS.to_string(),
            AttributeValue::Ss(post.tags.clone()),
        );
    }

    item
}

fn post_from_item(item: &HashMap<String, AttributeValue>) -> Result<Post, StoreError> {
    Ok(Post {
        id: string_attr(item, attr::ID)?,
        title: string_attr(item, attr::TITLE)?,
        tags: item
            .get(attr::TAGS)
            .and_then(|v| v.as_ss().ok())
            .cloned()
            .unwrap_or_default(),
        html_key: string_attr(item, attr::HTML_KEY)?,
        md_key: string_attr(item, attr::MD_KEY)?,
        created_at: number_attr(item, attr::CREATED_AT)?,
        modified_at: number_attr(item, attr::MODIFIED_AT)?,
        html_url: None,
        md_url: None,
    })
}

fn admin_user_to_item(user: &AdminUser) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            USER_USERNAME.to_string(),
            AttributeValue::S(user.username.clone()),
        ),
        (USER_ROLE.to_string(), AttributeValue::S(user.role.clone())),
        (
            USER_PASSWORD_HASH.to_string(),
            AttributeValue::S(user.password_hash.clone()),
        ),
        (
            USER_CREATED_AT.to_string(),
            AttributeValue::N(user.created_at.to_string()),
        ),
        (
            USER_MODIFIED_AT.to_string(),
            AttributeValue::N(user.modified_at.to_string()),
        ),
    ])
}

fn admin_user_from_item(item: &HashMap<String, AttributeValue>) -> Result<AdminUser, StoreError> {
    Ok(AdminUser {
        username: string_attr(item, USER_USERNAME)?,
        role: string_attr(item, USER_ROLE)?,
        password_hash: string_attr(item, USER_PASSWORD_HASH)?,
        created_at: number_attr(item, USER_CREATED_AT)?,
        modified_at: number_attr(item, USER_MODIFIED_AT)?,
    })
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String, StoreError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StoreError::Corrupt(format!("missing string attribute {name}")))
}

fn number_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Result<i64, StoreError> {
    item.get(name)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| StoreError::Corrupt(format!("missing numeric attribute {name}")))
}

fn scan_key_to_attrs(key: ScanKey) -> HashMap<String, AttributeValue> {
    key.into_iter()
        .map(|(name, value)| {
            let value = match value {
                KeyAttr::S(s) => AttributeValue::S(s),
                KeyAttr::N(n) => AttributeValue::N(n),
            };
            (name, value)
        })
        .collect()
}

/// Only scalar string and numeric attributes survive the conversion; a key
/// schema never carries anything else.
fn scan_key_from_attrs(attrs: &HashMap<String, AttributeValue>) -> ScanKey {
    let mut key = ScanKey::new();
    for (name, value) in attrs {
        match value {
            AttributeValue::S(s) => {
                key.insert(name.clone(), KeyAttr::S(s.clone()));
            }
            AttributeValue::N(n) => {
                key.insert(name.clone(), KeyAttr::N(n.clone()));
            }
            _ => continue,
        }
    }
    key
}
