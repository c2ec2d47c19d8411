//! Post lifecycle coordinator.
//!
//! [`PostService`] owns the sequence every post mutation walks through:
//! render Markdown to HTML, write both representations to blob storage
//! under id-derived keys, then write or patch the metadata record that
//! references them. Reads go the other way: fetch metadata, then decorate
//! it with short-lived signed URLs. Steps within one operation are strictly
//! sequential, and a failed step aborts the rest.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::cursor;
use crate::domain::Post;
use crate::error::{PostError, StoreError};
use crate::markdown;
use crate::patch::{AttrValue, RecordPatch};
use crate::ports::{BlobStore, MetadataStore, attr};

pub const HTML_CONTENT_TYPE: &str = "text/html";
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

/// Tunables for the post service.
#[derive(Debug, Clone)]
pub struct PostServiceConfig {
    /// Lifetime of signed blob URLs handed out by reads.
    pub url_ttl: Duration,
    /// Page size used when a list request supplies none.
    pub default_page_size: i32,
}

impl Default for PostServiceConfig {
    fn default() -> Self {
        Self {
            url_ttl: Duration::from_secs(3600),
            default_page_size: 20,
        }
    }
}

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    pub title: String,
    pub tags: Vec<String>,
    pub content: String,
}

/// Sparse input for updating a post. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    pub id: String,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub content: Option<String>,
}

/// Input for listing posts.
#[derive(Debug, Clone, Default)]
pub struct ListPostsInput {
    pub page_size: Option<i32>,
    pub cursor: Option<String>,
}

/// One page of posts plus the cursor for the next page.
///
/// An empty `next_cursor` means the result set is the final page.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub next_cursor: String,
}

/// Coordinates blob storage and the metadata store for post operations.
pub struct PostService {
    blobs: Arc<dyn BlobStore>,
    metadata: Arc<dyn MetadataStore>,
    config: PostServiceConfig,
}

impl PostService {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        metadata: Arc<dyn MetadataStore>,
        config: PostServiceConfig,
    ) -> Self {
        Self {
            blobs,
            metadata,
            config,
        }
    }

    /// Create a post: render, upload both blobs, then write metadata.
    ///
    /// Returns the stored post without signed URLs. If a later step fails,
    /// blobs written by earlier steps are discarded best-effort so no
    /// metadata record ever references content that failed to land, and no
    /// orphaned blob outlives the failed request.
    pub async fn create(&self, input: CreatePostInput) -> Result<Post, PostError> {
        if input.title.is_empty() || input.content.is_empty() {
            return Err(PostError::Validation(
                "fields title and content are required".into(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let html = markdown::render_html(&input.content);
        let html_key = Post::html_key_for(&id);
        let md_key = Post::md_key_for(&id);

        self.blobs
            .put(&html_key, html.as_bytes(), HTML_CONTENT_TYPE)
            .await?;

        if let Err(err) = self
            .blobs
            .put(&md_key, input.content.as_bytes(), MARKDOWN_CONTENT_TYPE)
            .await
        {
            self.discard_blob(&html_key).await;
            return Err(err.into());
        }

        let now = Utc::now().timestamp_millis();
        let post = Post {
            id,
            title: input.title,
            tags: input.tags,
            html_key,
            md_key,
            created_at: now,
            modified_at: now,
            html_url: None,
            md_url: None,
        };

        if let Err(err) = self.metadata.put(&post).await {
            self.discard_blob(&post.html_key).await;
            self.discard_blob(&post.md_key).await;
            return Err(err.into());
        }

        tracing::info!(id = %post.id, "post created");
        Ok(post)
    }

    /// Fetch one post and decorate it with signed retrieval URLs.
    ///
    /// Both URLs are requested independently; if either presign call fails
    /// the whole read fails rather than returning a half-decorated post.
    pub async fn get(&self, id: &str) -> Result<Post, PostError> {
        let mut post = self.fetch_latest(id).await?;

        post.html_url = Some(
            self.blobs
                .presign_get(&post.html_key, self.config.url_ttl)
                .await?,
        );
        post.md_url = Some(
            self.blobs
                .presign_get(&post.md_key, self.config.url_ttl)
                .await?,
        );

        Ok(post)
    }

    /// Apply a sparse update to a post.
    ///
    /// Only supplied fields are written; blob keys and the modification
    /// timestamp are always rewritten since the coordinator recomputes
    /// them on every update. New content is re-rendered and re-uploaded
    /// under the same id-derived keys.
    pub async fn update(&self, input: UpdatePostInput) -> Result<Post, PostError> {
        let mut patch = RecordPatch::for_id(input.id.clone())?;

        let mut post = self.fetch_latest(&input.id).await?;

        // Transient fields, never persisted.
        post.html_url = None;
        post.md_url = None;

        if let Some(title) = input.title {
            post.title = title;
            patch.set(attr::TITLE, AttrValue::S(post.title.clone()));
        }

        if let Some(tags) = input.tags {
            if tags.is_empty() {
                return Err(PostError::Validation("at least one tag is required".into()));
            }
            post.tags = tags;
            patch.set(attr::TAGS, AttrValue::Ss(post.tags.clone()));
        }

        if let Some(content) = &input.content {
            let html = markdown::render_html(content);
            self.blobs
                .put(&post.html_key, html.as_bytes(), HTML_CONTENT_TYPE)
                .await?;
            self.blobs
                .put(&post.md_key, content.as_bytes(), MARKDOWN_CONTENT_TYPE)
                .await?;
        }

        if patch.is_empty() && input.content.is_none() {
            tracing::debug!(id = %post.id, "no optional fields supplied, refreshing derived attributes only");
        }

        post.modified_at = Utc::now().timestamp_millis();
        patch.set(attr::HTML_KEY, AttrValue::S(post.html_key.clone()));
        patch.set(attr::MD_KEY, AttrValue::S(post.md_key.clone()));
        patch.set(attr::MODIFIED_AT, AttrValue::N(post.modified_at));

        match self.metadata.update(&patch, post.created_at).await {
            Ok(()) => {}
            Err(StoreError::ConditionFailed) => {
                return Err(PostError::NotFound { id: post.id });
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(id = %post.id, "post updated");
        Ok(post)
    }

    /// List one page of posts.
    ///
    /// A malformed cursor is a validation error; an absent or empty cursor
    /// starts the scan from the beginning. The returned cursor is empty
    /// when the scan is exhausted.
    pub async fn list(&self, input: ListPostsInput) -> Result<PostPage, PostError> {
        let limit = match input.page_size {
            Some(n) if n > 0 => n,
            _ => self.config.default_page_size,
        };

        let start_key = match input.cursor.as_deref() {
            None | Some("") => None,
            Some(token) => Some(cursor::decode(token)?),
        };

        let page = self.metadata.scan(limit, start_key).await?;
        let next_cursor = page
            .next_key
            .as_ref()
            .map(cursor::encode)
            .unwrap_or_default();

        Ok(PostPage {
            posts: page.posts,
            next_cursor,
        })
    }

    /// Delete a post's metadata record.
    ///
    /// Blobs are left in place; they are unreachable once the record is
    /// gone and are cleaned up out of band. A record that disappears
    /// between the fetch and the conditional delete reports as not found.
    pub async fn delete(&self, id: &str) -> Result<(), PostError> {
        let post = self.fetch_latest(id).await?;

        match self.metadata.delete(id, post.created_at).await {
            Ok(()) => {
                tracing::info!(id, "post deleted");
                Ok(())
            }
            Err(StoreError::ConditionFailed) => Err(PostError::NotFound { id: id.to_string() }),
            Err(err) => Err(err.into()),
        }
    }

    async fn fetch_latest(&self, id: &str) -> Result<Post, PostError> {
        self.metadata
            .get_latest(id)
            .await?
            .ok_or_else(|| PostError::NotFound { id: id.to_string() })
    }

    /// Best-effort removal of a blob written by an operation that later
    /// failed. Failures here are logged and swallowed; the caller reports
    /// the primary error.
    async fn discard_blob(&self, key: &str) {
        if let Err(err) = self.blobs.delete(key).await {
            tracing::warn!(key, error = %err, "failed to discard blob after aborted write");
        }
    }
}
