use serde::{Deserialize, Serialize};

/// Post entity - metadata for a published article.
///
/// The rendered HTML and the Markdown source live in blob storage under
/// `html_key` and `md_key`; the struct itself only carries the keys.
/// `html_url` and `md_url` are filled in with short-lived signed links when
/// a single post is read, and stay `None` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub tags: Vec<String>,
    pub html_key: String,
    pub md_key: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub modified_at: i64,
    pub html_url: Option<String>,
    pub md_url: Option<String>,
}

impl Post {
    /// Blob key for the rendered HTML of a post.
    pub fn html_key_for(id: &str) -> String {
        format!("posts/{id}.html")
    }

    /// Blob key for the Markdown source of a post.
    pub fn md_key_for(id: &str) -> String {
        format!("posts/{id}.md")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_keys_are_namespaced_by_id() {
        assert_eq!(Post::html_key_for("abc"), "posts/abc.html");
        assert_eq!(Post::md_key_for("abc"), "posts/abc.md");
    }
}
