//! Domain-level error types.

use thiserror::Error;

/// Post errors - failures surfaced by the post service.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("no post found with id {id}")]
    NotFound { id: String },

    #[error("storage failure")]
    Storage(#[source] StoreError),
}

/// Store-level errors reported by blob and metadata adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional write found no record to apply to.
    #[error("conditional check failed")]
    ConditionFailed,

    /// A stored record could not be read back into a domain value.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// The backing service rejected or failed the call.
    #[error("backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wraps an arbitrary adapter error as a backend failure.
    pub fn backend(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend {
            source: Box::new(source),
        }
    }
}

impl From<StoreError> for PostError {
    fn from(err: StoreError) -> Self {
        PostError::Storage(err)
    }
}
