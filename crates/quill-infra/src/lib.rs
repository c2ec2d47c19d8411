//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains blob storage, metadata store, and authentication
//! integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `aws` - S3 blob storage and DynamoDB metadata store
//! - `auth` - JWT + Argon2 authentication

pub mod metadata;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use metadata::{InMemoryAdminUserStore, InMemoryMetadataStore};
pub use storage::InMemoryBlobStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

// Re-exports - AWS
#[cfg(feature = "aws")]
pub use metadata::{DynamoConfig, DynamoStore};
#[cfg(feature = "aws")]
pub use storage::S3BlobStore;
