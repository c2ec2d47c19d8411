//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod blob_store;
mod metadata_store;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use blob_store::BlobStore;
pub use metadata_store::{AdminUserStore, MetadataStore, ScanPage, attr};
