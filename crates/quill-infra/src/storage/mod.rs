//! Blob storage implementations.

mod memory;

#[cfg(feature = "aws")]
mod s3;

pub use memory::InMemoryBlobStore;

#[cfg(feature = "aws")]
pub use s3::S3BlobStore;
