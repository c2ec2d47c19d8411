//! Post metadata store implementations.

mod memory;

#[cfg(feature = "aws")]
mod dynamo;

pub use memory::{InMemoryAdminUserStore, InMemoryMetadataStore};

#[cfg(feature = "aws")]
pub use dynamo::{DynamoConfig, DynamoStore};
