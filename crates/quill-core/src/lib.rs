//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! This crate contains the post lifecycle coordinator, its data contracts,
//! and the ports infrastructure must implement - no adapter code.

pub mod cursor;
pub mod domain;
pub mod error;
pub mod markdown;
pub mod patch;
pub mod ports;
pub mod service;

pub use error::{PostError, StoreError};
pub use service::PostService;
