//! # Quill Shared
//!
//! Wire types shared between the API server and clients.
//! Kept free of domain and infrastructure dependencies.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
