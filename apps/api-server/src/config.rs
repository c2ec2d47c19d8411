//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub aws: Option<AwsResources>,
    /// Lifetime of signed content URLs, in seconds.
    pub url_expiry_seconds: u64,
    /// Page size applied when a listing request supplies none.
    pub default_page_size: i32,
}

/// Names of the provisioned AWS resources.
///
/// Present only when all three names are configured; otherwise the server
/// runs against in-memory stores.
#[derive(Debug, Clone)]
pub struct AwsResources {
    pub post_table: String,
    pub auth_table: String,
    pub bucket: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let aws = match (
            env::var("POST_METADATA_TABLE_NAME"),
            env::var("AUTH_TABLE_NAME"),
            env::var("S3_BUCKET_NAME"),
        ) {
            (Ok(post_table), Ok(auth_table), Ok(bucket)) => Some(AwsResources {
                post_table,
                auth_table,
                bucket,
            }),
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            aws,
            url_expiry_seconds: env::var("S3_URL_EXPIRY_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(20),
        }
    }
}
