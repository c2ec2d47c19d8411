//! Application state - shared across all handlers.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use aws_config::BehaviorVersion;

use quill_core::PostService;
use quill_core::domain::AdminUser;
use quill_core::ports::{AdminUserStore, BlobStore, MetadataStore, PasswordService};
use quill_core::service::PostServiceConfig;
use quill_infra::{
    Argon2PasswordService, DynamoConfig, DynamoStore, InMemoryAdminUserStore, InMemoryBlobStore,
    InMemoryMetadataStore, S3BlobStore,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub users: Arc<dyn AdminUserStore>,
    /// Which backing stores this process was started with.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let service_config = PostServiceConfig {
            url_ttl: Duration::from_secs(config.url_expiry_seconds),
            default_page_size: config.default_page_size,
        };

        let blobs: Arc<dyn BlobStore>;
        let metadata: Arc<dyn MetadataStore>;
        let users: Arc<dyn AdminUserStore>;
        let storage: &'static str;

        match &config.aws {
            Some(aws) => {
                let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
                let store = DynamoStore::new(
                    aws_sdk_dynamodb::Client::new(&shared),
                    DynamoConfig {
                        post_table: aws.post_table.clone(),
                        auth_table: aws.auth_table.clone(),
                    },
                );

                blobs = Arc::new(S3BlobStore::new(
                    aws_sdk_s3::Client::new(&shared),
                    aws.bucket.clone(),
                ));
                metadata = Arc::new(store.clone());
                users = Arc::new(store);
                storage = "dynamodb+s3";

                tracing::info!(
                    post_table = %aws.post_table,
                    auth_table = %aws.auth_table,
                    bucket = %aws.bucket,
                    "Using AWS-backed stores"
                );
            }
            None => {
                tracing::warn!(
                    "AWS resource names not set. Running with in-memory stores (data is lost on restart)."
                );

                let accounts = InMemoryAdminUserStore::new();
                seed_dev_admin(&accounts).await;

                blobs = Arc::new(InMemoryBlobStore::new());
                metadata = Arc::new(InMemoryMetadataStore::new());
                users = Arc::new(accounts);
                storage = "in-memory";
            }
        }

        tracing::info!("Application state initialized");

        Self {
            posts: Arc::new(PostService::new(blobs, metadata, service_config)),
            users,
            storage,
        }
    }
}

/// Seed an admin account from `ADMIN_USERNAME`/`ADMIN_PASSWORD` so the
/// login flow works without a provisioned auth table.
async fn seed_dev_admin(accounts: &InMemoryAdminUserStore) {
    let (username, password) = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
        (Ok(username), Ok(password)) => (username, password),
        _ => return,
    };

    match Argon2PasswordService::new().hash(&password) {
        Ok(hash) => {
            accounts
                .insert(AdminUser::new(username, "admin".to_string(), hash))
                .await;
            tracing::info!("Seeded in-memory admin account");
        }
        Err(e) => tracing::error!("Failed to hash seeded admin password: {}", e),
    }
}
