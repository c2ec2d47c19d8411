//! Provisioning CLI - creates the DynamoDB tables and the content bucket.
//!
//! Idempotent: resources that already exist are left as they are. When
//! `ADMIN_USERNAME` and `ADMIN_PASSWORD` are set, an admin account is
//! seeded into the auth table.

use std::env;
use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, TableStatus,
};
use aws_sdk_s3::types::{
    BucketLocationConstraint, BucketVersioningStatus, CreateBucketConfiguration,
    VersioningConfiguration,
};

use quill_core::domain::AdminUser;
use quill_core::ports::{PasswordService, attr};
use quill_infra::{Argon2PasswordService, DynamoConfig, DynamoStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    let post_table = env::var("POST_METADATA_TABLE_NAME")
        .unwrap_or_else(|_| "PostMetadataTable".to_string());
    let auth_table = env::var("AUTH_TABLE_NAME").unwrap_or_else(|_| "AuthTable".to_string());
    let bucket = env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "quill-posts".to_string());

    let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let dynamo = aws_sdk_dynamodb::Client::new(&shared);
    let s3 = aws_sdk_s3::Client::new(&shared);

    create_table(&dynamo, &post_table, attr::ID, attr::CREATED_AT).await?;
    create_table(&dynamo, &auth_table, "username", "modifiedAt").await?;
    wait_for_table(&dynamo, &post_table).await?;
    wait_for_table(&dynamo, &auth_table).await?;

    create_bucket(&s3, &shared, &bucket).await?;

    seed_admin(&dynamo, &post_table, &auth_table).await?;

    tracing::info!("Provisioning complete");
    Ok(())
}

/// Create a table with a string partition key and a numeric sort key.
async fn create_table(
    client: &aws_sdk_dynamodb::Client,
    table: &str,
    hash_key: &str,
    range_key: &str,
) -> anyhow::Result<()> {
    let result = client
        .create_table()
        .table_name(table)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(hash_key)
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(range_key)
                .attribute_type(ScalarAttributeType::N)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(hash_key)
                .key_type(KeyType::Hash)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(range_key)
                .key_type(KeyType::Range)
                .build()?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    match result {
        Ok(_) => {
            tracing::info!(table, "Table created");
            Ok(())
        }
        Err(err) => {
            let exists = err
                .as_service_error()
                .is_some_and(|e| e.is_resource_in_use_exception());
            if exists {
                tracing::info!(table, "Table already exists");
                Ok(())
            } else {
                Err(err.into())
            }
        }
    }
}

/// Block until a table leaves the CREATING state.
async fn wait_for_table(client: &aws_sdk_dynamodb::Client, table: &str) -> anyhow::Result<()> {
    for _ in 0..30 {
        let described = client.describe_table().table_name(table).send().await?;
        let status = described.table().and_then(|t| t.table_status());
        if matches!(status, Some(TableStatus::Active)) {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    anyhow::bail!("table {} did not become active", table)
}

async fn create_bucket(
    client: &aws_sdk_s3::Client,
    shared: &aws_config::SdkConfig,
    bucket: &str,
) -> anyhow::Result<()> {
    let mut request = client.create_bucket().bucket(bucket);

    // us-east-1 is the one region that rejects an explicit location constraint
    if let Some(region) = shared.region().map(|r| r.as_ref()) {
        if region != "us-east-1" {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }
    }

    match request.send().await {
        Ok(_) => {
            tracing::info!(bucket, "Bucket created");
        }
        Err(err) => {
            let exists = err.as_service_error().is_some_and(|e| {
                e.is_bucket_already_owned_by_you() || e.is_bucket_already_exists()
            });
            if exists {
                tracing::info!(bucket, "Bucket already exists");
            } else {
                return Err(err.into());
            }
        }
    }

    // Posts are mutable blobs; versioning keeps prior revisions reachable
    client
        .put_bucket_versioning()
        .bucket(bucket)
        .versioning_configuration(
            VersioningConfiguration::builder()
                .status(BucketVersioningStatus::Enabled)
                .build(),
        )
        .send()
        .await?;

    Ok(())
}

/// Seed the admin account when credentials are supplied.
async fn seed_admin(
    client: &aws_sdk_dynamodb::Client,
    post_table: &str,
    auth_table: &str,
) -> anyhow::Result<()> {
    let (username, password) = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
        (Ok(username), Ok(password)) => (username, password),
        _ => {
            tracing::info!("ADMIN_USERNAME/ADMIN_PASSWORD not set, skipping admin seed");
            return Ok(());
        }
    };

    let hash = Argon2PasswordService::new().hash(&password)?;
    let store = DynamoStore::new(
        client.clone(),
        DynamoConfig {
            post_table: post_table.to_string(),
            auth_table: auth_table.to_string(),
        },
    );

    store
        .put_admin_user(&AdminUser::new(username.clone(), "admin".to_string(), hash))
        .await?;

    tracing::info!(username = %username, "Admin account seeded");
    Ok(())
}
