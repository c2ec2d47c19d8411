//! HTTP surface tests: routing, auth gating, envelopes, error bodies.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};

use quill_core::PostService;
use quill_core::domain::AdminUser;
use quill_core::ports::{PasswordService, TokenService};
use quill_core::service::{CreatePostInput, PostServiceConfig};
use quill_infra::{
    Argon2PasswordService, InMemoryAdminUserStore, InMemoryBlobStore, InMemoryMetadataStore,
    JwtConfig, JwtTokenService,
};
use quill_shared::dto::{AuthResponse, ListPostsResponse, PostResponse};
use quill_shared::{ApiResponse, ErrorResponse};

use crate::handlers;
use crate::state::AppState;

fn auth_services() -> (Arc<dyn TokenService>, Arc<dyn PasswordService>) {
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "test-secret".to_string(),
        expiration_hours: 1,
        issuer: "quill-test".to_string(),
    }));
    let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    (tokens, passwords)
}

fn state_with_users(users: InMemoryAdminUserStore) -> AppState {
    AppState {
        posts: Arc::new(PostService::new(
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(InMemoryMetadataStore::new()),
            PostServiceConfig::default(),
        )),
        users: Arc::new(users),
        storage: "in-memory",
    }
}

fn blank_state() -> AppState {
    state_with_users(InMemoryAdminUserStore::new())
}

fn bearer(tokens: &Arc<dyn TokenService>, username: &str, role: &str) -> (header::HeaderName, String) {
    let token = tokens.generate_token(username, role).unwrap();
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

fn sample_create_body() -> serde_json::Value {
    serde_json::json!({
        "title": "First post",
        "tags": ["rust"],
        "content": "# Hello"
    })
}

macro_rules! spawn_app {
    ($state:expr, $tokens:expr, $passwords:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .app_data(web::Data::new($tokens.clone()))
                .app_data(web::Data::new($passwords.clone()))
                .configure(handlers::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn health_endpoint_reports_ok() {
    let (tokens, passwords) = auth_services();
    let state = blank_state();
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "in-memory");
}

#[actix_web::test]
async fn login_issues_token_for_valid_credentials() {
    let (tokens, passwords) = auth_services();
    let users = InMemoryAdminUserStore::new();
    let hash = passwords.hash("hunter2").unwrap();
    users
        .insert(AdminUser::new(
            "margo".to_string(),
            "admin".to_string(),
            hash,
        ))
        .await;
    let state = state_with_users(users);
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({"username": "margo", "password": "hunter2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(body.token_type, "Bearer");
    assert_eq!(body.expires_in, 3600);

    let claims = tokens.validate_token(&body.access_token).unwrap();
    assert_eq!(claims.username, "margo");
    assert_eq!(claims.role, "admin");
}

#[actix_web::test]
async fn login_rejects_unknown_username() {
    let (tokens, passwords) = auth_services();
    let state = blank_state();
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({"username": "nobody", "password": "hunter2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn login_rejects_wrong_password() {
    let (tokens, passwords) = auth_services();
    let users = InMemoryAdminUserStore::new();
    let hash = passwords.hash("hunter2").unwrap();
    users
        .insert(AdminUser::new(
            "margo".to_string(),
            "admin".to_string(),
            hash,
        ))
        .await;
    let state = state_with_users(users);
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({"username": "margo", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_requires_bearer_token() {
    let (tokens, passwords) = auth_services();
    let state = blank_state();
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .set_json(sample_create_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_rejects_non_admin_role() {
    let (tokens, passwords) = auth_services();
    let state = blank_state();
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(bearer(&tokens, "eve", "viewer"))
        .set_json(sample_create_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn create_returns_stored_post_in_envelope() {
    let (tokens, passwords) = auth_services();
    let state = blank_state();
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(bearer(&tokens, "margo", "admin"))
        .set_json(sample_create_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: ApiResponse<PostResponse> = test::read_body_json(resp).await;
    assert!(body.success);
    let post = body.data.unwrap();
    assert!(!post.id.is_empty());
    assert_eq!(post.html_s3_key, format!("posts/{}.html", post.id));
    assert_eq!(post.md_s3_key, format!("posts/{}.md", post.id));
    assert_eq!(post.created_at, post.modified_at);
    assert!(post.html_post_url.is_none());
}

#[actix_web::test]
async fn get_unknown_post_returns_problem_body() {
    let (tokens, passwords) = auth_services();
    let state = blank_state();
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/nope")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, 404);
    assert_eq!(body.detail.as_deref(), Some("no post found with id nope"));
}

#[actix_web::test]
async fn get_decorates_post_with_signed_urls() {
    let (tokens, passwords) = auth_services();
    let state = blank_state();
    let created = state
        .posts
        .create(CreatePostInput {
            title: "Signed".to_string(),
            tags: vec![],
            content: "body".to_string(),
        })
        .await
        .unwrap();
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ApiResponse<PostResponse> = test::read_body_json(resp).await;
    let post = body.data.unwrap();
    assert!(post.html_post_url.is_some());
    assert!(post.md_post_url.is_some());
}

#[actix_web::test]
async fn update_rejects_clearing_tags() {
    let (tokens, passwords) = auth_services();
    let state = blank_state();
    let created = state
        .posts
        .create(CreatePostInput {
            title: "Tagged".to_string(),
            tags: vec!["rust".to_string()],
            content: "body".to_string(),
        })
        .await
        .unwrap();
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/posts/{}", created.id))
        .insert_header(bearer(&tokens, "margo", "admin"))
        .set_json(serde_json::json!({"tags": []}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.detail.as_deref(), Some("at least one tag is required"));
}

#[actix_web::test]
async fn update_applies_sparse_changes() {
    let (tokens, passwords) = auth_services();
    let state = blank_state();
    let created = state
        .posts
        .create(CreatePostInput {
            title: "Old title".to_string(),
            tags: vec!["rust".to_string()],
            content: "body".to_string(),
        })
        .await
        .unwrap();
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/posts/{}", created.id))
        .insert_header(bearer(&tokens, "margo", "admin"))
        .set_json(serde_json::json!({"title": "New title"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ApiResponse<PostResponse> = test::read_body_json(resp).await;
    let post = body.data.unwrap();
    assert_eq!(post.title, "New title");
    assert_eq!(post.tags, vec!["rust".to_string()]);
}

#[actix_web::test]
async fn delete_then_refetch_returns_not_found() {
    let (tokens, passwords) = auth_services();
    let state = blank_state();
    let created = state
        .posts
        .create(CreatePostInput {
            title: "Doomed".to_string(),
            tags: vec![],
            content: "body".to_string(),
        })
        .await
        .unwrap();
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{}", created.id))
        .insert_header(bearer(&tokens, "margo", "admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{}", created.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_returns_bounded_page_with_cursor() {
    let (tokens, passwords) = auth_services();
    let state = blank_state();
    for i in 0..3 {
        state
            .posts
            .create(CreatePostInput {
                title: format!("Post {}", i),
                tags: vec![],
                content: "body".to_string(),
            })
            .await
            .unwrap();
    }
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts?page_size=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: ApiResponse<ListPostsResponse> = test::read_body_json(resp).await;
    let page = body.data.unwrap();
    assert_eq!(page.posts.len(), 2);
    assert!(!page.metadata.next_cursor.is_empty());
}

#[actix_web::test]
async fn list_rejects_malformed_cursor() {
    let (tokens, passwords) = auth_services();
    let state = blank_state();
    let app = spawn_app!(state, tokens, passwords);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts?cursor=***")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
