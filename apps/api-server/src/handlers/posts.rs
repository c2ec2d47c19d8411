//! Post content handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use quill_core::domain::Post;
use quill_core::service::{CreatePostInput, ListPostsInput, UpdatePostInput};
use quill_shared::ApiResponse;
use quill_shared::dto::{
    CreatePostRequest, ListPostsResponse, PageMetadata, PostResponse, UpdatePostRequest,
};

use crate::middleware::auth::{ADMIN_ROLE, Identity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters accepted by the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub page_size: Option<i32>,
    pub cursor: Option<String>,
}

/// POST /api/v1/posts - admin only
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;

    let req = body.into_inner();
    let post = state
        .posts
        .create(CreatePostInput {
            title: req.title,
            tags: req.tags,
            content: req.content,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(to_response(post))))
}

/// GET /api/v1/posts/{post_id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let post = state.posts.get(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_response(post))))
}

/// GET /api/v1/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let page = state
        .posts
        .list(ListPostsInput {
            page_size: query.page_size,
            cursor: query.cursor,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ListPostsResponse {
        posts: page.posts.into_iter().map(to_response).collect(),
        metadata: PageMetadata {
            next_cursor: page.next_cursor,
        },
    })))
}

/// PATCH /api/v1/posts/{post_id} - admin only
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;

    let req = body.into_inner();
    let post = state
        .posts
        .update(UpdatePostInput {
            id: path.into_inner(),
            title: req.title,
            tags: req.tags,
            content: req.content,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_response(post))))
}

/// DELETE /api/v1/posts/{post_id} - admin only
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    require_admin(&identity)?;

    state.posts.delete(&path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

fn require_admin(identity: &Identity) -> Result<(), AppError> {
    if identity.has_role(ADMIN_ROLE) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        tags: post.tags,
        html_s3_key: post.html_key,
        md_s3_key: post.md_key,
        created_at: post.created_at,
        modified_at: post.modified_at,
        html_post_url: post.html_url,
        md_post_url: post.md_url,
    }
}
