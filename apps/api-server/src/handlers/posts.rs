//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quorum_core::DomainError;
use quorum_core::domain::Post;
use quorum_shared::ApiResponse;
use quorum_shared::dto::{CreatePostRequest, PostScoreResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    if req.title.trim().is_empty() {
        return Err(DomainError::Validation("Title must not be empty".to_string()).into());
    }
    if req.body.trim().is_empty() {
        return Err(DomainError::Validation("Body must not be empty".to_string()).into());
    }

    let post = Post::new(req.author_id, req.title, req.body);
    let saved = state.posts.insert(post).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(PostScoreResponse::from(saved))))
}

/// GET /api/posts/{id}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state.posts.find_by_id(id).await?.ok_or(DomainError::NotFound {
        entity_type: "post",
        id,
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostScoreResponse::from(post))))
}
