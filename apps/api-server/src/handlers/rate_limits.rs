//! Operational rate-limit management.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quorum_core::domain::Actor;
use quorum_shared::ApiResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// DELETE /api/rate-limits/{user_id}/{action}
///
/// Drops the actor's current window so the next check starts fresh.
pub async fn reset_window(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> AppResult<HttpResponse> {
    let (user_id, action) = path.into_inner();

    state.limiter.reset(&Actor::User(user_id), &action).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), "rate limit window reset")))
}
