//! Vote handlers - the rate-limited entry point into the score engine.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use quorum_core::domain::{Actor, VoteEvent};
use quorum_core::ports::RateLimitError;
use quorum_shared::ApiResponse;
use quorum_shared::dto::VoteRequest;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Name under which voting is rate limited.
pub const VOTE_ACTION: &str = "vote";

/// Resolve the acting identity from the `X-User-Id` header. Absent or
/// malformed ids degrade to `Anonymous`, which is never rate limited.
fn actor_from_request(req: &HttpRequest) -> Actor {
    let user_id = req
        .headers()
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok());
    Actor::from_user(user_id)
}

/// POST /api/posts/{id}/votes
pub async fn cast_vote(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<VoteRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let vote = body.into_inner();
    let actor = actor_from_request(&req);

    // Check before act. An exhausted window surfaces as 429; backend
    // failures fail open so voting never depends on limiter health.
    match state
        .limiter
        .check(&actor, VOTE_ACTION, state.vote_quota)
        .await
    {
        Ok(_) => {}
        Err(exceeded @ RateLimitError::Exceeded { .. }) => return Err(exceeded.into()),
        Err(RateLimitError::Backend(e)) => {
            tracing::error!(error = %e, "rate limiter backend error, failing open");
        }
    }

    let event = VoteEvent {
        post_id,
        user_id: vote.user_id,
        kind: vote.kind,
    };
    // Best-effort scoring: the vote succeeds from the caller's point of
    // view even when scoring fails.
    state.engine.apply_vote(&event).await;

    Ok(HttpResponse::Accepted().json(ApiResponse::ok_with_message((), "vote recorded")))
}
