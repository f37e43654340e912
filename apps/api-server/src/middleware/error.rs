//! Error handling - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quorum_shared::ErrorResponse;
use thiserror::Error;

use quorum_core::error::{DomainError, StoreError};
use quorum_core::ports::RateLimitError;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{detail}")]
    TooManyRequests { detail: String, retry_after_secs: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(detail) => {
                HttpResponse::NotFound().json(ErrorResponse::not_found(detail))
            }
            AppError::BadRequest(detail) => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(detail))
            }
            AppError::TooManyRequests {
                detail,
                retry_after_secs,
            } => HttpResponse::TooManyRequests()
                .insert_header(("X-RateLimit-Remaining", "0"))
                .insert_header(("Retry-After", retry_after_secs.to_string()))
                .json(ErrorResponse::too_many_requests(detail)),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                HttpResponse::InternalServerError().json(ErrorResponse::internal_error())
            }
        }
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Constraint(msg) => AppError::BadRequest(msg),
            StoreError::Connection(msg) | StoreError::Query(msg) => {
                tracing::error!("Store error: {}", msg);
                AppError::Internal("Store error".to_string())
            }
        }
    }
}

impl From<RateLimitError> for AppError {
    fn from(err: RateLimitError) -> Self {
        let detail = err.to_string();
        match err {
            RateLimitError::Exceeded {
                retry_after_secs, ..
            } => AppError::TooManyRequests {
                detail,
                retry_after_secs,
            },
            RateLimitError::Backend(msg) => {
                tracing::error!("Rate limiter backend error: {}", msg);
                AppError::Internal("Rate limiter error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
