//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::Actor;

/// Per-action request budget for one window.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Quota {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

impl Default for Quota {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// Rate limiter trait - abstraction over limiter backends.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check whether `actor` may perform `action` under `quota`, counting
    /// this call against the current window. Anonymous actors are always
    /// allowed and never tracked. An exhausted window surfaces as
    /// [`RateLimitError::Exceeded`]; state is not mutated further on that
    /// path.
    async fn check(
        &self,
        actor: &Actor,
        action: &str,
        quota: Quota,
    ) -> Result<RateLimitOutcome, RateLimitError>;

    /// Forget `actor`'s window for `action`, if any.
    async fn reset(&self, actor: &Actor, action: &str) -> Result<(), RateLimitError>;
}

/// Result of an allowed rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitOutcome {
    pub remaining: u32,
    pub reset_after: Duration,
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Rate limit exceeded for {action}. Try again in {retry_after_secs} seconds.")]
    Exceeded {
        action: String,
        retry_after_secs: u64,
    },

    #[error("Backend error: {0}")]
    Backend(String),
}
