//! In-memory fixed-window rate limiter.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use quorum_core::domain::Actor;
use quorum_core::ports::{Quota, RateLimitError, RateLimitOutcome, RateLimiter};

/// One actor/action window.
#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window counter keyed by `"{user}:{action}"`.
///
/// Windows reset at a fixed boundary per key, so a burst straddling the
/// boundary can briefly exceed the nominal rate - accepted for this use
/// case. Limits are per-process, not distributed across instances.
///
/// The map grows with one entry per active key; expired entries are
/// reclaimed by [`sweep_expired`](Self::sweep_expired), which the hosting
/// application schedules periodically.
pub struct FixedWindowRateLimiter {
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl FixedWindowRateLimiter {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every expired window. Returns the number of entries removed.
    pub async fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.reset_at > now);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(
                removed,
                tracked = entries.len(),
                "swept expired rate limit windows"
            );
        }
        removed
    }

    /// Number of windows currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.entries.lock().await.len()
    }

    fn key(user_id: &Uuid, action: &str) -> String {
        format!("{user_id}:{action}")
    }
}

impl Default for FixedWindowRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimiter for FixedWindowRateLimiter {
    async fn check(
        &self,
        actor: &Actor,
        action: &str,
        quota: Quota,
    ) -> Result<RateLimitOutcome, RateLimitError> {
        let Some(user_id) = actor.user_id() else {
            // Unauthenticated callers pass through untracked.
            tracing::debug!(action, "anonymous actor bypasses rate limit");
            return Ok(RateLimitOutcome {
                remaining: quota.max_requests,
                reset_after: quota.window,
            });
        };

        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        match entries.entry(Self::key(&user_id, action)) {
            Entry::Vacant(slot) => {
                slot.insert(WindowEntry {
                    count: 1,
                    reset_at: now + quota.window,
                });
                Ok(RateLimitOutcome {
                    remaining: quota.max_requests.saturating_sub(1),
                    reset_after: quota.window,
                })
            }
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                if now >= entry.reset_at {
                    // Window lapsed: start a fresh one.
                    *entry = WindowEntry {
                        count: 1,
                        reset_at: now + quota.window,
                    };
                    Ok(RateLimitOutcome {
                        remaining: quota.max_requests.saturating_sub(1),
                        reset_after: quota.window,
                    })
                } else if entry.count < quota.max_requests {
                    entry.count += 1;
                    Ok(RateLimitOutcome {
                        remaining: quota.max_requests - entry.count,
                        reset_after: entry.reset_at - now,
                    })
                } else {
                    let retry_after_secs =
                        (entry.reset_at - now).as_millis().div_ceil(1000) as u64;
                    tracing::warn!(%user_id, action, retry_after_secs, "rate limit exceeded");
                    Err(RateLimitError::Exceeded {
                        action: action.to_string(),
                        retry_after_secs,
                    })
                }
            }
        }
    }

    async fn reset(&self, actor: &Actor, action: &str) -> Result<(), RateLimitError> {
        if let Some(user_id) = actor.user_id() {
            let removed = self
                .entries
                .lock()
                .await
                .remove(&Self::key(&user_id, action));
            if removed.is_some() {
                tracing::debug!(%user_id, action, "rate limit window reset");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn quota(max_requests: u32, secs: u64) -> Quota {
        Quota::new(max_requests, Duration::from_secs(secs))
    }

    #[tokio::test]
    async fn allows_up_to_limit() {
        let limiter = FixedWindowRateLimiter::new();
        let actor = Actor::User(Uuid::new_v4());

        for _ in 0..5 {
            limiter
                .check(&actor, "send_message", quota(5, 60))
                .await
                .unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_over_limit_naming_action_and_wait() {
        let limiter = FixedWindowRateLimiter::new();
        let actor = Actor::User(Uuid::new_v4());
        for _ in 0..5 {
            limiter
                .check(&actor, "sendMessage", quota(5, 60))
                .await
                .unwrap();
        }

        let err = limiter
            .check(&actor, "sendMessage", quota(5, 60))
            .await
            .unwrap_err();

        match &err {
            RateLimitError::Exceeded {
                action,
                retry_after_secs,
            } => {
                assert_eq!(action, "sendMessage");
                assert!(*retry_after_secs > 0 && *retry_after_secs <= 60);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("Rate limit exceeded for sendMessage"));
        assert!(message.contains("60 seconds"));
    }

    #[tokio::test(start_paused = true)]
    async fn window_expiry_restarts_count() {
        let limiter = FixedWindowRateLimiter::new();
        let actor = Actor::User(Uuid::new_v4());
        let q = quota(2, 60);

        limiter.check(&actor, "vote", q).await.unwrap();
        limiter.check(&actor, "vote", q).await.unwrap();
        assert!(limiter.check(&actor, "vote", q).await.is_err());

        tokio::time::advance(Duration::from_secs(60)).await;

        let outcome = limiter.check(&actor, "vote", q).await.unwrap();
        assert_eq!(outcome.remaining, 1);
    }

    #[tokio::test]
    async fn explicit_reset_reopens_window() {
        let limiter = FixedWindowRateLimiter::new();
        let actor = Actor::User(Uuid::new_v4());
        let q = quota(1, 60);

        limiter.check(&actor, "vote", q).await.unwrap();
        assert!(limiter.check(&actor, "vote", q).await.is_err());

        limiter.reset(&actor, "vote").await.unwrap();

        assert!(limiter.check(&actor, "vote", q).await.is_ok());
    }

    #[tokio::test]
    async fn reset_of_absent_window_is_noop() {
        let limiter = FixedWindowRateLimiter::new();
        let actor = Actor::User(Uuid::new_v4());

        limiter.reset(&actor, "vote").await.unwrap();

        assert_eq!(limiter.tracked_keys().await, 0);
    }

    #[tokio::test]
    async fn anonymous_actor_bypasses_and_records_nothing() {
        let limiter = FixedWindowRateLimiter::new();

        for _ in 0..20 {
            limiter
                .check(&Actor::Anonymous, "vote", quota(1, 60))
                .await
                .unwrap();
        }

        assert_eq!(limiter.tracked_keys().await, 0);
    }

    #[tokio::test]
    async fn actions_are_limited_independently() {
        let limiter = FixedWindowRateLimiter::new();
        let actor = Actor::User(Uuid::new_v4());
        let q = quota(1, 60);

        limiter.check(&actor, "vote", q).await.unwrap();
        limiter.check(&actor, "comment", q).await.unwrap();

        assert!(limiter.check(&actor, "vote", q).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_removes_only_expired_windows() {
        let limiter = FixedWindowRateLimiter::new();
        let expired = Actor::User(Uuid::new_v4());
        let live = Actor::User(Uuid::new_v4());

        limiter.check(&expired, "vote", quota(5, 30)).await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;
        limiter.check(&live, "vote", quota(5, 300)).await.unwrap();

        let removed = limiter.sweep_expired().await;

        assert_eq!(removed, 1);
        assert_eq!(limiter.tracked_keys().await, 1);
        // The surviving window kept its count.
        let outcome = limiter.check(&live, "vote", quota(5, 300)).await.unwrap();
        assert_eq!(outcome.remaining, 3);
    }
}
