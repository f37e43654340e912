//! Redis-backed fixed-window rate limiter.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Script};

use quorum_core::domain::Actor;
use quorum_core::ports::{Quota, RateLimitError, RateLimitOutcome, RateLimiter};

/// Redis connection settings.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub connect_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisConfig {
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }
}

/// Redis rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RedisRateLimitConfig {
    /// Redis connection config
    pub redis: RedisConfig,
    /// Key prefix for rate limit keys
    pub key_prefix: String,
}

impl Default for RedisRateLimitConfig {
    fn default() -> Self {
        Self {
            redis: RedisConfig::default(),
            key_prefix: "ratelimit".to_string(),
        }
    }
}

impl RedisRateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            redis: RedisConfig::from_env(),
            key_prefix: std::env::var("RATE_LIMIT_KEY_PREFIX")
                .unwrap_or_else(|_| "ratelimit".to_string()),
        }
    }
}

/// Fixed-window limiter sharing its counters through Redis.
///
/// Key TTLs stand in for the in-memory sweep: windows disappear on their
/// own when they lapse, so no periodic cleanup job is needed.
pub struct RedisRateLimiter {
    conn: ConnectionManager,
    config: RedisRateLimitConfig,
    /// Lua script counting the call without incrementing past the limit.
    script: Script,
}

impl RedisRateLimiter {
    pub async fn new(config: RedisRateLimitConfig) -> Result<Self, RateLimitError> {
        let client = Client::open(config.redis.url.as_str())
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn_manager_fut = ConnectionManager::new(client);
        let conn = tokio::time::timeout(config.redis.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| RateLimitError::Backend("Connection timed out".to_string()))?
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        // Returns: [current_count, ttl_remaining, allowed]
        let script = Script::new(
            r#"
            local key = KEYS[1]
            local max_requests = tonumber(ARGV[1])
            local window_secs = tonumber(ARGV[2])

            local current = tonumber(redis.call('GET', key) or '0')
            if current >= max_requests then
                return {current, redis.call('TTL', key), 0}
            end

            current = redis.call('INCR', key)
            if current == 1 then
                redis.call('EXPIRE', key, window_secs)
            end
            return {current, redis.call('TTL', key), 1}
            "#,
        );

        tracing::info!(url = %config.redis.url, "Connected to Redis rate limiter");

        Ok(Self {
            conn,
            config,
            script,
        })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, RateLimitError> {
        Self::new(RedisRateLimitConfig::from_env()).await
    }

    fn make_key(&self, user_id: &uuid::Uuid, action: &str) -> String {
        format!("{}:{}:{}", self.config.key_prefix, user_id, action)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(
        &self,
        actor: &Actor,
        action: &str,
        quota: Quota,
    ) -> Result<RateLimitOutcome, RateLimitError> {
        let Some(user_id) = actor.user_id() else {
            tracing::debug!(action, "anonymous actor bypasses rate limit");
            return Ok(RateLimitOutcome {
                remaining: quota.max_requests,
                reset_after: quota.window,
            });
        };

        let key = self.make_key(&user_id, action);
        let mut conn = self.conn.clone();

        let result: Vec<i64> = self
            .script
            .key(&key)
            .arg(quota.max_requests)
            .arg(quota.window.as_secs())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        let count = result.first().copied().unwrap_or(1).max(0) as u32;
        let ttl_secs = result
            .get(1)
            .copied()
            .unwrap_or(quota.window.as_secs() as i64)
            .max(1) as u64;
        let allowed = result.get(2).copied().unwrap_or(1) == 1;

        if !allowed {
            tracing::warn!(%user_id, action, retry_after_secs = ttl_secs, "rate limit exceeded");
            return Err(RateLimitError::Exceeded {
                action: action.to_string(),
                retry_after_secs: ttl_secs,
            });
        }

        Ok(RateLimitOutcome {
            remaining: quota.max_requests.saturating_sub(count),
            reset_after: Duration::from_secs(ttl_secs),
        })
    }

    async fn reset(&self, actor: &Actor, action: &str) -> Result<(), RateLimitError> {
        let Some(user_id) = actor.user_id() else {
            return Ok(());
        };

        let key = self.make_key(&user_id, action);
        let mut conn = self.conn.clone();

        let _: i64 = redis::cmd("DEL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        Ok(())
    }
}
