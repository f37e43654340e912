//! Rate limiting implementations.

mod memory;

pub use memory::FixedWindowRateLimiter;

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisRateLimitConfig, RedisRateLimiter};
