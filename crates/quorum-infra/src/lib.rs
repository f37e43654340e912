//! # Quorum Infrastructure
//!
//! Concrete implementations of the ports defined in `quorum-core`.
//! This crate contains the post stores and rate limiter backends.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL post store via SeaORM
//! - `redis` - Redis-backed rate limiter

pub mod database;
pub mod rate_limit;
pub mod store;

// Re-exports - In-Memory
pub use database::DatabaseConfig;
pub use rate_limit::FixedWindowRateLimiter;
pub use store::InMemoryPostStore;

#[cfg(feature = "postgres")]
pub use database::PostgresPostStore;

#[cfg(feature = "redis")]
pub use rate_limit::{RedisConfig, RedisRateLimitConfig, RedisRateLimiter};
