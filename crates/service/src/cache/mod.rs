//! Key/value cache used next to the database.
//!
//! `RedisCache` is the production backend; `MemoryCache` keeps the same
//! semantics in process for tests and deployments without Redis.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

pub mod memory;
pub mod redis;

pub use self::memory::MemoryCache;
pub use self::redis::RedisCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("key not found: {0}")]
    NotFound(String),
    #[error("value of {0} is not an integer")]
    NotInteger(String),
    #[error("cache closed")]
    Closed,
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
}

#[async_trait]
pub trait Cache: Send + Sync {
    /// `ttl` 为 0 时不过期
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
    async fn get(&self, key: &str) -> Result<String, CacheError>;
    /// `None` 表示 key 存在但没有过期时间
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError>;
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, CacheError>;
    /// `at` 为 unix 秒
    async fn expire_at(&self, key: &str, at: i64) -> Result<bool, CacheError>;
    async fn del(&self, key: &str) -> Result<bool, CacheError>;
    /// true when at least one key exists; an empty key list counts as existing.
    async fn exists(&self, keys: &[&str]) -> Result<bool, CacheError>;
    async fn incr(&self, key: &str) -> Result<i64, CacheError>;
    async fn close(&self) -> Result<(), CacheError>;
}

pub(crate) fn trace_op(handle: &str, op: &str, key: &str, ttl: Option<Duration>, started: Instant) {
    debug!(
        handle,
        op,
        key,
        ttl_secs = ttl.map(|t| t.as_secs()),
        cost_ms = started.elapsed().as_secs_f64() * 1000.0,
        "cache"
    );
}
