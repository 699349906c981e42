use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::info;

use super::{trace_op, Cache, CacheError};

const HANDLE: &str = "redis";

/// Redis backed cache; the connection manager reconnects on its own and is
/// cloned per call.
pub struct RedisCache {
    conn: ConnectionManager,
    closed: AtomicBool,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let mut conn = ConnectionManager::new(client).await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!("redis connected");
        Ok(Self { conn, closed: AtomicBool::new(false) })
    }

    fn conn(&self) -> Result<ConnectionManager, CacheError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::Closed);
        }
        Ok(self.conn.clone())
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let started = Instant::now();
        let mut conn = self.conn()?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if !ttl.is_zero() {
            cmd.arg("EX").arg(ttl.as_secs().max(1));
        }
        let _: () = cmd.query_async(&mut conn).await?;
        trace_op(HANDLE, "set", key, Some(ttl), started);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        let started = Instant::now();
        let mut conn = self.conn()?;
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        trace_op(HANDLE, "get", key, None, started);
        value.ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError> {
        let started = Instant::now();
        let mut conn = self.conn()?;
        let secs: i64 = redis::cmd("TTL").arg(key).query_async(&mut conn).await?;
        trace_op(HANDLE, "ttl", key, None, started);
        match secs {
            -2 => Err(CacheError::NotFound(key.to_string())),
            s if s < 0 => Ok(None),
            s => Ok(Some(Duration::from_secs(s as u64))),
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, CacheError> {
        let started = Instant::now();
        let mut conn = self.conn()?;
        let ok: bool = redis::cmd("EXPIRE").arg(key).arg(ttl.as_secs()).query_async(&mut conn).await?;
        trace_op(HANDLE, "expire", key, Some(ttl), started);
        Ok(ok)
    }

    async fn expire_at(&self, key: &str, at: i64) -> Result<bool, CacheError> {
        let started = Instant::now();
        let mut conn = self.conn()?;
        let ok: bool = redis::cmd("EXPIREAT").arg(key).arg(at).query_async(&mut conn).await?;
        trace_op(HANDLE, "expire_at", key, None, started);
        Ok(ok)
    }

    async fn del(&self, key: &str) -> Result<bool, CacheError> {
        let started = Instant::now();
        let mut conn = self.conn()?;
        let n: i64 = redis::cmd("DEL").arg(key).query_async(&mut conn).await?;
        trace_op(HANDLE, "del", key, None, started);
        Ok(n > 0)
    }

    async fn exists(&self, keys: &[&str]) -> Result<bool, CacheError> {
        if keys.is_empty() {
            return Ok(true);
        }
        let started = Instant::now();
        let mut conn = self.conn()?;
        let n: i64 = redis::cmd("EXISTS").arg(keys).query_async(&mut conn).await?;
        trace_op(HANDLE, "exists", &keys.join(","), None, started);
        Ok(n > 0)
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        let started = Instant::now();
        let mut conn = self.conn()?;
        let v: i64 = redis::cmd("INCR").arg(key).query_async(&mut conn).await?;
        trace_op(HANDLE, "incr", key, None, started);
        Ok(v)
    }

    async fn close(&self) -> Result<(), CacheError> {
        self.closed.store(true, Ordering::Release);
        info!("redis cache closed");
        Ok(())
    }
}
