use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::utils::time_parse::now_unix;
use dashmap::DashMap;

use super::{trace_op, Cache, CacheError};

const HANDLE: &str = "memory";

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process cache with per-key expiry. Expired keys are dropped lazily on access.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    closed: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self { Self::default() }

    fn check_open(&self) -> Result<(), CacheError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::Closed);
        }
        Ok(())
    }

    /// 读取前清理已过期的 key
    fn live(&self, key: &str) -> Option<Entry> {
        let now = Instant::now();
        self.entries.remove_if(key, |_, e| e.is_expired(now));
        self.entries.get(key).map(|e| e.clone())
    }

    fn set_deadline(&self, key: &str, deadline: Option<Instant>) -> bool {
        if self.live(key).is_none() {
            return false;
        }
        match self.entries.get_mut(key) {
            Some(mut e) => {
                e.expires_at = deadline;
                true
            }
            None => false,
        }
    }
}

fn deadline(ttl: Duration) -> Option<Instant> {
    if ttl.is_zero() { None } else { Instant::now().checked_add(ttl) }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.check_open()?;
        let started = Instant::now();
        self.entries.insert(key.to_string(), Entry { value: value.to_string(), expires_at: deadline(ttl) });
        trace_op(HANDLE, "set", key, Some(ttl), started);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        self.check_open()?;
        let started = Instant::now();
        let entry = self.live(key);
        trace_op(HANDLE, "get", key, None, started);
        entry.map(|e| e.value).ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, CacheError> {
        self.check_open()?;
        let entry = self.live(key).ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        Ok(entry.expires_at.map(|at| at.saturating_duration_since(Instant::now())))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, CacheError> {
        self.check_open()?;
        if ttl.is_zero() {
            return Ok(self.entries.remove(key).is_some());
        }
        Ok(self.set_deadline(key, deadline(ttl)))
    }

    async fn expire_at(&self, key: &str, at: i64) -> Result<bool, CacheError> {
        self.check_open()?;
        let remaining = at - now_unix();
        if remaining <= 0 {
            return Ok(self.entries.remove(key).is_some());
        }
        Ok(self.set_deadline(key, deadline(Duration::from_secs(remaining as u64))))
    }

    async fn del(&self, key: &str) -> Result<bool, CacheError> {
        self.check_open()?;
        let started = Instant::now();
        let removed = self.live(key).is_some() && self.entries.remove(key).is_some();
        trace_op(HANDLE, "del", key, None, started);
        Ok(removed)
    }

    async fn exists(&self, keys: &[&str]) -> Result<bool, CacheError> {
        self.check_open()?;
        if keys.is_empty() {
            return Ok(true);
        }
        Ok(keys.iter().any(|k| self.live(k).is_some()))
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        self.check_open()?;
        let started = Instant::now();
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry { value: "0".into(), expires_at: None });
        if entry.is_expired(now) {
            *entry = Entry { value: "0".into(), expires_at: None };
        }
        let next = entry
            .value
            .parse::<i64>()
            .ok()
            .and_then(|v| v.checked_add(1))
            .ok_or_else(|| CacheError::NotInteger(key.to_string()))?;
        entry.value = next.to_string();
        drop(entry);
        trace_op(HANDLE, "incr", key, None, started);
        Ok(next)
    }

    async fn close(&self) -> Result<(), CacheError> {
        self.closed.store(true, Ordering::Release);
        self.entries.clear();
        Ok(())
    }
}
