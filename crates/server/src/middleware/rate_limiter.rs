use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use common::response::ApiError;
use tracing::warn;

/// 令牌余量与上次结算时间
#[derive(Debug)]
struct Allowance {
    left: f64,
    checked_at: Instant,
}

/// 全局令牌桶，所有请求共享。令牌按经过的时间连续回填，上限为 `burst`
#[derive(Clone)]
pub struct RateLimiter {
    allowance: Arc<Mutex<Allowance>>,
    per_second: f64,
    burst: f64,
}

impl RateLimiter {
    pub fn new(per_second: u64, burst: u64) -> Self {
        let burst = burst as f64;
        Self {
            allowance: Arc::new(Mutex::new(Allowance { left: burst, checked_at: Instant::now() })),
            per_second: per_second as f64,
            burst,
        }
    }

    /// Take one token, `false` when the bucket is empty
    pub fn allow(&self) -> bool {
        self.allow_at(Instant::now())
    }

    fn allow_at(&self, now: Instant) -> bool {
        // 临界区内没有会 panic 的操作，中毒时沿用原值
        let mut a = self.allowance.lock().unwrap_or_else(PoisonError::into_inner);
        let elapsed = now.saturating_duration_since(a.checked_at).as_secs_f64();
        a.left = (a.left + elapsed * self.per_second).min(self.burst);
        a.checked_at = a.checked_at.max(now);
        if a.left < 1.0 {
            return false;
        }
        a.left -= 1.0;
        true
    }
}

/// Middleware: reject with 429 / `TooManyRequests` once the bucket is empty
pub async fn limit(State(limiter): State<RateLimiter>, req: Request, next: Next) -> Result<Response, ApiError> {
    if !limiter.allow() {
        warn!(method = %req.method(), path = %req.uri().path(), "rate limit exceeded");
        return Err(ApiError::too_many_requests());
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn burst_then_empty() {
        let limiter = RateLimiter::new(1, 3);
        let now = Instant::now();
        for _ in 0..3 {
            assert!(limiter.allow_at(now));
        }
        assert!(!limiter.allow_at(now));
    }

    #[test]
    fn refills_with_elapsed_time() {
        let limiter = RateLimiter::new(4, 4);
        let start = Instant::now();
        for _ in 0..4 {
            assert!(limiter.allow_at(start));
        }
        // 0.5s * 4/s = 2 个令牌
        let later = start + Duration::from_millis(500);
        assert!(limiter.allow_at(later));
        assert!(limiter.allow_at(later));
        assert!(!limiter.allow_at(later));
    }

    #[test]
    fn idle_refill_is_capped_at_burst() {
        let limiter = RateLimiter::new(100, 2);
        let later = Instant::now() + Duration::from_secs(60);
        assert!(limiter.allow_at(later));
        assert!(limiter.allow_at(later));
        assert!(!limiter.allow_at(later));
    }

    #[test]
    fn clones_share_one_bucket() {
        let limiter = RateLimiter::new(1, 1);
        let other = limiter.clone();
        let now = Instant::now();
        assert!(limiter.allow_at(now));
        assert!(!other.allow_at(now));
    }
}
