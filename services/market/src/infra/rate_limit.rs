use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis;

use crate::domain::repository::RateLimiter;
use crate::domain::types::RateLimit;
use crate::error::MarketError;

/// Entries are swept once the table grows past this size.
const SWEEP_THRESHOLD: usize = 10_000;

struct Window {
    started: Instant,
    len: Duration,
    count: u32,
}

impl Window {
    fn elapsed_at(&self, now: Instant) -> bool {
        now.duration_since(self.started) >= self.len
    }
}

/// Fixed-window counter kept in process memory. Correct for a single
/// instance only; counts are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryRateLimiter {
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    fn hit_at(&self, key: &str, limit: RateLimit, now: Instant) -> bool {
        let window_len = Duration::from_secs(limit.window_secs);
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        // Keys of different limits share the table; each expires by its own window.
        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|_, w| !w.elapsed_at(now));
        }

        let window = windows.entry(key.to_owned()).or_insert(Window {
            started: now,
            len: window_len,
            count: 0,
        });
        if window.elapsed_at(now) {
            window.started = now;
            window.len = window_len;
            window.count = 0;
        }
        if window.count >= limit.max {
            return false;
        }
        window.count += 1;
        true
    }
}

impl RateLimiter for InMemoryRateLimiter {
    async fn hit(&self, key: &str, limit: RateLimit) -> Result<bool, MarketError> {
        Ok(self.hit_at(key, limit, Instant::now()))
    }
}

/// Fixed-window counter shared through Redis. `INCR` and `EXPIRE .. NX` go
/// out in one `MULTI` so a counter never outlives its window.
#[derive(Clone)]
pub struct RedisRateLimiter {
    pub pool: Pool,
}

fn redis_key(key: &str) -> String {
    format!("ratelimit:{key}")
}

fn hit_pipeline(key: &str, limit: RateLimit) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .cmd("INCR")
        .arg(key)
        .cmd("EXPIRE")
        .arg(key)
        .arg(limit.window_secs)
        .arg("NX")
        .ignore();
    pipe
}

impl RateLimiter for RedisRateLimiter {
    async fn hit(&self, key: &str, limit: RateLimit) -> Result<bool, MarketError> {
        let mut conn = self.pool.get().await.context("get redis connection")?;
        let (count,): (u64,) = hit_pipeline(&redis_key(key), limit)
            .query_async(&mut conn)
            .await
            .context("count rate limit hit")?;
        Ok(count <= u64::from(limit.max))
    }
}

/// Rate limiter backend selected at startup.
#[derive(Clone)]
pub enum RateLimiterBackend {
    InMemory(InMemoryRateLimiter),
    Redis(RedisRateLimiter),
}

impl RateLimiter for RateLimiterBackend {
    async fn hit(&self, key: &str, limit: RateLimit) -> Result<bool, MarketError> {
        match self {
            Self::InMemory(limiter) => limiter.hit(key, limit).await,
            Self::Redis(limiter) => limiter.hit(key, limit).await,
        }
    }
}
