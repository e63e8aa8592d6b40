use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use crate::clock::{Clock, SystemClock};

// Rate limit entry - tracks requests per client in the current window
#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    count: u32,
    reset_at_ms: i64, // window ends here (epoch millis)
}

impl RateLimitEntry {
    fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.reset_at_ms
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    // A window always admits its opening request, so a quota below one
    // is treated as one.
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests: max_requests.max(1),
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }
}

/// Fixed-window admission control keyed by client identifier.
///
/// A burst of up to `2 * max_requests` is possible across a window edge;
/// that is the nature of a fixed window.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    // Check and count one request. The shard guard from entry() is held
    // for the whole read-check-write, so same-key calls serialize.
    pub fn is_allowed(&self, id: &str) -> bool {
        let now = self.clock.now_ms();
        let fresh = RateLimitEntry {
            count: 1,
            reset_at_ms: now.saturating_add(self.config.window_ms()),
        };

        let mut created = false;
        let mut entry = self.entries.entry(id.to_string()).or_insert_with(|| {
            created = true;
            fresh
        });

        // first request from this client opens the window
        if created {
            return true;
        }

        // window expired..? start a new one
        if entry.is_expired(now) {
            *entry = fresh;
            return true;
        }

        // under limit..? allow
        if entry.count < self.config.max_requests {
            entry.count += 1;
            return true;
        }

        // over limit
        false
    }

    // Time left in the client's current window, zero if none
    pub fn remaining_time(&self, id: &str) -> Duration {
        let now = self.clock.now_ms();
        match self.entries.get(id) {
            Some(entry) => Duration::from_millis(entry.reset_at_ms.saturating_sub(now).max(0) as u64),
            None => Duration::ZERO,
        }
    }

    // Drop expired windows. retain() holds each shard's write lock, so an
    // entry refreshed by is_allowed is never removed from under it.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Seconds to advertise in `Retry-After`, rounded up.
pub fn retry_after_secs(remaining: Duration) -> u64 {
    remaining.as_millis().div_ceil(1000) as u64
}
