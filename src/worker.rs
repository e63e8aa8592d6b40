use std::sync::Arc;
use tokio::time::{Duration, interval};
use crate::metrics::RATE_LIMIT_ENTRIES;
use crate::rate_limit::RateLimiter;

// Periodic sweep of expired rate limit windows. Admission stays correct
// without it (expired entries reset on next touch); this only frees memory.
pub async fn rate_limit_sweeper(rate_limiter: Arc<RateLimiter>, every: Duration) {
    let mut interval = interval(every);

    tracing::info!(interval = ?every, "rate limit sweeper started");

    loop {
        interval.tick().await;

        let removed = rate_limiter.cleanup();
        let remaining = rate_limiter.len();
        RATE_LIMIT_ENTRIES.set(remaining as f64);

        if removed > 0 {
            tracing::debug!(removed, remaining, "swept expired rate limit windows");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::rate_limit::RateLimitConfig;

    #[tokio::test]
    async fn test_sweeper_removes_expired_windows() {
        let clock = Arc::new(ManualClock::at_date(2024, 6, 1));
        let limiter = Arc::new(RateLimiter::with_clock(
            RateLimitConfig::default(),
            clock.clone(),
        ));
        limiter.is_allowed("a");
        limiter.is_allowed("b");
        assert_eq!(limiter.len(), 2);

        clock.advance(Duration::from_secs(61));
        let task = tokio::spawn(rate_limit_sweeper(limiter.clone(), Duration::from_secs(300)));

        // first tick fires immediately
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(limiter.len(), 0);

        task.abort();
    }
}
