//! Politeness gate for outbound requests.
//!
//! One [`RateLimiter`] is owned by the run and lent to the fetcher for every
//! request. It remembers when the previous request *started* and sleeps
//! until the configured delay has elapsed since then. A run issues requests
//! from a single stream, so the limiter needs no locking; a concurrent
//! fetch mode would have to put it behind a mutex.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

/// Time source, injectable so tests never sleep for real.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Enforces a minimum interval between request starts.
pub struct RateLimiter {
    delay: Duration,
    last_start: Option<Instant>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self::with_clock(delay, Arc::new(SystemClock))
    }

    pub fn with_clock(delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            delay,
            last_start: None,
            clock,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until a request may start, then record its start time.
    pub async fn acquire(&mut self) -> Instant {
        if let Some(last) = self.last_start {
            let elapsed = self.clock.now().saturating_duration_since(last);
            if elapsed < self.delay {
                let wait = self.delay - elapsed;
                log::debug!("Throttling request for {} ms", wait.as_millis());
                self.clock.sleep(wait).await;
            }
        }
        let start = self.clock.now();
        self.last_start = Some(start);
        start
    }

    /// Sleep on the limiter's clock, e.g. for a retry backoff.
    pub async fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            self.clock.sleep(duration).await;
        }
    }

    /// Backoff before retry number `attempt` (0-based).
    ///
    /// Starts at twice the politeness delay (at least one second) and
    /// doubles per attempt, capped at `max`.
    pub fn backoff(&self, attempt: u32, max: Duration) -> Duration {
        let base = self.delay.max(Duration::from_secs(1));
        let factor = 2u32.saturating_pow(attempt.saturating_add(1));
        base.saturating_mul(factor).min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeClock;

    #[tokio::test]
    async fn first_request_does_not_wait() {
        let clock = Arc::new(FakeClock::new());
        let mut limiter = RateLimiter::with_clock(Duration::from_secs(3), clock.clone());
        limiter.acquire().await;
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn consecutive_starts_are_spaced_by_delay() {
        let clock = Arc::new(FakeClock::new());
        let delay = Duration::from_millis(3000);
        let mut limiter = RateLimiter::with_clock(delay, clock.clone());

        let mut starts = Vec::new();
        for i in 0..10 {
            starts.push(limiter.acquire().await);
            // Simulate requests of varying length.
            clock.advance(Duration::from_millis(400 * (i % 4)));
        }

        for pair in starts.windows(2) {
            assert!(pair[1].duration_since(pair[0]) >= delay);
        }
    }

    #[tokio::test]
    async fn slow_request_consumes_the_delay() {
        let clock = Arc::new(FakeClock::new());
        let mut limiter = RateLimiter::with_clock(Duration::from_secs(2), clock.clone());
        limiter.acquire().await;
        clock.advance(Duration::from_secs(5));
        limiter.acquire().await;
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn backoff_starts_above_delay_and_is_capped() {
        let limiter = RateLimiter::new(Duration::from_secs(3));
        let cap = Duration::from_secs(20);
        assert_eq!(limiter.backoff(0, cap), Duration::from_secs(6));
        assert_eq!(limiter.backoff(1, cap), Duration::from_secs(12));
        assert_eq!(limiter.backoff(2, cap), cap);
        assert_eq!(limiter.backoff(40, cap), cap);
    }
}
