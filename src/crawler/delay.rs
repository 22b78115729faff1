//! Rate limiting between network fetches

use std::time::Duration;

/// Pause taken by the page cache after every network fetch
///
/// `elapsed` is the time since the previous network fetch was issued, or
/// since the current one for the first fetch of a cache. Cache hits never
/// reach the delay and do not count as fetches.
#[allow(async_fn_in_trait)]
pub trait Delay {
    async fn pause(&self, elapsed: Duration);
}

/// Sleeps a fixed interval after each fetch
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    interval: Duration,
}

impl FixedDelay {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Delay for FixedDelay {
    async fn pause(&self, elapsed: Duration) {
        if self.interval.is_zero() {
            return;
        }
        tracing::trace!("{:?} since last fetch, pausing {:?}", elapsed, self.interval);
        tokio::time::sleep(self.interval).await;
    }
}

/// Returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    async fn pause(&self, _elapsed: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_fixed_delay_sleeps_full_interval() {
        let delay = FixedDelay::new(Duration::from_millis(50));
        let start = Instant::now();
        delay.pause(Duration::from_millis(40)).await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_zero_interval_returns_immediately() {
        let delay = FixedDelay::new(Duration::ZERO);
        let start = Instant::now();
        delay.pause(Duration::from_secs(1)).await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_no_delay() {
        let start = Instant::now();
        NoDelay.pause(Duration::ZERO).await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
