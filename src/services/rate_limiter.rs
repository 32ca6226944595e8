use governor::{Quota, RateLimiter, Jitter};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use std::num::NonZeroU32;
use std::sync::Arc;
use nonzero_ext::*;
use std::time::Duration;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Requests-per-minute cap shared by every call a provider makes.
#[derive(Clone, Default)]
pub struct ApiRateLimiter {
    limiter: Option<Arc<DirectLimiter>>,
}

impl ApiRateLimiter {
    pub fn new(requests_per_minute: Option<u32>) -> Self {
        let limiter = requests_per_minute
            .and_then(NonZeroU32::new)
            .map(|rpm| Arc::new(RateLimiter::direct(Quota::per_minute(rpm))));

        Self { limiter }
    }

    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100))).await;
        }
    }

    pub fn is_limited(&self) -> bool {
        self.limiter.is_some()
    }
}

/// Spaces request starts at least `delay` apart, one permit at a time.
#[derive(Clone)]
pub struct RequestPacer {
    delay: Duration,
    limiter: Option<Arc<DirectLimiter>>,
}

impl RequestPacer {
    pub fn new(delay: Duration) -> Self {
        let limiter = Quota::with_period(delay)
            .map(|quota| Arc::new(RateLimiter::direct(quota.allow_burst(nonzero!(1u32)))));

        Self { delay, limiter }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    pub async fn wait_turn(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn zero_delay_never_blocks() {
        let pacer = RequestPacer::new(Duration::ZERO);
        assert!(!pacer.is_enabled());

        let start = Instant::now();
        for _ in 0..20 {
            pacer.wait_turn().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn pacer_spaces_consecutive_turns() {
        let pacer = RequestPacer::new(Duration::from_millis(120));
        assert!(pacer.is_enabled());

        let start = Instant::now();
        pacer.wait_turn().await;
        pacer.wait_turn().await;
        pacer.wait_turn().await;
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn rate_limiter_without_quota_is_a_no_op() {
        let limiter = ApiRateLimiter::new(None);
        assert!(!limiter.is_limited());
        limiter.acquire().await;

        assert!(!ApiRateLimiter::new(Some(0)).is_limited());
        assert!(ApiRateLimiter::new(Some(60)).is_limited());
    }
}
