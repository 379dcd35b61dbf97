use crate::config::RateLimitPolicy;
use tokio::time::sleep;
use tracing::info;

/// Sleeps after every `batch_size` operations to stay under the API write quota
#[derive(Debug)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
    pauses: usize,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self { policy, pauses: 0 }
    }

    /// Whether the operation at 0-based `index` closes a batch
    pub fn should_pause(&self, index: usize) -> bool {
        let batch = self.policy.batch_size;
        batch > 0 && index % batch == batch - 1
    }

    /// Call after the operation at 0-based `index` has finished
    pub async fn after_operation(&mut self, index: usize) {
        if !self.should_pause(index) {
            return;
        }
        info!(
            "Processed {} operations, pausing for {} ms",
            index + 1,
            self.policy.pause_ms
        );
        sleep(self.policy.pause_duration()).await;
        self.pauses += 1;
    }

    /// Number of pauses taken so far
    pub fn pauses(&self) -> usize {
        self.pauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_pauses_after_every_tenth() {
        let limiter = RateLimiter::new(RateLimitPolicy::default());
        let pausing: Vec<usize> = (0..25).filter(|i| limiter.should_pause(*i)).collect();
        assert_eq!(pausing, vec![9, 19]);
    }

    #[test]
    fn test_zero_batch_size_never_pauses() {
        let limiter = RateLimiter::new(RateLimitPolicy {
            batch_size: 0,
            pause_ms: 3000,
        });
        assert!((0..100).all(|i| !limiter.should_pause(i)));
    }

    #[tokio::test]
    async fn test_counts_pauses() {
        let mut limiter = RateLimiter::new(RateLimitPolicy {
            batch_size: 3,
            pause_ms: 0,
        });
        for i in 0..7 {
            limiter.after_operation(i).await;
        }
        assert_eq!(limiter.pauses(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_policy_sleeps_three_seconds_per_batch() {
        let mut limiter = RateLimiter::new(RateLimitPolicy::default());
        let start = tokio::time::Instant::now();

        for i in 0..24 {
            limiter.after_operation(i).await;
        }
        assert_eq!(start.elapsed(), Duration::from_secs(6));

        // The 25th operation does not close a batch
        limiter.after_operation(24).await;
        assert_eq!(start.elapsed(), Duration::from_secs(6));
        assert_eq!(limiter.pauses(), 2);
    }
}
