//! Retry delays for failed submissions.
use std::time::Duration;

use rand::Rng;

use pace_model::{BackoffStrategy, JitterStrategy};

/// Retry policy derived from a [`BackoffStrategy`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    strategy: BackoffStrategy,
}

impl RetryPolicy {
    pub fn new(strategy: BackoffStrategy) -> Self {
        Self { strategy }
    }

    /// Total attempts including the first one (at least 1).
    pub fn max_attempts(&self) -> u32 {
        self.strategy.max_attempts.max(1)
    }

    /// Fresh delay sequence for one submission.
    pub fn schedule(&self) -> RetrySchedule {
        RetrySchedule {
            strategy: self.strategy.clone(),
            retries: 0,
            prev_ms: self.strategy.first_ms,
        }
    }
}

/// Delays between consecutive attempts of a single submission.
#[derive(Debug, Clone)]
pub struct RetrySchedule {
    strategy: BackoffStrategy,
    retries: u32,
    prev_ms: u64,
}

impl RetrySchedule {
    /// Delay before the next attempt.
    pub fn next_delay(&mut self) -> Duration {
        let s = &self.strategy;
        let base = (s.first_ms as f64 * s.factor.powi(self.retries as i32)).min(s.max_ms as f64) as u64;
        self.retries += 1;

        let mut rng = rand::thread_rng();
        let ms = match s.jitter {
            JitterStrategy::None => base,
            JitterStrategy::Full => rng.gen_range(0..=base),
            JitterStrategy::Equal => base / 2 + rng.gen_range(0..=base - base / 2),
            JitterStrategy::Decorrelated => {
                let upper = self.prev_ms.saturating_mul(3).min(s.max_ms).max(s.first_ms);
                rng.gen_range(s.first_ms..=upper)
            }
        };
        self.prev_ms = ms;
        Duration::from_millis(ms)
    }
}
