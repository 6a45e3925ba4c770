use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Retry schedule for a failed job submission.
///
/// `max_attempts` counts the first try, so the default of `1` means no retry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffStrategy {
    pub jitter: super::JitterStrategy,
    pub max_attempts: u32,
    pub first_ms: u64,
    pub max_ms: u64,
    pub factor: f64,
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self {
            jitter: super::JitterStrategy::None,
            max_attempts: 1,
            first_ms: 1_000,
            max_ms: 30_000,
            factor: 2.0,
        }
    }
}

impl BackoffStrategy {
    pub fn validate(&self) -> ModelResult<()> {
        if self.max_attempts == 0 {
            return Err(ModelError::Invalid("retry.max_attempts must be at least 1".into()));
        }
        if !(self.factor.is_finite() && self.factor >= 1.0) {
            return Err(ModelError::Invalid(format!(
                "retry.factor must be a finite number >= 1.0, got {}",
                self.factor
            )));
        }
        if self.first_ms > self.max_ms {
            return Err(ModelError::Invalid(format!(
                "retry.first_ms ({}) exceeds retry.max_ms ({})",
                self.first_ms, self.max_ms
            )));
        }
        Ok(())
    }
}
