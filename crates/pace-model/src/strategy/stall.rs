use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Reaction to an accept timeout while waiting for a completion signal.
///
/// Only relevant when the listener has an accept timeout configured.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StallStrategy {
    /// Log the stall and keep waiting for a real signal.
    #[default]
    Wait,
    /// Treat the timeout as a lost signal and submit the next job.
    Proceed,
}

impl FromStr for StallStrategy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wait" | "" => Ok(StallStrategy::Wait),
            "proceed" => Ok(StallStrategy::Proceed),
            other => Err(ModelError::UnknownStall(other.to_string())),
        }
    }
}
