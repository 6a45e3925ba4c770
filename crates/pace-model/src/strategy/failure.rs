use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// What the controller does once a submission has exhausted its retries.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureStrategy {
    /// Stop the run and surface the error.
    #[default]
    Abort,
    /// Log the failure, count the job as skipped and move on.
    Skip,
}

impl FromStr for FailureStrategy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" | "fail" | "" => Ok(FailureStrategy::Abort),
            "skip" | "continue" => Ok(FailureStrategy::Skip),
            other => Err(ModelError::UnknownFailure(other.to_string())),
        }
    }
}
