//! Scheduler capability used by the controller.
//!
//! The real implementation shells out to `sbatch` (see `pace-exec`); tests plug in fakes.
use std::{io, path::PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use pace_model::{JobDescription, JobHandle, JobName};

/// Submits rendered job descriptions to an external batch scheduler.
///
/// Implementations must not leave the description artifact behind, whatever the outcome.
/// They report failures but never retry; retrying is the controller's call.
#[async_trait]
pub trait SchedulerClient: Send + Sync {
    /// Client name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Submit one description and return the scheduler's handle for it.
    async fn submit(&self, description: &JobDescription) -> Result<JobHandle, SubmissionError>;
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("failed to write description of job {job} to {}: {source}", path.display())]
    WriteFailed {
        job: JobName,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn scheduler command '{command}' for job {job}: {source}")]
    Spawn {
        job: JobName,
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("scheduler rejected job {job} ({status}): {stderr}")]
    SchedulerRejected {
        job: JobName,
        status: String,
        stderr: String,
    },

    #[error("scheduler did not answer within {timeout_ms}ms for job {job}")]
    Timeout { job: JobName, timeout_ms: u64 },
}

impl SubmissionError {
    /// Job the failed submission was for.
    pub fn job(&self) -> &JobName {
        match self {
            SubmissionError::WriteFailed { job, .. }
            | SubmissionError::Spawn { job, .. }
            | SubmissionError::SchedulerRejected { job, .. }
            | SubmissionError::Timeout { job, .. } => job,
        }
    }

    /// Whether trying the same submission again can succeed.
    ///
    /// A missing scheduler binary or a read-only work dir will not fix itself; a busy controller daemon might.
    pub fn is_retryable(&self) -> bool {
        match self {
            SubmissionError::WriteFailed { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
            SubmissionError::Spawn { .. } => false,
            SubmissionError::SchedulerRejected { .. } | SubmissionError::Timeout { .. } => true,
        }
    }

    /// Low-cardinality label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionError::WriteFailed { .. } => "write_failed",
            SubmissionError::Spawn { .. } => "spawn_failed",
            SubmissionError::SchedulerRejected { .. } => "rejected",
            SubmissionError::Timeout { .. } => "timeout",
        }
    }
}
