use std::sync::Arc;

/// Final outcome of one job submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Scheduler accepted the job.
    Accepted,
    /// Submission failed and the run was aborted.
    Failed,
    /// Submission failed and the job was skipped.
    Skipped,
}

impl SubmissionOutcome {
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            SubmissionOutcome::Accepted => "accepted",
            SubmissionOutcome::Failed => "failed",
            SubmissionOutcome::Skipped => "skipped",
        }
    }
}

/// Sink for controller metrics.
pub trait MetricsBackend: Send + Sync + 'static {
    /// One submission finished.
    ///
    /// - `phase`: `"burst"` or `"steady"`
    /// - `duration_ms`: time spent in the scheduler client, retries included
    fn record_submission(&self, phase: &str, outcome: SubmissionOutcome, duration_ms: u64);

    /// One completion signal consumed; `correlated` when it carried a known job name.
    fn record_signal(&self, correlated: bool);

    /// A failed submission is about to be retried.
    fn record_retry(&self, error_kind: &str);

    /// A wait for a completion signal timed out.
    fn record_stall(&self);

    /// Progress after consuming a work item, in percent.
    fn record_progress(&self, percent: f64);
}

/// Shared handle to a metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
