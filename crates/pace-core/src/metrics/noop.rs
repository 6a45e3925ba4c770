use crate::metrics::backend::{MetricsBackend, SubmissionOutcome};

/// Metrics backend that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_submission(&self, _: &str, _: SubmissionOutcome, _: u64) {}

    #[inline(always)]
    fn record_signal(&self, _: bool) {}

    #[inline(always)]
    fn record_retry(&self, _: &str) {}

    #[inline(always)]
    fn record_stall(&self) {}

    #[inline(always)]
    fn record_progress(&self, _: f64) {}
}
