//! Metrics abstraction for submission runs.
//!
//! Backends (prometheus, ...) implement [`MetricsBackend`] and are handed to the controller via
//! [`crate::ThrottledSubmissionController::with_metrics`].
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, SubmissionOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
