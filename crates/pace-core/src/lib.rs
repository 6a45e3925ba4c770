//! Submission-throttling core of the pace coordinator.
//!
//! The [`ThrottledSubmissionController`] walks the work items, renders one job per cohort variant with the
//! [`JobDescriptionBuilder`], hands it to a [`SchedulerClient`] and, past the burst phase, waits on a
//! [`CompletionSource`] before every submission.
pub mod config;
pub mod controller;
pub mod description;
pub mod error;
pub mod listener;
pub mod metrics;
pub mod progress;
pub mod retry;
pub mod scheduler;
pub mod source;

pub use config::{CoordinatorConfig, ListenerConfig, ThrottleConfig};
pub use controller::{Phase, RunSummary, ThrottledSubmissionController};
pub use description::JobDescriptionBuilder;
pub use error::CoreError;
pub use listener::{BindError, CompletionListener, CompletionSignal, CompletionSource, ListenError};
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, SubmissionOutcome, noop_metrics};
pub use progress::Progress;
pub use retry::{RetryPolicy, RetrySchedule};
pub use scheduler::{SchedulerClient, SubmissionError};
pub use source::{SourceReadError, WorkItems};

pub mod prelude {
    pub use crate::config::CoordinatorConfig;
    pub use crate::controller::ThrottledSubmissionController;
    pub use crate::error::CoreError;
    pub use crate::listener::{CompletionListener, CompletionSource};
    pub use crate::scheduler::{SchedulerClient, SubmissionError};
    pub use crate::source::WorkItems;
}
