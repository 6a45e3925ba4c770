use std::sync::Arc;

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramVec, IntCounter, Opts, Registry,
    proto::MetricFamily,
};

use pace_core::{MetricsBackend, SubmissionOutcome};

/// Prometheus metrics backend for pace.
///
/// ## Label cardinality
/// All labels are bounded:
/// - `phase`: "burst", "steady"
/// - `outcome`: "accepted", "failed", "skipped"
/// - `correlated`: "true", "false"
/// - `error_kind`: "write_failed", "spawn_failed", "rejected", "timeout"
#[derive(Clone)]
pub struct PrometheusMetrics {
    submissions: CounterVec,
    submission_duration: HistogramVec,
    signals: CounterVec,
    retries: CounterVec,
    stalls: IntCounter,
    progress: Gauge,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a backend registering its metrics into `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let submissions = CounterVec::new(
            Opts::new("submissions_total", "Job submissions by phase and final outcome")
                .namespace("pace"),
            &["phase", "outcome"],
        )?;
        registry.register(Box::new(submissions.clone()))?;

        let submission_duration = HistogramVec::new(
            HistogramOpts::new(
                "submission_duration_seconds",
                "Time spent submitting one job, retries included",
            )
            .namespace("pace")
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0]),
            &["phase"],
        )?;
        registry.register(Box::new(submission_duration.clone()))?;

        let signals = CounterVec::new(
            Opts::new("signals_total", "Completion signals consumed").namespace("pace"),
            &["correlated"],
        )?;
        registry.register(Box::new(signals.clone()))?;

        let retries = CounterVec::new(
            Opts::new("retries_total", "Submission retries by error kind").namespace("pace"),
            &["error_kind"],
        )?;
        registry.register(Box::new(retries.clone()))?;

        let stalls = IntCounter::with_opts(
            Opts::new("stalls_total", "Completion waits that hit the accept timeout")
                .namespace("pace"),
        )?;
        registry.register(Box::new(stalls.clone()))?;

        let progress = Gauge::with_opts(
            Opts::new("progress_percent", "Share of work items consumed").namespace("pace"),
        )?;
        registry.register(Box::new(progress.clone()))?;

        Ok(Self {
            submissions,
            submission_duration,
            signals,
            retries,
            stalls,
            progress,
            registry,
        })
    }

    /// Create a backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_submission(&self, phase: &str, outcome: SubmissionOutcome, duration_ms: u64) {
        self.submissions
            .with_label_values(&[phase, outcome.as_label()])
            .inc();

        let duration_seconds = duration_ms as f64 / 1000.0;
        self.submission_duration
            .with_label_values(&[phase])
            .observe(duration_seconds);
    }

    fn record_signal(&self, correlated: bool) {
        let label = if correlated { "true" } else { "false" };
        self.signals.with_label_values(&[label]).inc();
    }

    fn record_retry(&self, error_kind: &str) {
        self.retries.with_label_values(&[error_kind]).inc();
    }

    fn record_stall(&self) {
        self.stalls.inc();
    }

    fn record_progress(&self, percent: f64) {
        self.progress.set(percent);
    }
}
