//! Prometheus metrics backend for the pace coordinator.
//!
//! [`PrometheusMetrics`] implements [`pace_core::MetricsBackend`]; hand it to the controller with
//! `ThrottledSubmissionController::with_metrics`.
//!
//! ## Metrics
//! - `pace_submissions_total{phase, outcome}` - Counter
//! - `pace_submission_duration_seconds{phase}` - Histogram
//! - `pace_signals_total{correlated}` - Counter
//! - `pace_retries_total{error_kind}` - Counter
//! - `pace_stalls_total` - Counter
//! - `pace_progress_percent` - Gauge
//!
//! ## HTTP Server
//! No `/metrics` endpoint is served from here; the coordinator binary mounts one with axum:
//!
//! ```rust,ignore
//! async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> Response {
//!     let mut buffer = vec![];
//!     TextEncoder::new().encode(&metrics.gather(), &mut buffer)?;
//!     // ...
//! }
//! ```

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
