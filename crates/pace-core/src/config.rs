//! Coordinator configuration.
//!
//! Every struct uses `#[serde(default)]`, so a config file only needs the fields it changes.
use std::{collections::HashSet, time::Duration};

use serde::{Deserialize, Serialize};

use pace_model::{
    BackoffStrategy, CohortVariant, DEFAULT_BACKLOG, DEFAULT_BIND_HOST, DEFAULT_BURST_ITEMS,
    DEFAULT_PORT, DEFAULT_VARIANTS, FailureStrategy, JobTemplate, StallStrategy,
};

use crate::error::CoreError;

/// Top-level configuration of one submission run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    pub listener: ListenerConfig,
    pub throttle: ThrottleConfig,
    pub template: JobTemplate,
}

impl CoordinatorConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.listener.validate()?;
        self.throttle.validate()?;
        self.template
            .validate()
            .map_err(|e| CoreError::Config(e.to_string()))
    }
}

/// Completion listener socket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (`0.0.0.0` = all interfaces).
    pub host: String,
    /// TCP port; `0` picks an ephemeral port.
    pub port: u16,
    /// Listen backlog for connections arriving while the controller is submitting.
    pub backlog: u32,
    /// Host passed to workers; resolved from the machine hostname when unset.
    pub advertise_host: Option<String>,
    /// Bound on a single wait for a completion signal; unbounded when unset.
    pub accept_timeout_ms: Option<u64>,
    /// Read an optional job name line from each callback connection.
    pub read_correlation: bool,
    /// How long to wait for that line before treating the signal as uncorrelated.
    pub correlation_read_ms: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            backlog: DEFAULT_BACKLOG,
            advertise_host: None,
            accept_timeout_ms: None,
            read_correlation: false,
            correlation_read_ms: 500,
        }
    }
}

impl ListenerConfig {
    pub fn accept_timeout(&self) -> Option<Duration> {
        self.accept_timeout_ms.map(Duration::from_millis)
    }

    pub fn correlation_read(&self) -> Duration {
        Duration::from_millis(self.correlation_read_ms)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::Config("listener.host cannot be empty".into()));
        }
        if self.backlog == 0 {
            return Err(CoreError::Config("listener.backlog cannot be zero".into()));
        }
        if self.accept_timeout_ms == Some(0) {
            return Err(CoreError::Config(
                "listener.accept_timeout_ms cannot be zero (omit it to wait forever)".into(),
            ));
        }
        if let Some(host) = &self.advertise_host {
            if !is_plain_host(host) {
                return Err(CoreError::Config(format!(
                    "listener.advertise_host '{host}' must be a hostname or IP address"
                )));
            }
        }
        if self.read_correlation && self.correlation_read_ms == 0 {
            return Err(CoreError::Config(
                "listener.correlation_read_ms cannot be zero when read_correlation is enabled".into(),
            ));
        }
        Ok(())
    }
}

/// Hostname or IP literal: the advertise host is rendered unquoted into job scripts.
fn is_plain_host(host: &str) -> bool {
    !host.is_empty()
        && host.len() <= 253
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '_'))
}

/// Submission cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Leading work items submitted without waiting; `0` throttles from the first job.
    pub burst_items: usize,
    /// Cohort variants in submission order.
    pub variants: Vec<CohortVariant>,
    /// Reaction to an accept timeout.
    pub stall: StallStrategy,
    /// Reaction to a submission that failed for good.
    pub on_failure: FailureStrategy,
    /// Retry schedule for failed submissions.
    pub retry: BackoffStrategy,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            burst_items: DEFAULT_BURST_ITEMS,
            variants: DEFAULT_VARIANTS.into_iter().map(CohortVariant::new).collect(),
            stall: StallStrategy::default(),
            on_failure: FailureStrategy::default(),
            retry: BackoffStrategy::default(),
        }
    }
}

impl ThrottleConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.variants.is_empty() {
            return Err(CoreError::Config("throttle.variants cannot be empty".into()));
        }
        let mut seen = HashSet::new();
        for v in &self.variants {
            if !seen.insert(*v) {
                return Err(CoreError::Config(format!(
                    "throttle.variants contains {v} more than once"
                )));
            }
        }
        self.retry
            .validate()
            .map_err(|e| CoreError::Config(e.to_string()))
    }
}
