//! Application config: an optional JSON file, then command-line overrides.
use std::{fs, net::SocketAddr, path::{Path, PathBuf}};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use pace_core::CoordinatorConfig;
use pace_exec::SbatchConfig;
use pace_observe::LoggerConfig;

use crate::args::Args;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logger: LoggerConfig,
    pub coordinator: CoordinatorConfig,
    pub scheduler: SbatchConfig,
    /// Work-item file.
    pub items: PathBuf,
    /// Address of the `/metrics` endpoint; disabled when unset.
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logger: LoggerConfig::default(),
            coordinator: CoordinatorConfig::default(),
            scheduler: SbatchConfig::default(),
            items: PathBuf::from("genes.txt"),
            metrics_addr: None,
        }
    }
}

impl AppConfig {
    /// Read `path`, or start from defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Apply command-line overrides.
    pub fn apply(&mut self, args: &Args) {
        if let Some(items) = &args.items {
            self.items = items.clone();
        }
        if let Some(port) = args.port {
            self.coordinator.listener.port = port;
        }
        if let Some(burst_items) = args.burst_items {
            self.coordinator.throttle.burst_items = burst_items;
        }
        if !args.variants.is_empty() {
            self.coordinator.throttle.variants = args.variants.clone();
        }
        if let Some(on_failure) = args.on_failure {
            self.coordinator.throttle.on_failure = on_failure;
        }
        if let Some(stall) = args.stall {
            self.coordinator.throttle.stall = stall;
        }
        if let Some(max_attempts) = args.max_attempts {
            self.coordinator.throttle.retry.max_attempts = max_attempts;
        }
        if let Some(jitter) = args.retry_jitter {
            self.coordinator.throttle.retry.jitter = jitter;
        }
        if let Some(level) = &args.log_level {
            self.logger.level = level.clone();
        }
        if let Some(format) = args.log_format {
            self.logger.format = format;
        }
        if let Some(addr) = args.metrics_addr {
            self.metrics_addr = Some(addr);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.coordinator
            .validate()
            .context("invalid coordinator config")?;
        self.scheduler
            .validate()
            .context("invalid scheduler config")?;
        Ok(())
    }
}
