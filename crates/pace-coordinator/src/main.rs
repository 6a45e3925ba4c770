mod app;
mod args;
mod config;
mod metrics;
mod shutdown;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use pace_core::{MetricsHandle, noop_metrics};
use pace_observe::{init_local_offset, init_logger};
use pace_prometheus::PrometheusMetrics;

use crate::{args::Args, config::AppConfig};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 1) config
    let mut cfg = AppConfig::load(args.config.as_deref())?;
    cfg.apply(&args);
    cfg.validate()?;

    // 2) logger; the local UTC offset can only be read while single-threaded
    init_local_offset();
    init_logger(&cfg.logger)?;
    info!(items = %cfg.items.display(), scheduler = %cfg.scheduler, "logger initialized");

    // 3) runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: AppConfig) -> anyhow::Result<()> {
    let cancel = shutdown::install_shutdown_handler().context("failed to install signal handlers")?;

    let metrics: MetricsHandle = match cfg.metrics_addr {
        Some(addr) => {
            let prometheus = PrometheusMetrics::new().context("failed to register metrics")?;
            tokio::spawn(metrics::serve(addr, prometheus.clone(), cancel.child_token()));
            Arc::new(prometheus)
        }
        None => noop_metrics(),
    };

    let result = app::run(&cfg, metrics, cancel.clone()).await;
    cancel.cancel();

    match result {
        Ok(summary) => {
            info!(%summary, "coordinator finished");
            Ok(())
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "coordinator failed");
            Err(e)
        }
    }
}
