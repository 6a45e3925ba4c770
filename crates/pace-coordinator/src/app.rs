use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;

use pace_core::{
    CompletionListener, JobDescriptionBuilder, MetricsHandle, RunSummary,
    ThrottledSubmissionController, WorkItems,
};
use pace_exec::SbatchClient;

use crate::config::AppConfig;

/// One submission run.
///
/// The listener is bound before the work-item file is read, so a busy port fails the run before
/// anything is submitted.
pub async fn run(
    cfg: &AppConfig,
    metrics: MetricsHandle,
    cancel: CancellationToken,
) -> anyhow::Result<RunSummary> {
    let listener_cfg = &cfg.coordinator.listener;
    let scheduler = SbatchClient::new(cfg.scheduler.clone())?;

    let listener = CompletionListener::bind(listener_cfg).await?;
    let callback = listener
        .advertise(listener_cfg)
        .await
        .context("failed to resolve callback address")?;
    info!(callback = %callback, "workers will call back on this address");

    let items = WorkItems::load(&cfg.items).await?;

    let summary = ThrottledSubmissionController::new(
        cfg.coordinator.throttle.clone(),
        JobDescriptionBuilder::new(cfg.coordinator.template.clone()),
        callback,
        scheduler,
        listener,
    )
    .with_metrics(metrics)
    .run(items, cancel)
    .await?;

    Ok(summary)
}
