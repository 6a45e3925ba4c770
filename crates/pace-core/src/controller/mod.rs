//! Throttled submission loop.
//!
//! Items with index below `burst_items` are submitted straight away for every cohort variant.
//! From then on each job waits for one completion signal first, which keeps roughly
//! `burst_items * variants` jobs in flight.
use std::{collections::VecDeque, fmt, time::Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use pace_model::{CallbackAddress, CohortVariant, FailureStrategy, JobName, StallStrategy, WorkItem};

use crate::{
    config::ThrottleConfig,
    description::JobDescriptionBuilder,
    error::CoreError,
    listener::{CompletionSignal, CompletionSource, ListenError},
    metrics::{MetricsHandle, SubmissionOutcome, noop_metrics},
    progress::Progress,
    retry::RetryPolicy,
    scheduler::SchedulerClient,
    source::WorkItems,
};


/// Submission regime of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Submit without waiting.
    Burst,
    /// Wait for one completion signal before each job.
    SteadyState,
}

impl Phase {
    /// Phase of the item at zero-based `index`.
    #[inline]
    pub fn for_index(index: usize, burst_items: usize) -> Self {
        if index < burst_items {
            Phase::Burst
        } else {
            Phase::SteadyState
        }
    }

    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            Phase::Burst => "burst",
            Phase::SteadyState => "steady",
        }
    }
}

/// Counters of a finished (or stopped) run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Work items fully consumed.
    pub items: usize,
    /// Jobs accepted by the scheduler.
    pub submitted: usize,
    /// Completion signals consumed.
    pub signals: usize,
    /// Correlated signals naming a job this run did not have outstanding.
    pub unmatched_signals: usize,
    /// Jobs dropped after exhausting retries.
    pub skipped: usize,
    /// Extra submission attempts.
    pub retries: usize,
    /// Accept timeouts hit while waiting for a signal.
    pub stalls: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "items={} submitted={} signals={} unmatched={} skipped={} retries={} stalls={}",
            self.items,
            self.submitted,
            self.signals,
            self.unmatched_signals,
            self.skipped,
            self.retries,
            self.stalls,
        )
    }
}

/// Drives job submission over a work-item sequence.
pub struct ThrottledSubmissionController<S, L> {
    throttle: ThrottleConfig,
    builder: JobDescriptionBuilder,
    callback: CallbackAddress,
    scheduler: S,
    source: L,
    retry: RetryPolicy,
    metrics: MetricsHandle,
    /// Jobs believed in flight, oldest first.
    outstanding: VecDeque<JobName>,
    summary: RunSummary,
}

impl<S, L> ThrottledSubmissionController<S, L>
where
    S: SchedulerClient,
    L: CompletionSource,
{
    /// `callback` is the address rendered into every job so its worker can signal completion.
    pub fn new(
        throttle: ThrottleConfig,
        builder: JobDescriptionBuilder,
        callback: CallbackAddress,
        scheduler: S,
        source: L,
    ) -> Self {
        let retry = RetryPolicy::new(throttle.retry.clone());
        Self {
            throttle,
            builder,
            callback,
            scheduler,
            source,
            retry,
            metrics: noop_metrics(),
            outstanding: VecDeque::new(),
            summary: RunSummary::default(),
        }
    }

    /// Replace the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Submit every job for `items`.
    ///
    /// Consumes the controller: the completion source (and its socket) is dropped when the run ends.
    #[instrument(level = "debug", skip_all)]
    pub async fn run(
        mut self,
        items: WorkItems,
        cancel: CancellationToken,
    ) -> Result<RunSummary, CoreError> {
        info!(
            scheduler = self.scheduler.name(),
            items = items.len(),
            expected_total = items.expected_total(),
            burst_items = self.throttle.burst_items,
            variants = ?self.throttle.variants,
            callback = %self.callback,
            "starting submission run",
        );

        match self.drive(&items, &cancel).await {
            Ok(()) => {
                info!(summary = %self.summary, "all work items submitted");
                Ok(self.summary)
            }
            Err(e) => {
                error!(
                    error = %e,
                    consumed = self.summary.items,
                    summary = %self.summary,
                    "submission run stopped; items from index {} on were not fully submitted",
                    self.summary.items,
                );
                Err(e)
            }
        }
    }

    async fn drive(&mut self, items: &WorkItems, cancel: &CancellationToken) -> Result<(), CoreError> {
        let variants = self.throttle.variants.clone();
        let burst_items = self.throttle.burst_items;
        let mut progress = Progress::new(items.expected_total());

        for (index, item) in items.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(CoreError::Cancelled);
            }

            let phase = Phase::for_index(index, burst_items);
            if index == burst_items && burst_items > 0 {
                info!(
                    outstanding = self.outstanding.len(),
                    "burst phase complete; throttling on completion signals",
                );
            }

            for &variant in &variants {
                if phase == Phase::SteadyState {
                    self.wait_for_slot(cancel).await?;
                }
                self.submit_one(item, variant, phase, cancel).await?;
            }

            self.summary.items += 1;
            let percent = progress.advance();
            self.metrics.record_progress(percent);
            info!(item = %item, index, phase = phase.as_label(), "progress {percent:.2}%");
        }
        Ok(())
    }

    /// Block until a completion signal frees a slot.
    async fn wait_for_slot(&mut self, cancel: &CancellationToken) -> Result<(), CoreError> {
        loop {
            match self.source.await_completion(cancel).await {
                Ok(signal) => {
                    self.on_signal(signal);
                    return Ok(());
                }
                Err(ListenError::Timeout { waited_ms }) => {
                    self.summary.stalls += 1;
                    self.metrics.record_stall();
                    match self.throttle.stall {
                        StallStrategy::Wait => {
                            warn!(
                                waited_ms,
                                outstanding = self.outstanding.len(),
                                "no completion signal yet; still waiting",
                            );
                        }
                        StallStrategy::Proceed => {
                            let presumed = self.outstanding.pop_front();
                            warn!(
                                waited_ms,
                                outstanding = self.outstanding.len(),
                                presumed_done = ?presumed,
                                "no completion signal; assuming it was lost and submitting",
                            );
                            return Ok(());
                        }
                    }
                }
                Err(ListenError::Cancelled) => return Err(CoreError::Cancelled),
                Err(e) => return Err(CoreError::Listen(e)),
            }
        }
    }

    /// Every signal retires one outstanding job: the named one when it is known, else the oldest.
    fn on_signal(&mut self, signal: CompletionSignal) {
        self.summary.signals += 1;
        match signal.job {
            Some(job) => match self.outstanding.iter().position(|j| *j == job) {
                Some(pos) => {
                    self.outstanding.remove(pos);
                    self.metrics.record_signal(true);
                    debug!(peer = %signal.peer, job = %job, "completion signal matched");
                }
                None => {
                    self.outstanding.pop_front();
                    self.summary.unmatched_signals += 1;
                    self.metrics.record_signal(false);
                    warn!(peer = %signal.peer, job = %job, "completion signal names an unknown job");
                }
            },
            None => {
                self.outstanding.pop_front();
                self.metrics.record_signal(false);
                debug!(peer = %signal.peer, "completion signal received");
            }
        }
    }

    async fn submit_one(
        &mut self,
        item: &WorkItem,
        variant: CohortVariant,
        phase: Phase,
        cancel: &CancellationToken,
    ) -> Result<(), CoreError> {
        let description = self.builder.build(item.clone(), variant, &self.callback);
        let mut schedule = self.retry.schedule();
        let started = Instant::now();
        let mut attempt = 1;

        loop {
            match self.scheduler.submit(&description).await {
                Ok(handle) => {
                    info!(
                        job = %handle,
                        item = %item,
                        variant = %variant,
                        phase = phase.as_label(),
                        "job submitted",
                    );
                    self.outstanding.push_back(handle.name);
                    self.summary.submitted += 1;
                    self.metrics.record_submission(
                        phase.as_label(),
                        SubmissionOutcome::Accepted,
                        elapsed_ms(started),
                    );
                    return Ok(());
                }
                Err(err) if err.is_retryable() && attempt < self.retry.max_attempts() => {
                    let delay = schedule.next_delay();
                    warn!(
                        job = %description.name(),
                        item = %item,
                        variant = %variant,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "submission failed; retrying",
                    );
                    self.summary.retries += 1;
                    self.metrics.record_retry(err.kind());

                    tokio::select! {
                        _ = cancel.cancelled() => return Err(CoreError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
                Err(err) => match self.throttle.on_failure {
                    FailureStrategy::Abort => {
                        self.metrics.record_submission(
                            phase.as_label(),
                            SubmissionOutcome::Failed,
                            elapsed_ms(started),
                        );
                        return Err(CoreError::Submission {
                            item: item.clone(),
                            variant,
                            source: err,
                        });
                    }
                    FailureStrategy::Skip => {
                        error!(
                            job = %description.name(),
                            item = %item,
                            variant = %variant,
                            attempts = attempt,
                            error = %err,
                            "submission failed; skipping job",
                        );
                        self.summary.skipped += 1;
                        self.metrics.record_submission(
                            phase.as_label(),
                            SubmissionOutcome::Skipped,
                            elapsed_ms(started),
                        );
                        return Ok(());
                    }
                },
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
