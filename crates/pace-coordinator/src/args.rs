use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

use pace_model::{CohortVariant, FailureStrategy, JitterStrategy, StallStrategy};
use pace_observe::{LoggerFormat, LoggerLevel};

/// Command-line arguments. Every flag overrides the matching config file value.
#[derive(Parser, Debug, Default)]
#[command(name = "pace-coordinator")]
#[command(version)]
#[command(about = "Submits one batch job per work item and cohort variant, throttled by worker callbacks")]
pub struct Args {
    /// Work-item file, one item per line
    #[arg(long, short = 'i')]
    pub items: Option<PathBuf>,

    /// JSON config file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Port the completion listener binds and workers call back on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Number of leading work items submitted without waiting for callbacks
    #[arg(long)]
    pub burst_items: Option<usize>,

    /// Cohort variant to submit per item; repeat for several, in submission order
    #[arg(long = "variant", value_name = "VARIANT")]
    pub variants: Vec<CohortVariant>,

    /// What to do with a job whose submission keeps failing: abort or skip
    #[arg(long)]
    pub on_failure: Option<FailureStrategy>,

    /// What to do when no callback arrives within the accept timeout: wait or proceed
    #[arg(long)]
    pub stall: Option<StallStrategy>,

    /// Submission attempts per job, the first one included
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Jitter applied to retry delays: none, full, equal or decorrelated
    #[arg(long)]
    pub retry_jitter: Option<JitterStrategy>,

    /// Log filter expression, e.g. "info" or "pace_core=debug,info"
    #[arg(long)]
    pub log_level: Option<LoggerLevel>,

    /// Log output format: text, json or journald
    #[arg(long)]
    pub log_format: Option<LoggerFormat>,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,
}
