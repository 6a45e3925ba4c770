use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Per-job resource requests written into the scheduler directive header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    /// Wall-clock limit in seconds.
    pub wall_time_secs: u64,
    /// CPUs per task.
    pub cpus_per_task: u32,
    /// Memory request in scheduler syntax (e.g. `"10gb"`).
    pub memory: String,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            wall_time_secs: 3_600,
            cpus_per_task: 1,
            memory: "10gb".to_string(),
        }
    }
}

impl ResourceLimits {
    /// Wall time rendered as `HH:MM:SS` (hours are not wrapped at 24).
    pub fn wall_time_hms(&self) -> String {
        let h = self.wall_time_secs / 3_600;
        let m = (self.wall_time_secs % 3_600) / 60;
        let s = self.wall_time_secs % 60;
        format!("{h:02}:{m:02}:{s:02}")
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.wall_time_secs == 0 {
            return Err(ModelError::Invalid("limits.wall_time_secs cannot be zero".into()));
        }
        if self.cpus_per_task == 0 {
            return Err(ModelError::Invalid("limits.cpus_per_task cannot be zero".into()));
        }
        if self.memory.trim().is_empty() {
            return Err(ModelError::Invalid("limits.memory cannot be empty".into()));
        }
        Ok(())
    }
}

/// Worker command line; the coordinator appends item, variant, port and host flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerInvocation {
    /// Program to run (e.g. `"Rscript"`).
    pub program: String,
    /// Leading arguments (e.g. the worker script path).
    pub args: Vec<String>,
}

impl Default for WorkerInvocation {
    fn default() -> Self {
        Self {
            program: "Rscript".to_string(),
            args: vec!["listener.R".to_string()],
        }
    }
}

/// Everything the description builder needs besides the per-job inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobTemplate {
    pub limits: ResourceLimits,
    /// Shell lines emitted between the directive header and the worker invocation.
    pub prelude: Vec<String>,
    pub worker: WorkerInvocation,
}

impl Default for JobTemplate {
    fn default() -> Self {
        Self {
            limits: ResourceLimits::default(),
            prelude: vec!["module load R".to_string()],
            worker: WorkerInvocation::default(),
        }
    }
}

impl JobTemplate {
    pub fn validate(&self) -> ModelResult<()> {
        self.limits.validate()?;
        if self.worker.program.trim().is_empty() {
            return Err(ModelError::Invalid("worker.program cannot be empty".into()));
        }
        Ok(())
    }
}
