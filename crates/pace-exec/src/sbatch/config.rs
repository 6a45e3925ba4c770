use std::{fmt, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::ExecError;

/// How the scheduler command is invoked.
///
/// The description file path is always appended as the last argument: `<command> [args...] <path>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SbatchConfig {
    /// Scheduler command (e.g. `"sbatch"`, `"/opt/slurm/bin/sbatch"`).
    pub command: String,
    /// Extra arguments placed before the description path.
    pub args: Vec<String>,
    /// Directory the description files are written to.
    pub work_dir: PathBuf,
    /// Kill the scheduler command when it has not exited after this many milliseconds.
    pub submit_timeout_ms: Option<u64>,
}

impl Default for SbatchConfig {
    fn default() -> Self {
        Self {
            command: "sbatch".into(),
            args: Vec::new(),
            work_dir: PathBuf::from("."),
            submit_timeout_ms: None,
        }
    }
}

impl SbatchConfig {
    pub fn submit_timeout(&self) -> Option<Duration> {
        self.submit_timeout_ms.map(Duration::from_millis)
    }

    /// Validate the configuration.
    ///
    /// Rules:
    /// - `command` is not empty or whitespace-only;
    /// - `work_dir` is set;
    /// - `submit_timeout_ms`, when present, is non-zero.
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.command.trim().is_empty() {
            return Err(ExecError::InvalidConfig("scheduler command is empty".into()));
        }
        if self.work_dir.as_os_str().is_empty() {
            return Err(ExecError::InvalidConfig("work_dir is empty".into()));
        }
        if self.submit_timeout_ms == Some(0) {
            return Err(ExecError::InvalidConfig(
                "submit_timeout_ms cannot be zero".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for SbatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SbatchConfig(cmd='{}', args={}, work_dir={}, timeout_ms={:?})",
            self.command,
            self.args.len(),
            self.work_dir.display(),
            self.submit_timeout_ms,
        )
    }
}
