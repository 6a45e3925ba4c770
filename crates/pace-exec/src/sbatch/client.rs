use std::{process::Stdio, time::Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, trace, warn};

use pace_core::{SchedulerClient, SubmissionError};
use pace_model::{JobDescription, JobHandle};

use crate::{ExecError, sbatch::config::SbatchConfig, sbatch::script::ScriptFile};

/// Prefix of the line `sbatch` prints on success.
const SUBMITTED_PREFIX: &str = "Submitted batch job";

/// Max stderr bytes kept in a rejection error.
const MAX_STDERR_LEN: usize = 4096;

/// [`SchedulerClient`] running a Slurm-compatible submit command.
pub struct SbatchClient {
    config: SbatchConfig,
}

impl SbatchClient {
    pub fn new(config: SbatchConfig) -> Result<Self, ExecError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SbatchConfig {
        &self.config
    }

    fn command(&self, script: &ScriptFile) -> Command {
        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.args)
            .arg(script.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl SchedulerClient for SbatchClient {
    fn name(&self) -> &'static str {
        "sbatch"
    }

    #[instrument(level = "debug", skip_all, fields(job = %description.name()))]
    async fn submit(&self, description: &JobDescription) -> Result<JobHandle, SubmissionError> {
        let job = description.name().clone();
        let path = self.config.work_dir.join(format!("{job}.sh"));

        let script = ScriptFile::write(path.clone(), description.script())
            .await
            .map_err(|source| SubmissionError::WriteFailed {
                job: job.clone(),
                path,
                source,
            })?;

        trace!(
            command = %self.config.command,
            args = ?self.config.args,
            path = %script.path().display(),
            "spawning scheduler command",
        );
        let started = Instant::now();
        let child = self
            .command(&script)
            .spawn()
            .map_err(|source| SubmissionError::Spawn {
                job: job.clone(),
                command: self.config.command.clone(),
                source,
            })?;

        let output = match self.config.submit_timeout() {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(res) => res,
                Err(_) => {
                    warn!(timeout_ms = limit.as_millis() as u64, "scheduler command timed out; killed");
                    return Err(SubmissionError::Timeout {
                        job,
                        timeout_ms: limit.as_millis() as u64,
                    });
                }
            },
            None => child.wait_with_output().await,
        }
        .map_err(|source| SubmissionError::Spawn {
            job: job.clone(),
            command: self.config.command.clone(),
            source,
        })?;
        drop(script);

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let status = match output.status.code() {
                Some(code) => format!("exit code {code}"),
                None => "terminated by signal".to_string(),
            };
            let stderr = truncate(stderr.trim(), MAX_STDERR_LEN);
            warn!(%status, stderr = %stderr, "scheduler rejected job");
            return Err(SubmissionError::SchedulerRejected {
                job,
                status,
                stderr,
            });
        }

        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim(), "scheduler wrote to stderr");
        }
        let scheduler_id = parse_job_id(&stdout);
        debug!(
            scheduler_id = ?scheduler_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scheduler accepted job",
        );

        Ok(JobHandle {
            name: job,
            scheduler_id,
        })
    }
}

/// Extract `<id>` from a `Submitted batch job <id>` line.
///
/// With `--parsable` sbatch prints `<id>[;cluster]` alone; that form is accepted too.
fn parse_job_id(stdout: &str) -> Option<String> {
    let line = stdout.lines().map(str::trim).find(|l| !l.is_empty())?;
    let id = match line.strip_prefix(SUBMITTED_PREFIX) {
        Some(rest) => rest.split_whitespace().next()?,
        None => line.split(';').next()?,
    };
    id.chars()
        .all(|c| c.is_ascii_digit() || c == '_')
        .then(|| id.to_string())
        .filter(|id| !id.is_empty())
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pace_core::JobDescriptionBuilder;
    use pace_model::{CallbackAddress, CohortVariant, WorkItem};

    use super::*;

    fn description() -> JobDescription {
        JobDescriptionBuilder::default().build(
            WorkItem::from_line("height").unwrap(),
            CohortVariant::new(2011),
            &CallbackAddress::new("10.0.0.1", 6000),
        )
    }

    fn client(dir: &Path, command: &str, args: &[&str], timeout_ms: Option<u64>) -> SbatchClient {
        SbatchClient::new(SbatchConfig {
            command: command.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            work_dir: dir.to_path_buf(),
            submit_timeout_ms: timeout_ms,
        })
        .unwrap()
    }

    fn is_empty_dir(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = SbatchConfig {
            command: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            SbatchClient::new(cfg),
            Err(ExecError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn accepted_job_reports_id_and_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        // $1 is the description path; it must exist and carry the worker line while the command runs.
        let script = r#"grep -q '^Rscript listener.R -t "height" -y 2011' "$1" && echo "Submitted batch job 4242""#;
        let client = client(dir.path(), "sh", &["-c", script, "sbatch"], None);

        let d = description();
        let handle = client.submit(&d).await.unwrap();

        assert_eq!(&handle.name, d.name());
        assert_eq!(handle.scheduler_id.as_deref(), Some("4242"));
        assert!(is_empty_dir(dir.path()));
    }

    #[tokio::test]
    async fn rejected_job_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(
            dir.path(),
            "sh",
            &["-c", "echo 'sbatch: error: invalid partition' >&2; exit 1", "sbatch"],
            None,
        );

        let d = description();
        let err = client.submit(&d).await.unwrap_err();

        match &err {
            SubmissionError::SchedulerRejected { job, status, stderr } => {
                assert_eq!(job, d.name());
                assert_eq!(status, "exit code 1");
                assert_eq!(stderr, "sbatch: error: invalid partition");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_retryable());
        assert!(is_empty_dir(dir.path()));
    }

    #[tokio::test]
    async fn missing_command_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(dir.path(), "/nonexistent/pace-sbatch", &[], None);

        let err = client.submit(&description()).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Spawn { .. }));
        assert!(!err.is_retryable());
        assert!(is_empty_dir(dir.path()));
    }

    #[tokio::test]
    async fn slow_command_times_out_and_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(dir.path(), "sh", &["-c", "sleep 5", "sbatch"], Some(100));

        let err = client.submit(&description()).await.unwrap_err();

        assert!(matches!(err, SubmissionError::Timeout { timeout_ms: 100, .. }));
        assert!(is_empty_dir(dir.path()));
    }

    #[tokio::test]
    async fn unwritable_work_dir_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let client = client(&missing, "true", &[], None);

        let d = description();
        let err = client.submit(&d).await.unwrap_err();

        match err {
            SubmissionError::WriteFailed { job, path, .. } => {
                assert_eq!(&job, d.name());
                assert_eq!(path, missing.join(format!("{}.sh", d.name())));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn silent_success_has_no_id() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(dir.path(), "true", &[], None);

        let handle = client.submit(&description()).await.unwrap();
        assert!(handle.scheduler_id.is_none());
        assert!(is_empty_dir(dir.path()));
    }

    #[test]
    fn parses_job_id() {
        assert_eq!(parse_job_id("Submitted batch job 123\n").as_deref(), Some("123"));
        assert_eq!(parse_job_id("\n  Submitted batch job 7 on cluster x").as_deref(), Some("7"));
        assert_eq!(parse_job_id("991;cluster\n").as_deref(), Some("991"));
        assert_eq!(parse_job_id("").as_deref(), None);
        assert_eq!(parse_job_id("something else").as_deref(), None);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééé", 3), "é...");
    }
}
