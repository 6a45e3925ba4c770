use std::fmt;

use crate::domain::{CohortVariant, JobName, WorkItem};

/// Address a worker connects to when its job finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackAddress {
    pub host: String,
    pub port: u16,
}

impl CallbackAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for CallbackAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Rendered scheduler script for one (work item, cohort variant) pair.
///
/// Owned by the submission that created it; the scheduler client writes it to disk only for the duration of the submit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescription {
    name: JobName,
    item: WorkItem,
    variant: CohortVariant,
    script: String,
}

impl JobDescription {
    pub fn new(name: JobName, item: WorkItem, variant: CohortVariant, script: String) -> Self {
        Self {
            name,
            item,
            variant,
            script,
        }
    }

    #[inline]
    pub fn name(&self) -> &JobName {
        &self.name
    }

    #[inline]
    pub fn item(&self) -> &WorkItem {
        &self.item
    }

    #[inline]
    pub fn variant(&self) -> CohortVariant {
        self.variant
    }

    /// Full script text, ready to be written to a file.
    #[inline]
    pub fn script(&self) -> &str {
        &self.script
    }
}

impl fmt::Display for JobDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JobDescription(name={}, item={}, variant={})",
            self.name, self.item, self.variant
        )
    }
}

/// Handle returned by the scheduler for an accepted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    /// Name the job was submitted under.
    pub name: JobName,
    /// Scheduler-assigned id, when the scheduler reported one.
    pub scheduler_id: Option<String>,
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scheduler_id {
            Some(id) => write!(f, "{}#{}", self.name, id),
            None => write!(f, "{}", self.name),
        }
    }
}
