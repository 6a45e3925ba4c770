mod domain;
pub use domain::{CohortVariant, JobName, WorkItem};
pub use domain::{
    DEFAULT_BACKLOG, DEFAULT_BIND_HOST, DEFAULT_BURST_ITEMS, DEFAULT_PORT, DEFAULT_VARIANTS,
    JOB_NAME_LEN,
};

mod error;
pub use error::{ModelError, ModelResult};

mod job;
pub use job::{CallbackAddress, JobDescription, JobHandle, JobTemplate, ResourceLimits, WorkerInvocation};

mod strategy;
pub use strategy::{BackoffStrategy, FailureStrategy, JitterStrategy, StallStrategy};
