mod description;
pub use description::{CallbackAddress, JobDescription, JobHandle};

mod template;
pub use template::{JobTemplate, ResourceLimits, WorkerInvocation};
