mod constants;
pub use constants::{
    DEFAULT_BACKLOG, DEFAULT_BIND_HOST, DEFAULT_BURST_ITEMS, DEFAULT_PORT, DEFAULT_VARIANTS,
    JOB_NAME_LEN,
};

mod item;
pub use item::{CohortVariant, WorkItem};

mod name;
pub use name::JobName;
