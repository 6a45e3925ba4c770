mod backoff;
pub use backoff::BackoffStrategy;

mod failure;
pub use failure::FailureStrategy;

mod jitter;
pub use jitter::JitterStrategy;

mod stall;
pub use stall::StallStrategy;
