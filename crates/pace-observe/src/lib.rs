//! Logging setup for the pace coordinator.
//!
//! Library crates only emit `tracing` events; the binary calls [`init_logger`] once at startup.
mod config;
pub use config::LoggerConfig;

mod error;
pub use error::{LoggerError, LoggerResult};

mod format;
pub use format::LoggerFormat;

mod level;
pub use level::LoggerLevel;

mod timer;
pub use timer::{LoggerTimeZone, LoggerTimer, init_local_offset};

mod install;
pub use install::init_logger;
