//! Well-known defaults shared by the configuration layers.
//!
//! Keeping them here avoids scattering magic numbers through the listener and controller code.

/// Interface the completion listener binds to by default (all interfaces).
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// TCP port workers call back on.
pub const DEFAULT_PORT: u16 = 6000;

/// Listen backlog: connections that may queue while the controller is busy submitting.
pub const DEFAULT_BACKLOG: u32 = 10;

/// Number of leading work items submitted without waiting for a completion signal.
///
/// Items with zero-based index `0..=50` belong to the burst phase.
pub const DEFAULT_BURST_ITEMS: usize = 51;

/// Cohort variants applied to every work item, in submission order.
pub const DEFAULT_VARIANTS: [u32; 2] = [2011, 2010];

/// Length of a generated job name.
pub const JOB_NAME_LEN: usize = 20;
