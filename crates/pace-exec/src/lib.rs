mod error;
pub use error::ExecError;

#[cfg(feature = "sbatch")]
pub mod sbatch;
#[cfg(feature = "sbatch")]
pub use sbatch::{SbatchClient, SbatchConfig};
