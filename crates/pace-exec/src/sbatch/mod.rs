//! Slurm `sbatch` client.
//!
//! Each submission writes the rendered description to `<work_dir>/<JobName>.sh`, hands the path to the
//! scheduler command and removes the file again, whatever the command did.
mod client;
mod config;
mod script;

pub use client::SbatchClient;
pub use config::SbatchConfig;
