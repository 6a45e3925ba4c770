use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("invalid scheduler configuration: {0}")]
    InvalidConfig(String),
}
