use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown failure strategy: {0}")]
    UnknownFailure(String),

    #[error("unknown stall strategy: {0}")]
    UnknownStall(String),

    #[error("unknown jitter strategy: {0}")]
    UnknownJitter(String),

    #[error("invalid job name {name:?}: {reason}")]
    InvalidJobName { name: String, reason: &'static str },

    #[error("invalid cohort variant: {0}")]
    InvalidVariant(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
