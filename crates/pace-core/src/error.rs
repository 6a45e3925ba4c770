use thiserror::Error;

use pace_model::{CohortVariant, WorkItem};

use crate::{
    listener::{BindError, ListenError},
    scheduler::SubmissionError,
    source::SourceReadError,
};

/// Errors that end a coordinator run.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Source(#[from] SourceReadError),

    #[error("submission of item '{item}' (variant {variant}) failed: {source}")]
    Submission {
        item: WorkItem,
        variant: CohortVariant,
        #[source]
        source: SubmissionError,
    },

    #[error("completion listener failed: {0}")]
    Listen(#[source] ListenError),

    #[error("run cancelled")]
    Cancelled,
}
