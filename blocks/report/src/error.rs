use civic_atoms::media::MediaError;
use civic_atoms::reports::AssembleError;
use thiserror::Error;

use crate::submission::SubmissionError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("submit is disabled until a photo is attached")]
    SubmitDisabled,

    #[error("a submit is already in progress")]
    SubmitInProgress,

    #[error("the report workflow has been closed")]
    Closed,
}
