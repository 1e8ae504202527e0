use crate::core::validation::ValidationReport;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PvFlowError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] anyhow::Error),
    #[error("Input failed plausibility checks: {0}")]
    FailedValidation(ValidationReport),
    #[error("Error during output postprocessing: {0}")]
    ErrorInPostprocessing(#[from] PostprocessingError),
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct PostprocessingError {
    error: anyhow::Error,
}

impl PostprocessingError {
    pub fn new(error: anyhow::Error) -> Self {
        Self { error }
    }
}
