use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocsmithError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}
