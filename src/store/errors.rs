use thiserror::Error;

/// Failures surfaced by the remote store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,

    #[error("remote store rejected the call: {0}")]
    Rejected(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("unexpected store error: {0}")]
    Unexpected(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
