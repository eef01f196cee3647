use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex identifier: {0:?}")]
    InvalidHex(String),

    #[error("identifier out of range: {0:?}")]
    OutOfRange(String),
}
