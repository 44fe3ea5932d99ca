//! Error types for the `$where` engine

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Expression errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Reference error: {0} is not defined")]
    ReferenceError(String),

    #[error("Type error: {0}")]
    TypeError(String),
}
