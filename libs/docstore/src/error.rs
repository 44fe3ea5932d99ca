//! Error types for the document store

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The `$where` script could not be parsed or evaluated.
    #[error("$where evaluation failed: {0}")]
    Evaluation(#[from] contactsdb_whereexpr::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Collection not found: {database}.{collection}")]
    CollectionNotFound {
        database: String,
        collection: String,
    },

    #[error("Store is not running")]
    NotRunning,

    #[error("Store state is poisoned")]
    Poisoned,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
