//! Error types for contact search

use thiserror::Error;

use crate::variant::{QueryMode, QueryVariant};

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Variant {} is not available in {} mode", variant.slug(), mode.as_str())]
    UnsupportedVariant {
        mode: QueryMode,
        variant: QueryVariant,
    },

    #[error(transparent)]
    Store(#[from] contactsdb_docstore::Error),
}

impl Error {
    /// Whether the failure came from a `$where` script that could not be
    /// parsed or evaluated.
    pub fn is_evaluation(&self) -> bool {
        matches!(self, Self::Store(contactsdb_docstore::Error::Evaluation(_)))
    }
}
