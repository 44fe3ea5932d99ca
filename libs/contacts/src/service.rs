//! Contact search service

use contactsdb_docstore::{Database, Document};

use crate::builders::build_predicate;
use crate::error::Result;
use crate::variant::{QueryMode, QueryVariant};

/// Runs contact searches against one collection of a [`Database`].
#[derive(Clone)]
pub struct ContactsService {
    database: Database,
    collection: String,
}

impl ContactsService {
    pub fn new(database: Database, collection: impl Into<String>) -> Self {
        Self {
            database,
            collection: collection.into(),
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Contacts shared with `identity` whose e-mail equals `term`, built
    /// through `variant` in `mode`.
    pub fn search(
        &self,
        mode: QueryMode,
        variant: QueryVariant,
        identity: &str,
        term: &str,
    ) -> Result<Vec<Document>> {
        let predicate = build_predicate(mode, variant, identity, term)?;
        let collection = self.database.collection(&self.collection)?;
        let documents = collection.find(&predicate)?;

        tracing::debug!(
            mode = mode.as_str(),
            variant = variant.slug(),
            identity,
            results = documents.len(),
            "Contact search completed"
        );
        Ok(documents)
    }
}
