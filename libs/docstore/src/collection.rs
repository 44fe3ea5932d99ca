//! Collections and query execution

use std::sync::Arc;

use crate::document::Document;
use crate::engine::ScriptEngine;
use crate::error::Result;
use crate::predicate::{FieldClause, Predicate};

/// An ordered, immutable set of documents.
///
/// Writes happen by building a new collection (see
/// [`Database`](crate::Database)); readers holding an `Arc<Collection>` keep
/// a consistent snapshot.
#[derive(Clone)]
pub struct Collection {
    name: String,
    documents: Vec<Document>,
    engine: Arc<dyn ScriptEngine>,
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("documents", &self.documents.len())
            .field("engine", &self.engine.name())
            .finish()
    }
}

impl Collection {
    pub fn new(name: impl Into<String>, engine: Arc<dyn ScriptEngine>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
            engine,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Copy of this collection with `documents` appended.
    pub fn with_documents(&self, documents: impl IntoIterator<Item = Document>) -> Self {
        let mut next = self.clone();
        next.documents.extend(documents);
        next
    }

    /// Return every matching document in insertion order.
    ///
    /// A malformed `$where` script fails the whole query before any document
    /// is examined; an evaluation error on any document fails it as well.
    pub fn find(&self, predicate: &Predicate) -> Result<Vec<Document>> {
        let matched = match predicate {
            Predicate::Fields { clauses } => self
                .documents
                .iter()
                .filter(|doc| matches_all(clauses, doc))
                .cloned()
                .collect(),
            Predicate::Where { script } => {
                let prepared = self.engine.prepare(script)?;
                let mut matched = Vec::new();
                for doc in &self.documents {
                    if prepared.test(doc)? {
                        matched.push(doc.clone());
                    }
                }
                matched
            }
        };

        tracing::trace!(
            collection = %self.name,
            where_operator = predicate.is_where(),
            matched = matched.len(),
            scanned = self.documents.len(),
            "find completed"
        );
        Ok(matched)
    }

    pub fn count(&self, predicate: &Predicate) -> Result<usize> {
        Ok(self.find(predicate)?.len())
    }
}

fn matches_all(clauses: &[FieldClause], document: &Document) -> bool {
    clauses.iter().all(|clause| clause.matches(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::WhereExprEngine;
    use crate::error::Error;

    fn collection() -> Collection {
        Collection::new("people", Arc::new(WhereExprEngine)).with_documents([
            Document::new().append("name", "ada").append("team", "red"),
            Document::new().append("name", "bob").append("team", "blue"),
            Document::new().append("name", "cy").append("team", "red"),
        ])
    }

    #[test]
    fn test_structured_find_keeps_order() {
        let found = collection()
            .find(&Predicate::fields(vec![FieldClause::new("team", "red")]))
            .unwrap();
        let names: Vec<&str> = found.iter().filter_map(|d| d.get_str("name")).collect();
        assert_eq!(names, vec!["ada", "cy"]);
    }

    #[test]
    fn test_empty_clause_list_matches_all() {
        assert_eq!(collection().count(&Predicate::fields(vec![])).unwrap(), 3);
    }

    #[test]
    fn test_where_find() {
        let found = collection()
            .find(&Predicate::script(r#"this.team != "red""#))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_str("name"), Some("bob"));
    }

    #[test]
    fn test_where_no_match_is_empty_not_error() {
        let found = collection().find(&Predicate::script("false")).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_malformed_where_fails() {
        let err = collection()
            .find(&Predicate::script("this.team == "))
            .unwrap_err();
        assert!(matches!(err, Error::Evaluation(_)));
    }

    #[test]
    fn test_with_documents_leaves_original_untouched() {
        let base = collection();
        let grown = base.with_documents([Document::new().append("name", "dee")]);
        assert_eq!(base.len(), 3);
        assert_eq!(grown.len(), 4);
    }
}
