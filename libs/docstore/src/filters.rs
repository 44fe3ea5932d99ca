//! Native filter combinators
//!
//! Typed alternative to [`QueryDocument`](crate::QueryDocument): each
//! criterion is its own value, so nothing can be overwritten or reshaped by
//! the data passed in.
//!
//! ```
//! use contactsdb_docstore::filters;
//!
//! let filter = filters::and([filters::eq("sharedWith", "user1"), filters::eq("email", "a@b.c")]);
//! assert_eq!(filter.into_predicate().clauses().len(), 2);
//! ```

use serde_json::Value as JsonValue;

use crate::predicate::{FieldClause, Predicate};

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { field: String, value: JsonValue },
    And(Vec<Filter>),
}

/// `field == value`
pub fn eq(field: impl Into<String>, value: impl Into<JsonValue>) -> Filter {
    Filter::Eq {
        field: field.into(),
        value: value.into(),
    }
}

/// Conjunction of `filters`.
pub fn and(filters: impl IntoIterator<Item = Filter>) -> Filter {
    Filter::And(filters.into_iter().collect())
}

impl Filter {
    /// Flatten nested conjunctions into a list of field clauses.
    pub fn into_predicate(self) -> Predicate {
        let mut clauses = Vec::new();
        self.collect_clauses(&mut clauses);
        Predicate::fields(clauses)
    }

    fn collect_clauses(self, clauses: &mut Vec<FieldClause>) {
        match self {
            Self::Eq { field, value } => clauses.push(FieldClause { field, value }),
            Self::And(filters) => {
                for filter in filters {
                    filter.collect_clauses(clauses);
                }
            }
        }
    }
}
