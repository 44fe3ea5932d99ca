//! Executable query predicates

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::document::Document;
use crate::error::{Error, Result};

/// One `field == literal` clause of a structured predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldClause {
    pub field: String,
    /// Compared verbatim; never parsed.
    pub value: JsonValue,
}

impl FieldClause {
    pub fn new(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        document.get(&self.field) == Some(&self.value)
    }
}

/// Lowered form of a query, ready for execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Script evaluated per document by the `$where` operator.
    Where { script: String },
    /// Conjunction of field equality clauses. An empty list matches everything.
    Fields { clauses: Vec<FieldClause> },
}

impl Predicate {
    pub fn script(script: impl Into<String>) -> Self {
        Self::Where {
            script: script.into(),
        }
    }

    pub fn fields(clauses: Vec<FieldClause>) -> Self {
        Self::Fields { clauses }
    }

    pub fn is_where(&self) -> bool {
        matches!(self, Self::Where { .. })
    }

    pub fn clauses(&self) -> &[FieldClause] {
        match self {
            Self::Fields { clauses } => clauses,
            Self::Where { .. } => &[],
        }
    }

    /// Checks that a structured predicate binds exactly `expected` distinct
    /// fields. Map-shaped builders silently overwrite repeated keys, so a
    /// clause can go missing without this check.
    pub fn ensure_clause_count(&self, expected: usize) -> Result<()> {
        let Self::Fields { clauses } = self else {
            return Err(Error::InvalidQuery(
                "expected a structured predicate, found $where".to_string(),
            ));
        };

        let mut fields: Vec<&str> = clauses.iter().map(|c| c.field.as_str()).collect();
        fields.sort_unstable();
        fields.dedup();

        if clauses.len() != expected || fields.len() != expected {
            return Err(Error::InvalidQuery(format!(
                "expected {expected} distinct field clauses, found {} ({} distinct)",
                clauses.len(),
                fields.len()
            )));
        }
        Ok(())
    }
}
