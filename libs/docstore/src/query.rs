//! Map-shaped query container
//!
//! [`QueryDocument`] is the generic key/value query object most drivers
//! expose: keys are field names, except for top-level operators such as
//! `$where`. It can be filled in several equivalent ways (single puts, bulk
//! merges, chained appends, constructors, JSON text, or the
//! [`QueryDocumentBuilder`]); all of them end up in the same ordered map and
//! lower to the same [`Predicate`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::predicate::{FieldClause, Predicate};

/// Top-level operator that evaluates a script per document.
pub const WHERE_OPERATOR: &str = "$where";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryDocument(Map<String, JsonValue>);

impl QueryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single key/value constructor.
    pub fn with(key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        let mut query = Self::new();
        query.put(key, value);
        query
    }

    /// Constructor from an existing map of criteria.
    pub fn from_map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<JsonValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut query = Self::new();
        query.put_all(entries);
        query
    }

    /// Parse a JSON object text into a query.
    pub fn parse(json: &str) -> Result<Self> {
        match serde_json::from_str::<JsonValue>(json)? {
            JsonValue::Object(map) => Ok(Self(map)),
            other => Err(Error::InvalidQuery(format!(
                "query text must be a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Insert a criterion, returning the value it replaced.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Option<JsonValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Merge criteria from another map. Later keys win.
    pub fn put_all<K, V, I>(&mut self, entries: I)
    where
        K: Into<String>,
        V: Into<JsonValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.0.insert(key.into(), value.into());
        }
    }

    /// Chainable insert.
    pub fn append(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.put(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Lower the container into an executable predicate.
    ///
    /// `$where` must be a string and cannot be mixed with field criteria.
    /// Field values are literals; operator objects (`{"$ne": ..}`) are
    /// rejected rather than interpreted.
    pub fn to_predicate(&self) -> Result<Predicate> {
        if let Some(script) = self.0.get(WHERE_OPERATOR) {
            let JsonValue::String(script) = script else {
                return Err(Error::InvalidQuery(format!(
                    "{WHERE_OPERATOR} expects a string, found {}",
                    json_kind(script)
                )));
            };
            if self.0.len() > 1 {
                return Err(Error::InvalidQuery(format!(
                    "{WHERE_OPERATOR} cannot be combined with field criteria"
                )));
            }
            return Ok(Predicate::script(script.clone()));
        }

        let mut clauses = Vec::with_capacity(self.0.len());
        for (field, value) in &self.0 {
            if field.starts_with('$') {
                return Err(Error::InvalidQuery(format!(
                    "unsupported top-level operator {field}"
                )));
            }
            if let JsonValue::Object(inner) = value {
                if inner.keys().any(|k| k.starts_with('$')) {
                    return Err(Error::InvalidQuery(format!(
                        "operator expressions are not supported for field {field}"
                    )));
                }
            }
            clauses.push(FieldClause::new(field.clone(), value.clone()));
        }
        Ok(Predicate::fields(clauses))
    }
}

/// Fluent builder over [`QueryDocument`].
#[derive(Debug, Default)]
pub struct QueryDocumentBuilder {
    query: QueryDocument,
}

impl QueryDocumentBuilder {
    /// Start with an empty query.
    pub fn start() -> Self {
        Self::default()
    }

    /// Start with a single criterion.
    pub fn start_with(key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            query: QueryDocument::with(key, value),
        }
    }

    /// Start from a map of criteria.
    pub fn start_from<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<JsonValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            query: QueryDocument::from_map(entries),
        }
    }

    pub fn add(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.query.put(key, value);
        self
    }

    /// Same as [`add`](Self::add).
    pub fn append(self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.add(key, value)
    }

    pub fn get(self) -> QueryDocument {
        self.query
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
