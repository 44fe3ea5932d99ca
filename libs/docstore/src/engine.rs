//! Script engines backing the `$where` operator
//!
//! The collection only talks to scripts through [`ScriptEngine`]; structured
//! predicates are evaluated without one.

use contactsdb_whereexpr::Expression;

use crate::document::Document;
use crate::error::Result;

/// Compiles `$where` source text into something that can test documents.
pub trait ScriptEngine: Send + Sync {
    /// Engine name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Parse `source`. Fails on malformed scripts.
    fn prepare(&self, source: &str) -> Result<Box<dyn PreparedScript>>;
}

/// A compiled script, evaluated once per document.
pub trait PreparedScript: Send {
    fn test(&self, document: &Document) -> Result<bool>;
}

/// Default engine, backed by `contactsdb-whereexpr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhereExprEngine;

impl ScriptEngine for WhereExprEngine {
    fn name(&self) -> &'static str {
        "whereexpr"
    }

    fn prepare(&self, source: &str) -> Result<Box<dyn PreparedScript>> {
        Ok(Box::new(Expression::parse(source)?))
    }
}

impl PreparedScript for Expression {
    fn test(&self, document: &Document) -> Result<bool> {
        Ok(Expression::test(self, &document.to_json())?)
    }
}
