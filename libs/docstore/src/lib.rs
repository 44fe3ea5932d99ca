//! Embedded document store
//!
//! A deliberately small document database used to compare two ways of
//! querying the same data:
//!
//! - **Structured predicates**: named-field equality clauses whose values are
//!   literals. Values never change the shape of the query.
//! - **`$where` predicates**: a script string evaluated per document by a
//!   [`ScriptEngine`]. Anything spliced into the string becomes code.
//!
//! Queries are described either through the generic [`QueryDocument`]
//! container (mirroring a map-shaped driver API) or through the native
//! [`filters`] combinators. Both lower to a [`Predicate`], which a
//! [`Collection`] executes.

pub mod collection;
pub mod document;
pub mod engine;
pub mod error;
pub mod filters;
pub mod predicate;
pub mod query;
pub mod store;

pub use collection::Collection;
pub use document::Document;
pub use engine::{PreparedScript, ScriptEngine, WhereExprEngine};
pub use error::{Error, Result};
pub use filters::Filter;
pub use predicate::{FieldClause, Predicate};
pub use query::{QueryDocument, QueryDocumentBuilder, WHERE_OPERATOR};
pub use store::{Database, EmbeddedStore, StoreOptions};
