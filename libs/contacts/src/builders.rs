//! Search predicate construction
//!
//! One function per mode, each dispatching to the construction API named by
//! the [`QueryVariant`]. Map-based variants go through a `HashMap`, so the
//! secure family re-checks the clause count after lowering.

use std::collections::HashMap;

use contactsdb_docstore::{
    filters, Predicate, QueryDocument, QueryDocumentBuilder, WHERE_OPERATOR,
};

use crate::error::{Error, Result};
use crate::variant::{QueryMode, QueryVariant};
use crate::{EMAIL_FIELD, OWNER_FIELD};

/// Number of equality clauses every secure search must bind.
const SECURE_CLAUSES: usize = 2;

/// The `$where` script shared by every insecure variant. Both inputs are
/// concatenated verbatim between double quotes.
pub fn ownership_script(identity: &str, term: &str) -> String {
    format!("this.{OWNER_FIELD} == \"{identity}\" && this.{EMAIL_FIELD} == \"{term}\"")
}

/// Build the predicate for one search.
pub fn build_predicate(
    mode: QueryMode,
    variant: QueryVariant,
    identity: &str,
    term: &str,
) -> Result<Predicate> {
    if !variant.supports(mode) {
        return Err(Error::UnsupportedVariant { mode, variant });
    }

    let predicate = match mode {
        QueryMode::Insecure => insecure_query(variant, identity, term)?.to_predicate()?,
        QueryMode::Secure => {
            let predicate = secure_predicate(variant, identity, term)?;
            predicate.ensure_clause_count(SECURE_CLAUSES)?;
            predicate
        }
    };

    tracing::trace!(
        mode = mode.as_str(),
        variant = variant.slug(),
        predicate = ?predicate,
        "Search predicate built"
    );
    Ok(predicate)
}

fn insecure_query(variant: QueryVariant, identity: &str, term: &str) -> Result<QueryDocument> {
    let script = ownership_script(identity, term);

    let query = match variant {
        QueryVariant::Put => {
            let mut query = QueryDocument::new();
            query.put(WHERE_OPERATOR, script);
            query
        }
        QueryVariant::PutAll => {
            let mut query = QueryDocument::new();
            query.put_all(HashMap::from([(WHERE_OPERATOR, script)]));
            query
        }
        QueryVariant::Append => QueryDocument::new().append(WHERE_OPERATOR, script),
        QueryVariant::ConstructorKv => QueryDocument::with(WHERE_OPERATOR, script),
        QueryVariant::ConstructorMap => {
            QueryDocument::from_map(HashMap::from([(WHERE_OPERATOR, script)]))
        }
        QueryVariant::Parse => parse_map(&HashMap::from([(WHERE_OPERATOR, script)]))?,
        QueryVariant::BuilderAdd => QueryDocumentBuilder::start()
            .add(WHERE_OPERATOR, script)
            .get(),
        QueryVariant::BuilderAppend => QueryDocumentBuilder::start()
            .append(WHERE_OPERATOR, script)
            .get(),
        QueryVariant::BuilderStartKv => QueryDocumentBuilder::start_with(WHERE_OPERATOR, script).get(),
        QueryVariant::BuilderStartMap => {
            QueryDocumentBuilder::start_from(HashMap::from([(WHERE_OPERATOR, script)])).get()
        }
        QueryVariant::BsonFilter => {
            return Err(Error::UnsupportedVariant {
                mode: QueryMode::Insecure,
                variant,
            })
        }
    };
    Ok(query)
}

fn secure_predicate(variant: QueryVariant, identity: &str, term: &str) -> Result<Predicate> {
    let criteria = || HashMap::from([(OWNER_FIELD, identity), (EMAIL_FIELD, term)]);

    let query = match variant {
        QueryVariant::BsonFilter => {
            return Ok(filters::and([
                filters::eq(OWNER_FIELD, identity),
                filters::eq(EMAIL_FIELD, term),
            ])
            .into_predicate())
        }
        QueryVariant::Put => {
            let mut query = QueryDocument::new();
            query.put(OWNER_FIELD, identity);
            query.put(EMAIL_FIELD, term);
            query
        }
        QueryVariant::PutAll => {
            let mut query = QueryDocument::new();
            query.put_all(criteria());
            query
        }
        QueryVariant::Append => QueryDocument::new()
            .append(OWNER_FIELD, identity)
            .append(EMAIL_FIELD, term),
        QueryVariant::ConstructorKv => {
            QueryDocument::with(OWNER_FIELD, identity).append(EMAIL_FIELD, term)
        }
        QueryVariant::ConstructorMap => QueryDocument::from_map(criteria()),
        QueryVariant::Parse => parse_map(&criteria())?,
        QueryVariant::BuilderAdd => QueryDocumentBuilder::start()
            .add(OWNER_FIELD, identity)
            .add(EMAIL_FIELD, term)
            .get(),
        QueryVariant::BuilderAppend => QueryDocumentBuilder::start()
            .append(OWNER_FIELD, identity)
            .append(EMAIL_FIELD, term)
            .get(),
        QueryVariant::BuilderStartKv => QueryDocumentBuilder::start_with(OWNER_FIELD, identity)
            .add(EMAIL_FIELD, term)
            .get(),
        QueryVariant::BuilderStartMap => QueryDocumentBuilder::start_from(criteria()).get(),
    };
    Ok(query.to_predicate()?)
}

/// Serialize a criteria map to JSON text and parse it back.
fn parse_map<V: serde::Serialize>(criteria: &HashMap<&str, V>) -> Result<QueryDocument> {
    let json = serde_json::to_string(criteria).map_err(contactsdb_docstore::Error::from)?;
    Ok(QueryDocument::parse(&json)?)
}
