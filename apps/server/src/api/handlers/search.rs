//! Contact search handler
//!
//! `GET /{mode}/{variant}/contacts/search?email={term}` returns the contacts
//! shared with the authenticated caller whose e-mail equals `term`, as a JSON
//! array of documents in collection order.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use contactsdb_contacts::{QueryMode, QueryVariant};
use contactsdb_docstore::Document;
use serde::Deserialize;

use crate::{auth::AuthenticatedPrincipal, metrics, state::AppState, Error, Result};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub email: Option<String>,
}

pub async fn search_contacts(
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    State(state): State<AppState>,
    Path((mode, variant)): Path<(String, String)>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Document>>> {
    let (mode, variant) = resolve_route(&mode, &variant)?;
    let email = params.email.ok_or(Error::MissingParameter("email"))?;

    match state.contacts.search(mode, variant, &principal.name, &email) {
        Ok(documents) => {
            tracing::debug!(
                mode = mode.as_str(),
                variant = variant.slug(),
                principal = %principal.name,
                results = documents.len(),
                "Search completed"
            );
            metrics::record_search(mode, variant, "success", Some(documents.len()));
            Ok(Json(documents))
        }
        Err(e) => {
            let err = Error::from(e);
            let status = if err.status().is_client_error() {
                "client_error"
            } else {
                "server_error"
            };
            metrics::record_search(mode, variant, status, None);
            Err(err)
        }
    }
}

/// Resolve path segments to a mode and a variant available in that mode.
fn resolve_route(mode: &str, variant: &str) -> Result<(QueryMode, QueryVariant)> {
    let mode: QueryMode = mode.parse().map_err(Error::NotFound)?;
    let variant = QueryVariant::from_slug(variant)
        .filter(|v| v.supports(mode))
        .ok_or_else(|| Error::NotFound(format!("no variant '{variant}' in {mode} mode")))?;
    Ok((mode, variant))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_route() {
        assert_eq!(
            resolve_route("secure", "bson-filter").unwrap(),
            (QueryMode::Secure, QueryVariant::BsonFilter)
        );
        assert_eq!(
            resolve_route("insecure", "basicdbobject-parse").unwrap(),
            (QueryMode::Insecure, QueryVariant::Parse)
        );
        assert!(matches!(
            resolve_route("insecure", "bson-filter"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            resolve_route("public", "basicdbobject-put"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            resolve_route("secure", "basicdbobject"),
            Err(Error::NotFound(_))
        ));
    }
}
