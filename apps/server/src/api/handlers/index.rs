//! Endpoint listings

use axum::{
    extract::State,
    response::{Html, IntoResponse, Json},
};
use contactsdb_contacts::{QueryMode, QueryVariant};
use serde::Serialize;
use serde_json::json;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SearchEndpoint {
    pub mode: QueryMode,
    pub variant: QueryVariant,
    pub description: &'static str,
    pub path: String,
}

/// Every search endpoint, insecure first.
pub fn search_endpoints() -> Vec<SearchEndpoint> {
    QueryMode::ALL
        .into_iter()
        .flat_map(|mode| {
            mode.variants().map(move |variant| SearchEndpoint {
                mode,
                variant,
                description: variant.description(),
                path: format!("/{}/{}/contacts/search", mode.as_str(), variant.slug()),
            })
        })
        .collect()
}

/// `GET /`
pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "server": "contacts-server",
        "version": env!("CARGO_PKG_VERSION"),
        "database": state.config.store.database,
        "collection": state.config.store.collection,
        "authRealm": state.config.auth.realm,
        "endpoints": search_endpoints()
    }))
}

/// `GET /index.html`
pub async fn index_html() -> Html<String> {
    let mut items = String::new();
    for endpoint in search_endpoints() {
        items.push_str(&format!(
            "<li><a href=\"{path}?email=contact1@private.info\">{path}</a> ({desc})</li>\n",
            path = endpoint.path,
            desc = endpoint.description
        ));
    }
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Contacts search</title></head>\n<body>\n\
         <h1>Contacts search</h1>\n<ul>\n{items}</ul>\n</body>\n</html>\n"
    ))
}
