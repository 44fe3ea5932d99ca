//! Contact search routes
//!
//! One route shape covers every mode and variant:
//!
//! - `GET /insecure/{variant}/contacts/search?email=..`
//! - `GET /secure/{variant}/contacts/search?email=..`
//!
//! Unknown modes, unknown variants and `bson-filter` under `/insecure` are
//! rejected by the handler with 404.

use crate::api::handlers::search;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn contacts_routes() -> Router<AppState> {
    Router::new().route(
        "/:mode/:variant/contacts/search",
        get(search::search_contacts),
    )
}
