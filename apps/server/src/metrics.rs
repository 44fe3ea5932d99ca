//! Metrics collection for the contacts server
//!
//! Prometheus metrics registered in the default registry and exposed at
//! `/metrics`.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    register_int_gauge_vec, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec,
};

use contactsdb_contacts::{QueryMode, QueryVariant};

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "contacts_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "contacts_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// In-flight HTTP requests
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "contacts_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    /// Rejected authentication attempts
    pub static ref AUTH_FAILURES_TOTAL: IntCounter = register_int_counter!(
        "contacts_auth_failures_total",
        "Total number of requests rejected by authentication"
    )
    .expect("Failed to register AUTH_FAILURES_TOTAL");

    // Search Metrics

    /// Contact searches by mode, variant and outcome
    pub static ref CONTACTS_SEARCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "contacts_search_total",
        "Total number of contact searches",
        &["mode", "variant", "status"]
    )
    .expect("Failed to register CONTACTS_SEARCH_TOTAL");

    /// Documents returned per search
    pub static ref CONTACTS_SEARCH_RESULTS: HistogramVec = register_histogram_vec!(
        "contacts_search_results",
        "Number of contacts returned by search",
        &["mode"],
        vec![0.0, 1.0, 2.0, 3.0, 5.0, 10.0, 100.0]
    )
    .expect("Failed to register CONTACTS_SEARCH_RESULTS");

    /// Documents in the contacts collection, sampled at scrape time
    pub static ref CONTACTS_COLLECTION_DOCUMENTS: IntGauge = register_int_gauge!(
        "contacts_collection_documents",
        "Number of documents in the contacts collection"
    )
    .expect("Failed to register CONTACTS_COLLECTION_DOCUMENTS");
}

/// Record the outcome of one search.
pub fn record_search(mode: QueryMode, variant: QueryVariant, status: &str, results: Option<usize>) {
    CONTACTS_SEARCH_TOTAL
        .with_label_values(&[mode.as_str(), variant.slug(), status])
        .inc();
    if let Some(results) = results {
        CONTACTS_SEARCH_RESULTS
            .with_label_values(&[mode.as_str()])
            .observe(results as f64);
    }
}

/// Split a search path into its mode and variant segments.
///
/// `/insecure/basicdbobject-put/contacts/search` →
/// `Some(("insecure", "basicdbobject-put"))`
pub fn extract_search_route(path: &str) -> Option<(String, String)> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [mode, variant, "contacts", "search"] => Some((mode.to_string(), variant.to_string())),
        _ => None,
    }
}

/// Map a request path to a bounded label.
///
/// Known search routes keep their mode and variant; any other unknown path
/// collapses to `/other`.
pub fn sanitize_path(path: &str) -> String {
    if let Some((mode, variant)) = extract_search_route(path) {
        let known = mode.parse::<QueryMode>().is_ok() && QueryVariant::from_slug(&variant).is_some();
        return if known {
            format!("/{mode}/{variant}/contacts/search")
        } else {
            "/{mode}/{variant}/contacts/search".to_string()
        };
    }

    match path {
        "/" | "/health" | "/metrics" | "/index.html" => path.to_string(),
        _ => "/other".to_string(),
    }
}
