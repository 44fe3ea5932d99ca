//! Request ID middleware

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::time::Instant;
use tracing::Span;

use crate::request_context::RequestContext;

/// Opens a span per request and assigns it a server request id.
///
/// - The id is returned in `x-request-id`
/// - A client-supplied `x-request-id` is echoed back in `x-correlation-id`
/// - Search requests record their mode and variant on the span
#[tracing::instrument(
    name = "http_request",
    skip_all,
    fields(
        http.method = %req.method(),
        http.route = %req.uri().path(),
        http.response.status_code = tracing::field::Empty,
        search.mode = tracing::field::Empty,
        search.variant = tracing::field::Empty,
        request_id = tracing::field::Empty,
    )
)]
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let current_span = Span::current();
    let start = Instant::now();

    let client_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let context = RequestContext::generate();
    let server_id = context.request_id.clone();
    current_span.record("request_id", server_id.as_str());
    req.extensions_mut().insert(context);

    let path = req.uri().path().to_string();
    let method = req.method().clone();
    if let Some((mode, variant)) = crate::metrics::extract_search_route(&path) {
        current_span.record("search.mode", mode.as_str());
        current_span.record("search.variant", variant.as_str());
    }

    tracing::debug!(method = %method, path = %path, "Incoming request");

    let mut response = next.run(req).await;

    let status = response.status();
    current_span.record("http.response.status_code", status.as_u16());
    tracing::info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&server_id) {
        headers.insert("x-request-id", value);
    }
    if let Some(client_id) = client_id {
        if client_id != server_id {
            if let Ok(value) = HeaderValue::from_str(&client_id) {
                headers.insert("x-correlation-id", value);
            }
        }
    }

    response
}
