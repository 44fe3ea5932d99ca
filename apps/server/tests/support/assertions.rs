use anyhow::Context as _;
use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::Value;

/// Parse a search response body as a JSON array of contacts.
pub fn contacts(body: &Bytes) -> anyhow::Result<Vec<Value>> {
    let value: Value = serde_json::from_slice(body).context("response body is JSON")?;
    value
        .as_array()
        .cloned()
        .context("response body is a JSON array")
}

/// `sharedWith` of every contact, in response order.
pub fn owners(contacts: &[Value]) -> Vec<String> {
    contacts
        .iter()
        .filter_map(|c| c.get("sharedWith").and_then(|v| v.as_str()))
        .map(String::from)
        .collect()
}

/// Assert status code matches expected
pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(
        actual, expected,
        "{context}: expected status {expected}, got {actual}"
    );
}

/// Assert an error body carries the given status and a message
pub fn assert_error_body(body: &Bytes, expected: StatusCode) -> anyhow::Result<String> {
    let value: Value = serde_json::from_slice(body).context("error body is JSON")?;
    assert_eq!(
        value.get("status").and_then(|v| v.as_u64()),
        Some(u64::from(expected.as_u16())),
        "error body status"
    );
    value
        .get("message")
        .and_then(|v| v.as_str())
        .map(String::from)
        .context("error body has message")
}
