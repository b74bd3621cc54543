use anyhow::Context as _;
use axum::http::StatusCode;
use serde_json::Value;

pub fn assert_status(actual: StatusCode, expected: StatusCode, operation: &str) {
    assert_eq!(actual, expected, "unexpected status for {operation}");
}

/// Assert the shared error body shape and return its message
pub fn assert_error_body(body: &[u8], expected_status: StatusCode) -> anyhow::Result<String> {
    let value: Value = serde_json::from_slice(body).context("parse error body")?;

    assert_eq!(
        value.get("status").and_then(|v| v.as_str()),
        expected_status.canonical_reason(),
        "error body status"
    );

    let message = value
        .get("message")
        .and_then(|v| v.as_str())
        .context("error body message is a string")?;

    Ok(message.to_string())
}
