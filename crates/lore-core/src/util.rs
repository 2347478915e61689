//! Shared utility functions used across multiple modules.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::Error;

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Build a `Remote` error from a non-success API response.
///
/// The story service reports failures as `{"error": true, "message": "..."}`;
/// fall back to the raw body when the payload is not in that shape.
pub fn remote_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|payload| normalize_text_option(payload.message))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no error details provided".to_string()
            } else {
                compact_text(trimmed)
            }
        });

    Error::Remote {
        status: status.as_u16(),
        message,
    }
}
