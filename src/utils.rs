//! # Utility Functions
//!
//! Request identifiers for log correlation and the shared CORS header set.

use chrono::Utc;
use uuid::Uuid;
use worker::Headers;

use crate::constants::{CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN};

/// Generates a unique identifier for a request.
///
/// # Returns
///
/// Returns a string identifier in the format: `{timestamp}-{uuid}`, sortable
/// by creation time.
///
/// # Example
///
/// ```rust
/// let request_id = generate_unique_identifier();
/// // Returns: "1641987000000-550e8400-e29b-41d4-a716-446655440000"
/// ```
pub fn generate_unique_identifier() -> String {
    let uuid_part = Uuid::new_v4().to_string();
    let timestamp = Utc::now().timestamp_millis();
    format!("{}-{}", timestamp, uuid_part)
}

/// Creates HTTP headers for Cross-Origin Resource Sharing (CORS) support.
///
/// The pages consuming this service may be hosted on another origin, so
/// every response allows `*` with `GET` and `OPTIONS`.
pub fn cors_headers() -> Headers {
    let headers = Headers::new();
    // Note: These values are known to be valid
    let _ = headers.set("Access-Control-Allow-Origin", CORS_ALLOW_ORIGIN);
    let _ = headers.set("Access-Control-Allow-Methods", CORS_ALLOW_METHODS);
    let _ = headers.set("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS);
    headers
}
