//! Request identification.
//!
//! Every request gets an `x-request-id` (UUID v4) unless the client sent one;
//! the same value is echoed on the response.

use axum::http::HeaderMap;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID from a header map, if present and valid UTF-8.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_request_id() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), None);

        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), Some("abc-123"));
    }
}
