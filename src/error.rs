use serde_json::{Map, Value};

use crate::wire::ErrorEnvelope;

const DEFAULT_MESSAGE: &str = "API request failed";
const UNKNOWN_CODE: &str = "UNKNOWN_ERROR";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Error type returned by this crate.
///
/// API failures are classified by HTTP status into a kind-tagged variant so
/// callers can branch on the variant instead of matching message strings.
#[derive(Debug, thiserror::Error)]
pub enum EkdSendError {
    /// Request rejected by server-side validation (HTTP 400).
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        /// Field-level errors keyed by field name.
        errors: Map<String, Value>,
        request_id: Option<String>,
    },
    /// API key missing, malformed or revoked (HTTP 401).
    #[error("authentication failed: {message}")]
    Authentication {
        message: String,
        request_id: Option<String>,
    },
    /// Resource does not exist (HTTP 404).
    #[error("not found: {message}")]
    NotFound {
        message: String,
        code: Option<String>,
        request_id: Option<String>,
    },
    /// Rate limit exceeded (HTTP 429).
    #[error("rate limited: {message} (retry after {retry_after}s)")]
    RateLimit {
        message: String,
        /// Seconds to wait before retrying, as reported by the API.
        retry_after: u64,
        request_id: Option<String>,
    },
    /// Any other non-2xx API response.
    #[error("api error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        code: String,
        request_id: Option<String>,
    },
    /// Network or request execution error from `reqwest`.
    #[error("connection error: {0}")]
    Connection(reqwest::Error),
    /// Request body could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(serde_json::Error),
    /// Successful response carried a body this crate could not decode.
    #[error("decode error: {0}")]
    Decode(String),
    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl EkdSendError {
    /// HTTP status associated with this error, if it came from an API response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { .. } => Some(400),
            Self::Authentication { .. } => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::RateLimit { .. } => Some(429),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Validation { .. } => Some("VALIDATION_ERROR"),
            Self::Authentication { .. } => Some("AUTHENTICATION_ERROR"),
            Self::NotFound { code, .. } => code.as_deref(),
            Self::RateLimit { .. } => Some("RATE_LIMIT_EXCEEDED"),
            Self::Api { code, .. } => Some(code),
            Self::Serialization(_) => Some("SERIALIZATION_ERROR"),
            Self::Connection(_) => Some("CONNECTION_ERROR"),
            _ => None,
        }
    }

    /// Correlation identifier echoed by the API (`x-request-id`), if present.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Validation { request_id, .. }
            | Self::Authentication { request_id, .. }
            | Self::NotFound { request_id, .. }
            | Self::RateLimit { request_id, .. }
            | Self::Api { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }
}

/// Maps a non-2xx response into the matching [`EkdSendError`] variant.
///
/// The body is expected to carry the `{"error": {...}}` envelope; any
/// deviation (malformed JSON, missing envelope, missing fields) degrades to
/// defaults instead of failing.
pub(crate) fn classify(status: u16, body: &str, request_id: Option<String>) -> EkdSendError {
    let envelope: ErrorEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) => {
            return EkdSendError::Api {
                status,
                message: DEFAULT_MESSAGE.to_owned(),
                code: UNKNOWN_CODE.to_owned(),
                request_id,
            }
        }
    };
    let error = envelope.error.unwrap_or_default();
    let message = error.message.unwrap_or_else(|| DEFAULT_MESSAGE.to_owned());

    match status {
        400 => EkdSendError::Validation {
            message,
            errors: error.details.unwrap_or_default(),
            request_id,
        },
        401 => EkdSendError::Authentication {
            message,
            request_id,
        },
        404 => EkdSendError::NotFound {
            message,
            code: error.code,
            request_id,
        },
        429 => EkdSendError::RateLimit {
            message,
            retry_after: error
                .retry_after
                .map(|secs| secs as u64)
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            request_id,
        },
        _ => EkdSendError::Api {
            status,
            message,
            code: error.code.unwrap_or_else(|| UNKNOWN_CODE.to_owned()),
            request_id,
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{classify, EkdSendError};

    fn body(value: serde_json::Value) -> String {
        value.to_string()
    }

    #[test]
    fn status_400_maps_to_validation_with_details() {
        let raw = body(json!({
            "error": {
                "message": "Invalid recipient",
                "code": "VALIDATION_ERROR",
                "details": { "to": "must be a valid email address" }
            }
        }));
        match classify(400, &raw, Some("req_1".into())) {
            EkdSendError::Validation {
                message,
                errors,
                request_id,
            } => {
                assert_eq!(message, "Invalid recipient");
                assert_eq!(
                    errors.get("to").and_then(|v| v.as_str()),
                    Some("must be a valid email address")
                );
                assert_eq!(request_id.as_deref(), Some("req_1"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn status_400_without_details_yields_empty_map() {
        let raw = body(json!({ "error": { "message": "bad request" } }));
        match classify(400, &raw, None) {
            EkdSendError::Validation { errors, .. } => assert!(errors.is_empty()),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn status_401_maps_to_authentication_and_ignores_body_code() {
        let raw = body(json!({
            "error": { "message": "Invalid API key", "code": "SOMETHING_ELSE" }
        }));
        let error = classify(401, &raw, None);
        match &error {
            EkdSendError::Authentication { message, .. } => {
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected authentication error, got {other:?}"),
        }
        assert_eq!(error.code(), Some("AUTHENTICATION_ERROR"));
        assert_eq!(error.status(), Some(401));
    }

    #[test]
    fn status_404_takes_message_and_code_from_body() {
        let raw = body(json!({
            "error": { "message": "Email not found", "code": "EMAIL_NOT_FOUND" }
        }));
        match classify(404, &raw, Some("req_2".into())) {
            EkdSendError::NotFound {
                message,
                code,
                request_id,
            } => {
                assert_eq!(message, "Email not found");
                assert_eq!(code.as_deref(), Some("EMAIL_NOT_FOUND"));
                assert_eq!(request_id.as_deref(), Some("req_2"));
            }
            other => panic!("expected not-found error, got {other:?}"),
        }
    }

    #[test]
    fn status_404_tolerates_absent_code() {
        let raw = body(json!({ "error": { "message": "gone" } }));
        match classify(404, &raw, None) {
            EkdSendError::NotFound { code, .. } => assert!(code.is_none()),
            other => panic!("expected not-found error, got {other:?}"),
        }
    }

    #[test]
    fn status_429_reads_retry_after_from_body() {
        let raw = body(json!({
            "error": { "message": "Too many requests", "retry_after": 5 }
        }));
        match classify(429, &raw, None) {
            EkdSendError::RateLimit {
                retry_after,
                message,
                ..
            } => {
                assert_eq!(retry_after, 5);
                assert_eq!(message, "Too many requests");
            }
            other => panic!("expected rate-limit error, got {other:?}"),
        }
    }

    #[test]
    fn status_429_defaults_retry_after_to_sixty() {
        let raw = body(json!({ "error": { "message": "slow down" } }));
        match classify(429, &raw, None) {
            EkdSendError::RateLimit { retry_after, .. } => assert_eq!(retry_after, 60),
            other => panic!("expected rate-limit error, got {other:?}"),
        }
        assert_eq!(
            classify(429, &raw, None).code(),
            Some("RATE_LIMIT_EXCEEDED")
        );
    }

    #[test]
    fn other_statuses_map_to_generic_api_error() {
        let raw = body(json!({
            "error": { "message": "upstream exploded", "code": "UPSTREAM_ERROR" }
        }));
        match classify(502, &raw, Some("req_3".into())) {
            EkdSendError::Api {
                status,
                message,
                code,
                request_id,
            } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream exploded");
                assert_eq!(code, "UPSTREAM_ERROR");
                assert_eq!(request_id.as_deref(), Some("req_3"));
            }
            other => panic!("expected generic api error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_degrades_to_generic_defaults() {
        match classify(500, "<html>Internal Server Error</html>", Some("req_4".into())) {
            EkdSendError::Api {
                status,
                message,
                code,
                request_id,
            } => {
                assert_eq!(status, 500);
                assert_eq!(message, "API request failed");
                assert_eq!(code, "UNKNOWN_ERROR");
                assert_eq!(request_id.as_deref(), Some("req_4"));
            }
            other => panic!("expected generic api error, got {other:?}"),
        }
    }

    #[test]
    fn valid_json_without_error_object_degrades_to_defaults() {
        let raw = body(json!({ "status": "error" }));
        match classify(503, &raw, None) {
            EkdSendError::Api { message, code, .. } => {
                assert_eq!(message, "API request failed");
                assert_eq!(code, "UNKNOWN_ERROR");
            }
            other => panic!("expected generic api error, got {other:?}"),
        }
    }

    #[test]
    fn fractional_retry_after_truncates_to_whole_seconds() {
        let raw = body(json!({ "error": { "retry_after": 2.9 } }));
        match classify(429, &raw, None) {
            EkdSendError::RateLimit { retry_after, .. } => assert_eq!(retry_after, 2),
            other => panic!("expected rate-limit error, got {other:?}"),
        }
    }
}
