use serde::Deserialize;
use serde_json::{Map, Value};

/// Failure envelope returned by the API on non-2xx responses:
/// `{ "error": { "message", "code", "details"?, "retry_after"? } }`.
///
/// Every field is optional on the wire; absence degrades to defaults in the
/// classifier rather than failing the parse.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    /// Field-level validation errors (400 only).
    #[serde(default)]
    pub details: Option<Map<String, Value>>,
    /// Seconds to wait before retrying (429 only).
    #[serde(default)]
    pub retry_after: Option<f64>,
}
