use serde_json::Value;

/// One backend reply. The backend never promises a shape: sometimes a
/// structured object, sometimes prose, sometimes JSON stuffed in a string.
#[derive(Debug, Clone)]
pub enum RawResponse {
    Structured(Value),
    Text(String),
}

impl RawResponse {
    /// Best-effort coercion of any JSON value into a response. Non-object,
    /// non-string payloads are stringified rather than rejected.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => RawResponse::Text(text),
            Value::Object(_) | Value::Array(_) => RawResponse::Structured(value),
            other => RawResponse::Text(other.to_string()),
        }
    }

    /// Approximate payload size, recorded per iteration.
    pub fn byte_len(&self) -> usize {
        match self {
            RawResponse::Structured(value) => value.to_string().len(),
            RawResponse::Text(text) => text.len(),
        }
    }
}
