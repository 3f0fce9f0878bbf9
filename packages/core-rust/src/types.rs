use serde_json::{json, Value};

use crate::messages::mcp::{CallToolResult, Content, JSON_MIME_TYPE};

/// Outcome of one tool invocation.
///
/// Every invocation produces exactly one envelope. `Success` carries the
/// serialized handler result; `Error` carries a human-readable message and
/// renders as `{"error": message}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// The handler returned normally.
    Success(Value),
    /// Lookup, validation, or the handler failed.
    Error {
        /// Description of the failure.
        message: String,
    },
}

impl Envelope {
    /// Wraps a successful result.
    #[must_use]
    pub fn success(payload: Value) -> Self {
        Self::Success(payload)
    }

    /// Wraps a failure description.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Whether this envelope reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The payload as sent to the caller: the result itself on success,
    /// `{"error": message}` on failure.
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Self::Success(payload) => payload.clone(),
            Self::Error { message } => json!({ "error": message }),
        }
    }

    /// Renders the envelope as an MCP `tools/call` result: one JSON text block
    /// tagged with `isError`.
    #[must_use]
    pub fn into_call_result(self) -> CallToolResult {
        let is_error = self.is_error();
        let text = match self {
            Self::Success(payload) => payload.to_string(),
            Self::Error { message } => json!({ "error": message }).to_string(),
        };
        CallToolResult {
            content: vec![Content::Text {
                mime_type: Some(JSON_MIME_TYPE.to_string()),
                text,
            }],
            is_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_payload_is_the_result_itself() {
        let envelope = Envelope::success(json!({ "id": "p1", "name": "Sales" }));
        assert!(!envelope.is_error());
        assert_eq!(envelope.payload(), json!({ "id": "p1", "name": "Sales" }));
    }

    #[test]
    fn error_payload_wraps_message() {
        let envelope = Envelope::error("not found");
        assert!(envelope.is_error());
        assert_eq!(envelope.payload(), json!({ "error": "not found" }));
    }

    #[test]
    fn call_result_text_is_json_of_payload() {
        let result = Envelope::error("not found").into_call_result();
        assert!(result.is_error);
        let Content::Text { mime_type, text } = &result.content[0];
        assert_eq!(mime_type.as_deref(), Some("application/json"));
        let parsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed, json!({ "error": "not found" }));
    }
}
