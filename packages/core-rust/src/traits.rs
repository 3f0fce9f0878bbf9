use serde::de::DeserializeOwned;

use crate::schema::ObjectSchema;

/// Strongly typed arguments of one tool.
///
/// `schema()` describes exactly the shape `Deserialize` accepts, so a value
/// that passes validation always deserializes.
pub trait ToolArgs: DeserializeOwned + Send + 'static {
    /// Structural schema checked before deserialization and advertised as
    /// the tool's `inputSchema`.
    fn schema() -> ObjectSchema;
}
