use retable_mcp_core::ValidationError;
use serde_json::Value;

/// Context carried with every tool call through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Per-process monotonically increasing call identifier.
    pub call_id: u64,
    /// Name of the tool being invoked.
    pub tool_name: String,
}

/// One invocation request: a tool name plus its raw argument bag.
///
/// Created per incoming `tools/call` and discarded once its envelope is
/// produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub ctx: CallContext,
    pub arguments: Value,
}

impl ToolCall {
    /// Creates a call. `arguments` of `None` is treated as an empty object.
    #[must_use]
    pub fn new(call_id: u64, tool_name: impl Into<String>, arguments: Option<Value>) -> Self {
        Self {
            ctx: CallContext {
                call_id,
                tool_name: tool_name.into(),
            },
            arguments: arguments.unwrap_or_else(|| Value::Object(serde_json::Map::new())),
        }
    }

    /// Returns the call context.
    #[must_use]
    pub fn ctx(&self) -> &CallContext {
        &self.ctx
    }
}

/// Every way an invocation can fail inside the registry.
///
/// These never escape `ToolRegistry::invoke`; each is rendered into an error
/// envelope using its `Display` text.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },
    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: ValidationError,
    },
    #[error("invalid arguments for {tool}: {message}")]
    Deserialize { tool: &'static str, message: String },
    /// The handler's own failure; displays as the handler's message verbatim.
    #[error("{message}")]
    Handler { message: String },
    #[error("failed to serialize result of {tool}: {message}")]
    Serialize { tool: &'static str, message: String },
    #[error("tool {tool} panicked: {message}")]
    Panicked { tool: &'static str, message: String },
}
