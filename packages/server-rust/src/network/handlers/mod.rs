//! JSON-RPC method handlers for the MCP stdio transport.
//!
//! This module defines `AppState` (the shared state every request task
//! carries) and [`handle_message`], which turns one input line into at most
//! one response.

pub mod lifecycle;
pub mod resources;
pub mod tools;

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use retable_mcp_core::messages::{
    error_codes, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId, JSONRPC_VERSION,
};
use serde_json::Value;
use tracing::debug;

use crate::service::{build_tool_pipeline, ServerConfig, ToolPipeline, ToolRegistry};

/// Shared state cloned into every request task.
///
/// Holds `Arc` references so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Tool-call pipeline (metrics layer around the registry).
    pub pipeline: ToolPipeline,
    /// The registry itself, for listing.
    pub registry: Arc<ToolRegistry>,
    /// Identity reported by `initialize`.
    pub server: Arc<ServerConfig>,
    /// Source of per-process call ids.
    pub call_ids: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>, server: ServerConfig) -> Self {
        Self {
            pipeline: build_tool_pipeline(Arc::clone(&registry)),
            registry,
            server: Arc::new(server),
            call_ids: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// Handles one line of input.
///
/// Returns `None` for notifications, which never get a response.
pub async fn handle_message(state: &AppState, line: &str) -> Option<JsonRpcResponse> {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "unparsable input line");
            return Some(JsonRpcResponse::failure(
                None,
                JsonRpcError::new(error_codes::PARSE_ERROR, format!("Parse error: {e}")),
            ));
        }
    };

    let request: JsonRpcRequest = match serde_json::from_value(value.clone()) {
        Ok(request) => request,
        Err(e) => {
            let id = value
                .get("id")
                .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());
            return Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::new(error_codes::INVALID_REQUEST, format!("Invalid request: {e}")),
            ));
        }
    };

    if request.jsonrpc != JSONRPC_VERSION {
        return Some(JsonRpcResponse::failure(
            request.id,
            JsonRpcError::new(
                error_codes::INVALID_REQUEST,
                format!("Invalid request: unsupported jsonrpc version {:?}", request.jsonrpc),
            ),
        ));
    }

    let Some(id) = request.id else {
        debug!(method = %request.method, "notification received");
        return None;
    };

    let outcome = match request.method.as_str() {
        "initialize" => lifecycle::initialize(state, request.params),
        "ping" => lifecycle::ping(),
        "tools/list" => tools::list(state),
        "tools/call" => tools::call(state, request.params).await,
        "resources/list" => resources::list(),
        other => Err(JsonRpcError::new(
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {other}"),
        )),
    };

    Some(match outcome {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(error) => JsonRpcResponse::failure(Some(id), error),
    })
}

/// Serializes a method result, mapping the (unreachable in practice) failure
/// to an internal error.
fn to_result<T: serde::Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value)
        .map_err(|e| JsonRpcError::new(error_codes::INTERNAL_ERROR, e.to_string()))
}
