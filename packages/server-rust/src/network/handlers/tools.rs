//! `tools/list` and `tools/call`.

use std::sync::atomic::Ordering;

use retable_mcp_core::messages::{error_codes, CallToolParams, JsonRpcError, ListToolsResult};
use serde_json::Value;
use tower::ServiceExt;

use super::{to_result, AppState};
use crate::service::ToolCall;

/// Every registered tool, in registration order.
pub(super) fn list(state: &AppState) -> Result<Value, JsonRpcError> {
    to_result(&ListToolsResult {
        tools: state.registry.list(),
    })
}

/// Runs one tool through the pipeline.
///
/// Only malformed params are a protocol error; every tool-level failure,
/// unknown names included, comes back as an error result with `isError`.
pub(super) async fn call(state: &AppState, params: Option<Value>) -> Result<Value, JsonRpcError> {
    let params: CallToolParams = params
        .ok_or_else(|| JsonRpcError::new(error_codes::INVALID_PARAMS, "Invalid params: missing"))
        .and_then(|params| {
            serde_json::from_value(params).map_err(|e| {
                JsonRpcError::new(error_codes::INVALID_PARAMS, format!("Invalid params: {e}"))
            })
        })?;

    let call_id = state.call_ids.fetch_add(1, Ordering::Relaxed) + 1;
    let call = ToolCall::new(call_id, params.name, params.arguments);
    let envelope = match state.pipeline.clone().oneshot(call).await {
        Ok(envelope) => envelope,
        Err(never) => match never {},
    };

    to_result(&envelope.into_call_result())
}
