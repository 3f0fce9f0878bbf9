//! `initialize` and `ping`.

use retable_mcp_core::messages::{
    error_codes, negotiate_protocol_version, Implementation, InitializeParams, InitializeResult,
    JsonRpcError, ServerCapabilities,
};
use serde_json::{json, Value};
use tracing::info;

use super::{to_result, AppState};

/// Answers `initialize` with the negotiated version, capabilities and identity.
pub(super) fn initialize(state: &AppState, params: Option<Value>) -> Result<Value, JsonRpcError> {
    let params = params
        .map(serde_json::from_value::<InitializeParams>)
        .transpose()
        .map_err(|e| JsonRpcError::new(error_codes::INVALID_PARAMS, format!("Invalid params: {e}")))?
        .unwrap_or_default();

    let version = negotiate_protocol_version(params.protocol_version.as_deref());
    match &params.client_info {
        Some(client) => info!(
            client = %client.name,
            client_version = %client.version,
            protocol_version = version,
            "client initialized"
        ),
        None => info!(protocol_version = version, "client initialized"),
    }

    to_result(&InitializeResult {
        protocol_version: version.to_string(),
        capabilities: ServerCapabilities {
            tools: json!({}),
            resources: json!({}),
        },
        server_info: Implementation {
            name: state.server.server_name.clone(),
            version: state.server.server_version.clone(),
        },
    })
}

#[allow(clippy::unnecessary_wraps)]
pub(super) fn ping() -> Result<Value, JsonRpcError> {
    Ok(json!({}))
}
