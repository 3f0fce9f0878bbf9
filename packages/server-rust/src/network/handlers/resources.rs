//! `resources/list`. The capability is advertised but nothing is exposed.

use retable_mcp_core::messages::{JsonRpcError, ListResourcesResult};
use serde_json::Value;

use super::to_result;

pub(super) fn list() -> Result<Value, JsonRpcError> {
    to_result(&ListResourcesResult::default())
}
