//! Pipeline composition: wraps the tool registry in the middleware stack.

use std::sync::Arc;

use tower::ServiceBuilder;

use super::metrics::{MetricsLayer, MetricsService};
use crate::service::registry::ToolRegistry;

/// The assembled tool-call service handed to the transport.
pub type ToolPipeline = MetricsService<Arc<ToolRegistry>>;

/// Build the tool-call pipeline around a shared registry.
///
/// There is one layer, `MetricsLayer`, which records timing and outcome. The
/// registry itself never fails, so the pipeline's error type is `Infallible`.
#[must_use]
pub fn build_tool_pipeline(registry: Arc<ToolRegistry>) -> ToolPipeline {
    ServiceBuilder::new().layer(MetricsLayer).service(registry)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use retable_mcp_core::messages::WorkspaceIdArgs;
    use retable_mcp_core::Envelope;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::service::operation::ToolCall;

    fn registry() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry
            .register("get_workspace", "lookup", |args: WorkspaceIdArgs| async move {
                Ok::<_, String>(json!({ "id": args.workspace_id }))
            })
            .unwrap();
        Arc::new(registry)
    }

    #[tokio::test]
    async fn pipeline_routes_through_registry() {
        let svc = build_tool_pipeline(registry());
        let call = ToolCall::new(1, "get_workspace", Some(json!({ "workspaceId": "w1" })));
        let envelope = svc.oneshot(call).await.unwrap();
        assert_eq!(envelope, Envelope::success(json!({ "id": "w1" })));
    }

    #[tokio::test]
    async fn pipeline_clones_share_the_registry() {
        let svc = build_tool_pipeline(registry());
        let first = svc.clone().oneshot(ToolCall::new(1, "missing", None));
        let second = svc.oneshot(ToolCall::new(2, "get_workspace", None));

        let (first, second) = tokio::join!(first, second);
        assert_eq!(first.unwrap(), Envelope::error("unknown tool: missing"));
        assert!(second.unwrap().is_error());
    }
}
