//! Tool catalogue: one registered tool per Retable operation.
//!
//! Every tool is a thin forwarder: typed arguments in, one backend call, the
//! backend's JSON passed through. Validation and failure handling live in the
//! registry, so handlers here never see malformed input.

use std::sync::Arc;

use super::registry::{RegistryError, ToolRegistry};
use crate::traits::RetableBackend;

/// Registered tool names.
pub mod tool_names {
    pub const GET_WORKSPACE: &str = "get_workspace";
    pub const GET_ALL_WORKSPACES: &str = "get_all_workspaces";
    pub const CREATE_WORKSPACE: &str = "create_workspace";
    pub const DELETE_WORKSPACE: &str = "delete_workspace";
    pub const GET_WORKSPACE_PROJECTS: &str = "get_workspace_projects";
    pub const CREATE_PROJECT: &str = "create_project";
    pub const GET_PROJECT: &str = "get_project";
    pub const DELETE_PROJECT: &str = "delete_project";
    pub const GET_PROJECT_TABLES: &str = "get_project_tables";
    pub const CREATE_TABLE: &str = "create_table";
    pub const GET_TABLE: &str = "get_table";
    pub const ADD_COLUMN: &str = "add_column";
    pub const DELETE_COLUMN: &str = "delete_column";
    pub const GET_ROWS: &str = "get_rows";
    pub const INSERT_ROW: &str = "insert_row";
    pub const UPDATE_ROW: &str = "update_row";
    pub const DELETE_ROW: &str = "delete_row";
}

// ---------------------------------------------------------------------------
// Macro for repetitive forwarding handlers
// ---------------------------------------------------------------------------

/// Register a tool that forwards its typed arguments to one backend method.
macro_rules! backend_tool {
    (
        $registry:ident, $backend:ident, $name:expr, $description:expr,
        |$api:ident, $args:ident : $ty:ty| $call:expr
    ) => {{
        let backend = Arc::clone($backend);
        $registry.register($name, $description, move |$args: $ty| {
            let $api = Arc::clone(&backend);
            async move { $call.await }
        })?;
    }};
}

mod project;
mod table;
mod workspace;

/// Builds the full catalogue against `backend`, in listing order.
///
/// # Errors
///
/// Returns [`RegistryError::AlreadyRegistered`] if two tools share a name.
pub fn build_registry(backend: Arc<dyn RetableBackend>) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    workspace::register(&mut registry, &backend)?;
    project::register(&mut registry, &backend)?;
    table::register(&mut registry, &backend)?;
    tracing::debug!(tools = registry.len(), "tool catalogue built");
    Ok(registry)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use proptest::prelude::*;
    use retable_mcp_core::messages::{
        ColumnIds, NewColumns, NewProject, NewRows, NewWorkspace, RowIds, RowUpdates,
    };
    use retable_mcp_core::{ArgSchema, Envelope, ObjectSchema};
    use serde_json::{json, Value};

    use super::tool_names::*;
    use super::*;
    use crate::backend::BackendError;

    /// Backend double that records every call and answers with
    /// `{"op": <tool>, "input": <what it received>}` unless told otherwise.
    #[derive(Default)]
    struct StubBackend {
        calls: Mutex<Vec<(&'static str, Value)>>,
        responses: HashMap<&'static str, Value>,
        delays: HashMap<&'static str, Duration>,
        failure: Option<BackendError>,
    }

    impl StubBackend {
        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn last_call(&self) -> Option<(&'static str, Value)> {
            self.calls.lock().unwrap().last().cloned()
        }

        async fn respond(&self, op: &'static str, input: Value) -> Result<Value, BackendError> {
            self.calls.lock().unwrap().push((op, input.clone()));
            if let Some(delay) = self.delays.get(op) {
                tokio::time::sleep(*delay).await;
            }
            if let Some(err) = &self.failure {
                return Err(err.clone());
            }
            Ok(self
                .responses
                .get(op)
                .cloned()
                .unwrap_or_else(|| json!({ "op": op, "input": input })))
        }
    }

    fn to_json<T: serde::Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap()
    }

    #[async_trait]
    impl RetableBackend for StubBackend {
        async fn get_workspace(&self, workspace_id: &str) -> Result<Value, BackendError> {
            self.respond(GET_WORKSPACE, json!(workspace_id)).await
        }

        async fn get_all_workspaces(&self) -> Result<Value, BackendError> {
            self.respond(GET_ALL_WORKSPACES, Value::Null).await
        }

        async fn create_workspace(&self, workspace: &NewWorkspace) -> Result<Value, BackendError> {
            self.respond(CREATE_WORKSPACE, to_json(workspace)).await
        }

        async fn delete_workspace(&self, workspace_id: &str) -> Result<Value, BackendError> {
            self.respond(DELETE_WORKSPACE, json!(workspace_id)).await
        }

        async fn get_workspace_projects(&self, workspace_id: &str) -> Result<Value, BackendError> {
            self.respond(GET_WORKSPACE_PROJECTS, json!(workspace_id)).await
        }

        async fn create_project(
            &self,
            workspace_id: &str,
            project: &NewProject,
        ) -> Result<Value, BackendError> {
            self.respond(CREATE_PROJECT, json!([workspace_id, to_json(project)]))
                .await
        }

        async fn get_project(&self, project_id: &str) -> Result<Value, BackendError> {
            self.respond(GET_PROJECT, json!(project_id)).await
        }

        async fn delete_project(&self, project_id: &str) -> Result<Value, BackendError> {
            self.respond(DELETE_PROJECT, json!(project_id)).await
        }

        async fn get_project_tables(&self, project_id: &str) -> Result<Value, BackendError> {
            self.respond(GET_PROJECT_TABLES, json!(project_id)).await
        }

        async fn create_table(&self, project_id: &str) -> Result<Value, BackendError> {
            self.respond(CREATE_TABLE, json!(project_id)).await
        }

        async fn get_table(&self, table_id: &str) -> Result<Value, BackendError> {
            self.respond(GET_TABLE, json!(table_id)).await
        }

        async fn add_column(
            &self,
            table_id: &str,
            columns: &NewColumns,
        ) -> Result<Value, BackendError> {
            self.respond(ADD_COLUMN, json!([table_id, to_json(columns)]))
                .await
        }

        async fn delete_column(
            &self,
            table_id: &str,
            columns: &ColumnIds,
        ) -> Result<Value, BackendError> {
            self.respond(DELETE_COLUMN, json!([table_id, to_json(columns)]))
                .await
        }

        async fn get_rows(&self, table_id: &str) -> Result<Value, BackendError> {
            self.respond(GET_ROWS, json!(table_id)).await
        }

        async fn insert_row(&self, table_id: &str, rows: &NewRows) -> Result<Value, BackendError> {
            self.respond(INSERT_ROW, json!([table_id, to_json(rows)])).await
        }

        async fn update_row(
            &self,
            table_id: &str,
            rows: &RowUpdates,
        ) -> Result<Value, BackendError> {
            self.respond(UPDATE_ROW, json!([table_id, to_json(rows)])).await
        }

        async fn delete_row(&self, table_id: &str, rows: &RowIds) -> Result<Value, BackendError> {
            self.respond(DELETE_ROW, json!([table_id, to_json(rows)])).await
        }
    }

    const ALL_TOOLS: [&str; 17] = [
        GET_WORKSPACE,
        GET_ALL_WORKSPACES,
        CREATE_WORKSPACE,
        DELETE_WORKSPACE,
        GET_WORKSPACE_PROJECTS,
        CREATE_PROJECT,
        GET_PROJECT,
        DELETE_PROJECT,
        GET_PROJECT_TABLES,
        CREATE_TABLE,
        GET_TABLE,
        ADD_COLUMN,
        DELETE_COLUMN,
        GET_ROWS,
        INSERT_ROW,
        UPDATE_ROW,
        DELETE_ROW,
    ];

    /// A well-formed argument object for each tool.
    fn valid_arguments(tool: &str) -> Value {
        match tool {
            GET_WORKSPACE | DELETE_WORKSPACE | GET_WORKSPACE_PROJECTS => {
                json!({ "workspaceId": "w1" })
            }
            GET_ALL_WORKSPACES => json!({}),
            CREATE_WORKSPACE => json!({ "name": "Ops", "description": "d" }),
            CREATE_PROJECT => json!({
                "workspaceId": "w1",
                "name": "Sales",
                "description": "d",
                "color": "#fff"
            }),
            GET_PROJECT | DELETE_PROJECT | GET_PROJECT_TABLES | CREATE_TABLE => {
                json!({ "projectId": "p1" })
            }
            GET_TABLE | GET_ROWS => json!({ "tableId": "t1" }),
            ADD_COLUMN => json!({
                "tableId": "t1",
                "newColumn": { "columns": [{ "title": "Name", "type": "text" }] }
            }),
            DELETE_COLUMN => json!({ "tableId": "t1", "columns": { "column_ids": ["c1"] } }),
            INSERT_ROW => json!({
                "tableId": "t1",
                "newRow": {
                    "columns": [{ "title": "Name", "type": "text" }],
                    "data": [{ "columns": [{ "column_id": "c1", "cell_value": "Ada" }] }]
                }
            }),
            UPDATE_ROW => json!({
                "tableId": "t1",
                "newRow": {
                    "rows": [{
                        "row_id": 1,
                        "columns": [{ "column_id": "c1", "update_cell_value": "Grace" }]
                    }]
                }
            }),
            DELETE_ROW => json!({ "tableId": "t1", "rows": { "row_ids": [1, 2] } }),
            other => panic!("no fixture for {other}"),
        }
    }

    fn registry_with(stub: StubBackend) -> (ToolRegistry, Arc<StubBackend>) {
        let stub = Arc::new(stub);
        let registry = build_registry(Arc::clone(&stub) as Arc<dyn RetableBackend>).unwrap();
        (registry, stub)
    }

    #[test]
    fn catalogue_lists_every_tool_in_order() {
        let (registry, _) = registry_with(StubBackend::default());
        let names: Vec<_> = registry.list().into_iter().map(|t| t.name).collect();
        assert_eq!(names, ALL_TOOLS);
        assert!(registry
            .list()
            .iter()
            .all(|t| !t.description.is_empty() && t.input_schema["type"] == "object"));
    }

    #[tokio::test]
    async fn create_project_returns_backend_payload() {
        let stub = StubBackend {
            responses: HashMap::from([(CREATE_PROJECT, json!({ "id": "p1", "name": "Sales" }))]),
            ..StubBackend::default()
        };
        let (registry, stub) = registry_with(stub);

        let envelope = registry
            .invoke(CREATE_PROJECT, valid_arguments(CREATE_PROJECT))
            .await;
        assert_eq!(
            envelope,
            Envelope::success(json!({ "id": "p1", "name": "Sales" }))
        );
        assert_eq!(
            stub.last_call(),
            Some((
                CREATE_PROJECT,
                json!(["w1", { "name": "Sales", "description": "d", "color": "#fff" }])
            ))
        );
    }

    #[tokio::test]
    async fn delete_row_backend_failure_becomes_error_payload() {
        let stub = StubBackend {
            failure: Some(BackendError::Api {
                status: 404,
                message: "not found".to_string(),
            }),
            ..StubBackend::default()
        };
        let (registry, stub) = registry_with(stub);

        let envelope = registry
            .invoke(DELETE_ROW, json!({ "tableId": "t1", "rows": { "row_ids": [1, 2] } }))
            .await;
        assert!(envelope.is_error());
        assert_eq!(envelope.payload(), json!({ "error": "not found" }));
        assert_eq!(
            stub.last_call(),
            Some((DELETE_ROW, json!(["t1", { "row_ids": [1, 2] }])))
        );
    }

    #[tokio::test]
    async fn insert_row_without_new_row_never_reaches_backend() {
        let (registry, stub) = registry_with(StubBackend::default());

        let envelope = registry.invoke(INSERT_ROW, json!({ "tableId": "t1" })).await;
        assert!(envelope.is_error());
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn every_tool_round_trips_the_backend_result() {
        let (registry, stub) = registry_with(StubBackend::default());

        for tool in ALL_TOOLS {
            let envelope = registry.invoke(tool, valid_arguments(tool)).await;
            let (op, input) = stub.last_call().unwrap();
            assert_eq!(op, tool);
            assert_eq!(
                envelope,
                Envelope::success(json!({ "op": tool, "input": input })),
                "{tool}"
            );
        }
        assert_eq!(stub.call_count(), ALL_TOOLS.len());
    }

    #[tokio::test]
    async fn every_tool_reports_backend_failures() {
        let stub = StubBackend {
            failure: Some(BackendError::Transport("connection refused".to_string())),
            ..StubBackend::default()
        };
        let (registry, _) = registry_with(stub);

        for tool in ALL_TOOLS {
            let envelope = registry.invoke(tool, valid_arguments(tool)).await;
            assert!(envelope.is_error(), "{tool}");
            let message = envelope.payload()["error"].as_str().unwrap().to_string();
            assert!(message.contains("connection refused"), "{tool}: {message}");
        }
    }

    /// JSON pointers to every required field present in `value`, nested
    /// objects and array elements included.
    fn required_pointers(schema: &ObjectSchema, value: &Value, prefix: &str) -> Vec<String> {
        let mut pointers = Vec::new();
        for field in schema.fields() {
            let Some(present) = value.get(field.name) else {
                continue;
            };
            let pointer = format!("{prefix}/{}", field.name);
            if field.required {
                pointers.push(pointer.clone());
            }
            match &field.schema {
                ArgSchema::Object(nested) => {
                    pointers.extend(required_pointers(nested, present, &pointer));
                }
                ArgSchema::Array(item) => {
                    if let (ArgSchema::Object(nested), Some(elements)) =
                        (item.as_ref(), present.as_array())
                    {
                        for (index, element) in elements.iter().enumerate() {
                            pointers.extend(required_pointers(
                                nested,
                                element,
                                &format!("{pointer}/{index}"),
                            ));
                        }
                    }
                }
                ArgSchema::String | ArgSchema::Integer => {}
            }
        }
        pointers
    }

    #[tokio::test]
    async fn dropping_any_required_argument_skips_the_backend() {
        let (registry, stub) = registry_with(StubBackend::default());

        for tool in ALL_TOOLS {
            let valid = valid_arguments(tool);
            let pointers = required_pointers(registry.get(tool).unwrap().schema(), &valid, "");
            for pointer in pointers {
                let (parent, field) = pointer.rsplit_once('/').unwrap();
                let mut arguments = valid.clone();
                arguments
                    .pointer_mut(parent)
                    .and_then(Value::as_object_mut)
                    .unwrap()
                    .remove(field);
                let envelope = registry.invoke(tool, arguments).await;
                assert!(envelope.is_error(), "{tool} without {pointer}");
            }
            if tool != GET_ALL_WORKSPACES {
                assert!(registry.invoke(tool, json!({})).await.is_error(), "{tool}");
            }
        }
        assert_eq!(stub.call_count(), 0);
    }

    #[test]
    fn nested_required_fields_are_enumerated() {
        let (registry, _) = registry_with(StubBackend::default());
        let pointers = required_pointers(
            registry.get(UPDATE_ROW).unwrap().schema(),
            &valid_arguments(UPDATE_ROW),
            "",
        );
        assert_eq!(
            pointers,
            [
                "/tableId",
                "/newRow",
                "/newRow/rows",
                "/newRow/rows/0/row_id",
                "/newRow/rows/0/columns",
                "/newRow/rows/0/columns/0/column_id",
                "/newRow/rows/0/columns/0/update_cell_value",
            ]
        );
    }

    #[tokio::test]
    async fn whole_valued_float_row_ids_are_accepted() {
        let (registry, stub) = registry_with(StubBackend::default());

        let envelope = registry
            .invoke(
                DELETE_ROW,
                json!({ "tableId": "t1", "rows": { "row_ids": [1.0, 1e2] } }),
            )
            .await;
        assert!(!envelope.is_error(), "{envelope:?}");
        assert_eq!(
            stub.last_call(),
            Some((DELETE_ROW, json!(["t1", { "row_ids": [1, 100] }])))
        );

        let envelope = registry
            .invoke(
                DELETE_ROW,
                json!({ "tableId": "t1", "rows": { "row_ids": [1.5] } }),
            )
            .await;
        assert!(envelope.is_error());
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_calls_do_not_cross_talk() {
        let stub = StubBackend {
            delays: HashMap::from([
                (GET_WORKSPACE, Duration::from_millis(300)),
                (GET_PROJECT, Duration::from_millis(100)),
                (GET_TABLE, Duration::from_millis(200)),
                (GET_ROWS, Duration::from_millis(0)),
            ]),
            ..StubBackend::default()
        };
        let (registry, _) = registry_with(stub);

        let calls = [
            (GET_WORKSPACE, json!({ "workspaceId": "w9" })),
            (GET_PROJECT, json!({ "projectId": "p9" })),
            (GET_TABLE, json!({ "tableId": "t9" })),
            (GET_ROWS, json!({ "tableId": "t8" })),
        ];
        let envelopes = futures_util::future::join_all(
            calls
                .iter()
                .map(|(tool, arguments)| registry.invoke(tool, arguments.clone())),
        )
        .await;

        let expected = [
            json!({ "op": GET_WORKSPACE, "input": "w9" }),
            json!({ "op": GET_PROJECT, "input": "p9" }),
            json!({ "op": GET_TABLE, "input": "t9" }),
            json!({ "op": GET_ROWS, "input": "t8" }),
        ];
        for (envelope, payload) in envelopes.into_iter().zip(expected) {
            assert_eq!(envelope, Envelope::success(payload));
        }
    }

    proptest! {
        #[test]
        fn identifiers_reach_the_backend_verbatim(table_id in "\\PC{0,24}") {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let (registry, stub) = registry_with(StubBackend::default());

            let envelope = runtime.block_on(
                registry.invoke(GET_TABLE, json!({ "tableId": table_id.clone() })),
            );
            prop_assert!(!envelope.is_error());
            prop_assert_eq!(stub.last_call(), Some((GET_TABLE, json!(table_id))));
        }
    }
}
