use async_trait::async_trait;
use retable_mcp_core::messages::{
    ColumnIds, NewColumns, NewProject, NewRows, NewWorkspace, RowIds, RowUpdates,
};
use serde_json::Value;

use crate::backend::BackendError;

/// Capability interface onto the Retable data API.
///
/// One method per exposed tool. Arguments are already validated and typed;
/// the remote JSON body is returned uninterpreted. Implementations hold no
/// state beyond their credential and make exactly one remote call per method,
/// with no retries or caching, so a failure here is the remote failure.
#[async_trait]
pub trait RetableBackend: Send + Sync {
    // ----- Workspaces -----

    /// Fetch a workspace and its projects.
    async fn get_workspace(&self, workspace_id: &str) -> Result<Value, BackendError>;

    /// Fetch every workspace visible to the credential.
    async fn get_all_workspaces(&self) -> Result<Value, BackendError>;

    /// Create a workspace with a default project.
    async fn create_workspace(&self, workspace: &NewWorkspace) -> Result<Value, BackendError>;

    /// Delete a workspace.
    async fn delete_workspace(&self, workspace_id: &str) -> Result<Value, BackendError>;

    /// List the projects of a workspace.
    async fn get_workspace_projects(&self, workspace_id: &str) -> Result<Value, BackendError>;

    // ----- Projects -----

    /// Create a project under a workspace with a default table.
    async fn create_project(
        &self,
        workspace_id: &str,
        project: &NewProject,
    ) -> Result<Value, BackendError>;

    /// Fetch a project with its tables.
    async fn get_project(&self, project_id: &str) -> Result<Value, BackendError>;

    /// Delete a project.
    async fn delete_project(&self, project_id: &str) -> Result<Value, BackendError>;

    /// List the tables of a project.
    async fn get_project_tables(&self, project_id: &str) -> Result<Value, BackendError>;

    // ----- Tables -----

    /// Create a table in a project.
    async fn create_table(&self, project_id: &str) -> Result<Value, BackendError>;

    /// Fetch table metadata.
    async fn get_table(&self, table_id: &str) -> Result<Value, BackendError>;

    /// Add columns to a table.
    async fn add_column(&self, table_id: &str, columns: &NewColumns)
        -> Result<Value, BackendError>;

    /// Delete columns from a table.
    async fn delete_column(&self, table_id: &str, columns: &ColumnIds)
        -> Result<Value, BackendError>;

    /// Fetch the rows of a table.
    async fn get_rows(&self, table_id: &str) -> Result<Value, BackendError>;

    /// Insert rows into a table.
    async fn insert_row(&self, table_id: &str, rows: &NewRows) -> Result<Value, BackendError>;

    /// Update cells of existing rows.
    async fn update_row(&self, table_id: &str, rows: &RowUpdates) -> Result<Value, BackendError>;

    /// Delete rows by id.
    async fn delete_row(&self, table_id: &str, rows: &RowIds) -> Result<Value, BackendError>;
}
