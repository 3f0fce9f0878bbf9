//! Project tools.

use std::sync::Arc;

use retable_mcp_core::messages::{CreateProjectArgs, ProjectIdArgs};

use super::tool_names;
use crate::service::registry::{RegistryError, ToolRegistry};
use crate::traits::RetableBackend;

pub(super) fn register(
    registry: &mut ToolRegistry,
    backend: &Arc<dyn RetableBackend>,
) -> Result<(), RegistryError> {
    backend_tool!(
        registry,
        backend,
        tool_names::CREATE_PROJECT,
        "Create a Project under the given Workspace with a default Retable",
        |api, args: CreateProjectArgs| api.create_project(&args.workspace_id, &args.project)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::GET_PROJECT,
        "Get a specific Project with Retables",
        |api, args: ProjectIdArgs| api.get_project(&args.project_id)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::DELETE_PROJECT,
        "Delete a specific Project",
        |api, args: ProjectIdArgs| api.delete_project(&args.project_id)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::GET_PROJECT_TABLES,
        "Get tables in a project",
        |api, args: ProjectIdArgs| api.get_project_tables(&args.project_id)
    );
    Ok(())
}
