//! Workspace tools.

use std::sync::Arc;

use retable_mcp_core::messages::{NewWorkspace, NoArgs, WorkspaceIdArgs};

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
        tool_names::GET_WORKSPACE,
        "Get a specific Workspace and its Projects",
        |api, args: WorkspaceIdArgs| api.get_workspace(&args.workspace_id)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::GET_ALL_WORKSPACES,
        "Get user's all Workspaces",
        |api, _args: NoArgs| api.get_all_workspaces()
    );
    backend_tool!(
        registry,
        backend,
        tool_names::CREATE_WORKSPACE,
        "Create a new Workspace with a default Project",
        |api, args: NewWorkspace| api.create_workspace(&args)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::DELETE_WORKSPACE,
        "Delete a specific Workspace",
        |api, args: WorkspaceIdArgs| api.delete_workspace(&args.workspace_id)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::GET_WORKSPACE_PROJECTS,
        "Get projects in a workspace",
        |api, args: WorkspaceIdArgs| api.get_workspace_projects(&args.workspace_id)
    );
    Ok(())
}
