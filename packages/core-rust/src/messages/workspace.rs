//! Workspace tool arguments and request bodies.

use serde::{Deserialize, Serialize};

use crate::schema::{ArgSchema, ObjectSchema};
use crate::traits::ToolArgs;

/// Arguments of tools addressing a single workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceIdArgs {
    pub workspace_id: String,
}

impl ToolArgs for WorkspaceIdArgs {
    fn schema() -> ObjectSchema {
        ObjectSchema::new().required("workspaceId", ArgSchema::String)
    }
}

/// Arguments of tools that take no input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoArgs {}

impl ToolArgs for NoArgs {
    fn schema() -> ObjectSchema {
        ObjectSchema::new()
    }
}

/// Body of a workspace creation; also the `create_workspace` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorkspace {
    pub name: String,
    pub description: String,
}

impl ToolArgs for NewWorkspace {
    fn schema() -> ObjectSchema {
        ObjectSchema::new()
            .required("name", ArgSchema::String)
            .required("description", ArgSchema::String)
    }
}
