//! Project tool arguments and request bodies.

use serde::{Deserialize, Serialize};

use crate::schema::{ArgSchema, ObjectSchema};
use crate::traits::ToolArgs;

/// Arguments of tools addressing a single project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdArgs {
    pub project_id: String,
}

impl ToolArgs for ProjectIdArgs {
    fn schema() -> ObjectSchema {
        ObjectSchema::new().required("projectId", ArgSchema::String)
    }
}

/// Body of a project creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub color: String,
}

/// `create_project` arguments: the owning workspace plus the project body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectArgs {
    pub workspace_id: String,
    #[serde(flatten)]
    pub project: NewProject,
}

impl ToolArgs for CreateProjectArgs {
    fn schema() -> ObjectSchema {
        ObjectSchema::new()
            .required("workspaceId", ArgSchema::String)
            .required("name", ArgSchema::String)
            .required("description", ArgSchema::String)
            .required("color", ArgSchema::String)
    }
}
