//! Table, column and row tools.

use std::sync::Arc;

use retable_mcp_core::messages::{
    AddColumnArgs, DeleteColumnArgs, DeleteRowArgs, InsertRowArgs, ProjectIdArgs, TableIdArgs,
    UpdateRowArgs,
};

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
        tool_names::CREATE_TABLE,
        "Create new table in a project",
        |api, args: ProjectIdArgs| api.create_table(&args.project_id)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::GET_TABLE,
        "Get information about a specific Retable",
        |api, args: TableIdArgs| api.get_table(&args.table_id)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::ADD_COLUMN,
        "Create a new column on the specific Retable",
        |api, args: AddColumnArgs| api.add_column(&args.table_id, &args.new_column)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::DELETE_COLUMN,
        "Delete column from a specific Retable",
        |api, args: DeleteColumnArgs| api.delete_column(&args.table_id, &args.columns)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::GET_ROWS,
        "Get data in a table",
        |api, args: TableIdArgs| api.get_rows(&args.table_id)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::INSERT_ROW,
        "Insert a new row in a specific Retable",
        |api, args: InsertRowArgs| api.insert_row(&args.table_id, &args.new_row)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::UPDATE_ROW,
        "Update an existing row in a specific Retable",
        |api, args: UpdateRowArgs| api.update_row(&args.table_id, &args.new_row)
    );
    backend_tool!(
        registry,
        backend,
        tool_names::DELETE_ROW,
        "Delete rows from a specific Retable",
        |api, args: DeleteRowArgs| api.delete_row(&args.table_id, &args.rows)
    );
    Ok(())
}
