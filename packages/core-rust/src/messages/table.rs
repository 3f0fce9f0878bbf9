//! Table, column and row tool arguments and request bodies.
//!
//! Outer argument keys are camelCase (`tableId`, `newRow`); the nested bodies
//! are sent to the API as-is and keep its snake_case keys (`column_id`,
//! `cell_value`, `row_ids`).

use serde::{Deserialize, Serialize};

use crate::schema::{ArgSchema, ObjectSchema};
use crate::traits::ToolArgs;

// ---------------------------------------------------------------------------
// Shared body fragments
// ---------------------------------------------------------------------------

/// A column definition: title and Retable column type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub title: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

impl ColumnSpec {
    fn schema() -> ObjectSchema {
        ObjectSchema::new()
            .required("title", ArgSchema::String)
            .required("type", ArgSchema::String)
    }
}

/// A cell value addressed by column id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellValue {
    pub column_id: String,
    pub cell_value: String,
}

/// A cell update addressed by column id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    pub column_id: String,
    pub update_cell_value: String,
}

// ---------------------------------------------------------------------------
// Single-table tools
// ---------------------------------------------------------------------------

/// Arguments of tools addressing a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableIdArgs {
    pub table_id: String,
}

impl ToolArgs for TableIdArgs {
    fn schema() -> ObjectSchema {
        ObjectSchema::new().required("tableId", ArgSchema::String)
    }
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Body of a column creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewColumns {
    pub columns: Vec<ColumnSpec>,
}

/// `add_column` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddColumnArgs {
    pub table_id: String,
    pub new_column: NewColumns,
}

impl ToolArgs for AddColumnArgs {
    fn schema() -> ObjectSchema {
        ObjectSchema::new()
            .required("tableId", ArgSchema::String)
            .required(
                "newColumn",
                ObjectSchema::new().required("columns", ArgSchema::array(ColumnSpec::schema())),
            )
    }
}

/// Body of a column deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnIds {
    pub column_ids: Vec<String>,
}

/// `delete_column` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteColumnArgs {
    pub table_id: String,
    pub columns: ColumnIds,
}

impl ToolArgs for DeleteColumnArgs {
    fn schema() -> ObjectSchema {
        ObjectSchema::new().required("tableId", ArgSchema::String).required(
            "columns",
            ObjectSchema::new().required("column_ids", ArgSchema::array(ArgSchema::String)),
        )
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Cells of one inserted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowData {
    pub columns: Vec<CellValue>,
}

/// Body of a row insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRows {
    pub columns: Vec<ColumnSpec>,
    pub data: Vec<RowData>,
}

/// `insert_row` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRowArgs {
    pub table_id: String,
    pub new_row: NewRows,
}

impl ToolArgs for InsertRowArgs {
    fn schema() -> ObjectSchema {
        let cell = ObjectSchema::new()
            .required("column_id", ArgSchema::String)
            .required("cell_value", ArgSchema::String);
        ObjectSchema::new().required("tableId", ArgSchema::String).required(
            "newRow",
            ObjectSchema::new()
                .required("columns", ArgSchema::array(ColumnSpec::schema()))
                .required(
                    "data",
                    ArgSchema::array(
                        ObjectSchema::new().required("columns", ArgSchema::array(cell)),
                    ),
                ),
        )
    }
}

/// One row update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowUpdate {
    pub row_id: i64,
    pub columns: Vec<CellUpdate>,
}

/// Body of a row update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowUpdates {
    pub rows: Vec<RowUpdate>,
}

/// `update_row` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRowArgs {
    pub table_id: String,
    pub new_row: RowUpdates,
}

impl ToolArgs for UpdateRowArgs {
    fn schema() -> ObjectSchema {
        let cell = ObjectSchema::new()
            .required("column_id", ArgSchema::String)
            .required("update_cell_value", ArgSchema::String);
        let row = ObjectSchema::new()
            .required("row_id", ArgSchema::Integer)
            .required("columns", ArgSchema::array(cell));
        ObjectSchema::new().required("tableId", ArgSchema::String).required(
            "newRow",
            ObjectSchema::new().required("rows", ArgSchema::array(row)),
        )
    }
}

/// Body of a row deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowIds {
    pub row_ids: Vec<i64>,
}

/// `delete_row` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRowArgs {
    pub table_id: String,
    pub rows: RowIds,
}

impl ToolArgs for DeleteRowArgs {
    fn schema() -> ObjectSchema {
        ObjectSchema::new().required("tableId", ArgSchema::String).required(
            "rows",
            ObjectSchema::new().required("row_ids", ArgSchema::array(ArgSchema::Integer)),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
