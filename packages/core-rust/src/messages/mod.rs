//! Wire messages for the MCP stdio protocol and typed tool arguments.
//!
//! - [`jsonrpc`]: JSON-RPC 2.0 request/response framing
//! - [`mcp`]: MCP method payloads (`initialize`, `tools/*`, `resources/list`)
//! - [`workspace`], [`project`], [`table`]: per-domain tool arguments and the
//!   request bodies forwarded to the Retable API

pub mod jsonrpc;
pub mod mcp;

pub mod project;
pub mod table;
pub mod workspace;

pub use jsonrpc::{
    error_codes, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId, JSONRPC_VERSION,
};

pub use mcp::{
    negotiate_protocol_version, CallToolParams, CallToolResult, Content, Implementation,
    InitializeParams, InitializeResult, ListResourcesResult, ListToolsResult, ServerCapabilities,
    ToolInfo, JSON_MIME_TYPE, SUPPORTED_PROTOCOL_VERSIONS,
};

pub use project::{CreateProjectArgs, NewProject, ProjectIdArgs};

pub use table::{
    AddColumnArgs, CellUpdate, CellValue, ColumnIds, ColumnSpec, DeleteColumnArgs, DeleteRowArgs,
    InsertRowArgs, NewColumns, NewRows, RowData, RowIds, RowUpdate, RowUpdates, TableIdArgs,
    UpdateRowArgs,
};

pub use workspace::{NewWorkspace, NoArgs, WorkspaceIdArgs};
