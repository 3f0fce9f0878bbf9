//! Retable MCP server: Retable API adapter, tool registry, and MCP stdio transport.

pub mod backend;
pub mod cli;
pub mod network;
pub mod service;
pub mod traits;

pub use backend::{BackendConfig, BackendError, RetableClient};
pub use traits::RetableBackend;
