//! Tool registration and execution.
//!
//! 1. **Catalogue** (`domain`): one tool per Retable operation
//! 2. **Registry** (`registry`): name lookup, argument validation, and the
//!    envelope failure boundary
//! 3. **Middleware** (`middleware`): Tower layers wrapped around the registry

pub mod config;
pub mod domain;
pub mod middleware;
pub mod operation;
pub mod registry;

pub use config::ServerConfig;
pub use domain::{build_registry, tool_names};
pub use middleware::{build_tool_pipeline, MetricsLayer, ToolPipeline};
pub use operation::{CallContext, OperationError, ToolCall};
pub use registry::{RegistryError, ToolDescriptor, ToolRegistry};
