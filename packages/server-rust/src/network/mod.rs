//! MCP stdio transport: line framing, request dispatch, and shutdown control.

pub mod config;
pub mod connection;
pub mod handlers;
pub mod module;
pub mod shutdown;

pub use config::TransportConfig;
pub use connection::{OutboundHandle, OutboundMessage, SendError};
pub use handlers::AppState;
pub use module::NetworkModule;
pub use shutdown::{HealthState, InFlightGuard, ShutdownController};
