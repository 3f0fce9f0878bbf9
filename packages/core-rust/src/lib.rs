//! Retable MCP core: argument schemas, invocation envelopes, and wire messages.

pub mod messages;
pub mod schema;
pub mod traits;
pub mod types;

pub use schema::{ArgSchema, FieldDef, ObjectSchema, ValidationError};
pub use traits::ToolArgs;
pub use types::Envelope;
