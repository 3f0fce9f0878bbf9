//! Tower middleware layers for the tool-call pipeline.
//!
//! - [`metrics`]: Call timing and outcome via `tracing` spans
//! - [`pipeline`]: Composes the layers around the tool registry

pub mod metrics;
pub mod pipeline;

pub use metrics::MetricsLayer;
pub use pipeline::{build_tool_pipeline, ToolPipeline};
