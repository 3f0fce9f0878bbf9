//! Stdio transport configuration.

use std::time::Duration;

/// Settings for the MCP stdio transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Bounded mpsc channel capacity between request tasks and the stdout writer.
    pub outbound_channel_capacity: usize,
    /// How long in-flight invocations may run after input ends or Ctrl-C.
    pub drain_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            outbound_channel_capacity: 256,
            drain_timeout: Duration::from_secs(5),
        }
    }
}
