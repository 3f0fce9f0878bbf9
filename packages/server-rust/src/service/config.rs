/// Identity the server reports to MCP clients during `initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Reported as `serverInfo.name`.
    pub server_name: String,
    /// Reported as `serverInfo.version`.
    pub server_version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_name: "retable-mcp-server".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
