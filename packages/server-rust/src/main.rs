//! `retable-mcp-server` binary: MCP over stdio in front of the Retable API.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use retable_mcp_server::cli::Cli;
use retable_mcp_server::network::NetworkModule;
use retable_mcp_server::service::{build_registry, ServerConfig};
use retable_mcp_server::{RetableBackend, RetableClient};
use tracing::{error, info};

/// Grace period for blocking tasks (the stdin reader) once serving ends.
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.init_tracing();

    // Checked before any runtime or registry exists.
    let backend_config = match cli.backend_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        let client = RetableClient::new(backend_config).context("building Retable client")?;
        info!(base_url = %client.base_url(), "Retable client ready");

        let backend: Arc<dyn RetableBackend> = Arc::new(client);
        let registry = build_registry(backend).context("building tool registry")?;
        info!(tools = registry.len(), "tool registry ready");

        NetworkModule::new(cli.transport_config(), Arc::new(registry), ServerConfig::default())
            .serve_stdio()
            .await
    });
    // A pending stdin read cannot be cancelled; do not wait on it.
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
