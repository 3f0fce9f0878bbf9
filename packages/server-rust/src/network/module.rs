//! Stdio transport lifecycle.
//!
//! `new()` assembles shared state, `serve()` reads newline-delimited JSON-RPC
//! from any reader until end of input or shutdown, then drains in-flight
//! invocations and closes the writer.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader};
use tracing::{debug, info, warn};

use super::config::TransportConfig;
use super::connection::{write_loop, OutboundHandle};
use super::handlers::{handle_message, AppState};
use super::shutdown::ShutdownController;
use crate::service::{ServerConfig, ToolRegistry};

/// Owns the transport's shared state and runs the serve loop.
pub struct NetworkModule {
    config: TransportConfig,
    state: AppState,
    shutdown: Arc<ShutdownController>,
}

impl NetworkModule {
    /// Creates the module without touching any I/O.
    #[must_use]
    pub fn new(config: TransportConfig, registry: Arc<ToolRegistry>, server: ServerConfig) -> Self {
        Self {
            config,
            state: AppState::new(registry, server),
            shutdown: Arc::new(ShutdownController::new()),
        }
    }

    /// Shared handle to the shutdown controller, e.g. for a signal task.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Serves MCP over the process's stdin and stdout, draining on Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let shutdown = self.shutdown_controller();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, shutting down");
                    shutdown.trigger_shutdown();
                }
                Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
            }
        });
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serves requests read from `reader`, writing responses to `writer`.
    ///
    /// Each request runs in its own task; responses are written in completion
    /// order. After end of input or shutdown:
    /// 1. State transitions to Draining and no further input is read
    /// 2. In-flight invocations get up to `drain_timeout` to finish
    /// 3. The writer flushes and closes, and state transitions to Stopped
    ///
    /// # Errors
    ///
    /// Returns an error if the writer task fails or panics. A failed writer
    /// also stops the read loop.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (outbound, rx) = OutboundHandle::channel(self.config.outbound_channel_capacity);
        let mut writer_task = tokio::spawn(write_loop(rx, writer));
        let mut writer_exited = None;

        let mut reader = BufReader::new(reader);
        let mut shutdown_rx = self.shutdown.shutdown_receiver();
        let mut buf = Vec::new();

        self.shutdown.set_ready();
        info!("serving MCP over stdio");

        // Also covers a shutdown triggered before serving started.
        while !*shutdown_rx.borrow_and_update() {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    debug!("shutdown signalled, no longer reading input");
                }
                exited = &mut writer_task => {
                    warn!("output closed, no longer reading input");
                    writer_exited = Some(exited);
                    break;
                }
                read = reader.read_until(b'\n', &mut buf) => match read {
                    Ok(0) => {
                        info!("input closed");
                        break;
                    }
                    // A line that races a shutdown is not dispatched.
                    Ok(_) if self.shutdown.is_shutting_down() => break,
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buf).trim().to_string();
                        buf.clear();
                        if !line.is_empty() {
                            self.spawn_request(line, &outbound);
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to read input");
                        break;
                    }
                },
            }
        }

        self.shutdown.trigger_shutdown();
        let in_flight = self.shutdown.in_flight_count();
        if in_flight > 0 {
            info!(in_flight, "draining in-flight invocations");
        }
        if !self.shutdown.wait_for_drain(self.config.drain_timeout).await {
            warn!(
                in_flight = self.shutdown.in_flight_count(),
                "drain timeout expired with invocations still running"
            );
        }

        let exited = match writer_exited {
            Some(exited) => exited,
            None => {
                outbound.close().await;
                drop(outbound);
                writer_task.await
            }
        };
        self.shutdown.mark_stopped();
        let written = exited??;
        info!(responses = written, "transport stopped");
        Ok(())
    }

    fn spawn_request(&self, line: String, outbound: &OutboundHandle) {
        let state = self.state.clone();
        let outbound = outbound.clone();
        let guard = self.shutdown.in_flight_guard();
        tokio::spawn(async move {
            let _guard = guard;
            if let Some(response) = handle_message(&state, &line).await {
                if outbound.send(response).await.is_err() {
                    debug!("writer closed before the response was sent");
                }
            }
        });
    }
}
