//! Command-line and environment configuration, plus logging bootstrap.

use std::fmt;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use secrecy::{ExposeSecret, SecretString};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::backend::{BackendConfig, DEFAULT_BASE_URL};
use crate::network::TransportConfig;

/// Environment variable holding the Retable API key.
pub const API_KEY_ENV: &str = "RETABLE_API_KEY";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// MCP server exposing Retable workspaces, projects and tables as tools.
///
/// Speaks JSON-RPC over stdin/stdout; logs go to stderr.
#[derive(Parser)]
#[command(name = "retable-mcp-server", version, about, long_about = None)]
pub struct Cli {
    /// Retable API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, value_parser = parse_secret)]
    pub api_key: Option<SecretString>,

    /// Retable public API root
    #[arg(long, env = "RETABLE_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log filter (trace, debug, info, warn, error, or `EnvFilter` directives)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "RETABLE_MCP_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// How long in-flight tool calls may run after input closes, in milliseconds
    #[arg(long, env = "RETABLE_MCP_DRAIN_TIMEOUT_MS", default_value_t = 5000)]
    pub drain_timeout_ms: u64,

    /// Capacity of the outbound response queue
    #[arg(
        long,
        env = "RETABLE_MCP_CHANNEL_CAPACITY",
        default_value_t = 256,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub channel_capacity: u32,
}

#[allow(clippy::unnecessary_wraps)]
fn parse_secret(raw: &str) -> Result<SecretString, std::convert::Infallible> {
    Ok(SecretString::from(raw.to_string()))
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("drain_timeout_ms", &self.drain_timeout_ms)
            .field("channel_capacity", &self.channel_capacity)
            .finish()
    }
}

/// Fatal startup configuration problems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("No API key provided. Set RETABLE_API_KEY or pass --api-key.")]
    MissingCredential,
}

impl Cli {
    /// Backend settings. A missing or blank key is fatal.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when no usable key is set.
    pub fn backend_config(&self) -> Result<BackendConfig, ConfigError> {
        let api_key = self
            .api_key
            .as_ref()
            .map(|key| key.expose_secret().trim())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingCredential)?;
        Ok(BackendConfig {
            base_url: self.base_url.clone(),
            api_key: SecretString::from(api_key.to_string()),
        })
    }

    #[must_use]
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            outbound_channel_capacity: self.channel_capacity as usize,
            drain_timeout: Duration::from_millis(self.drain_timeout_ms),
        }
    }

    /// Installs the global `tracing` subscriber, writing to stderr.
    ///
    /// An unparsable filter falls back to `info`. Calling this twice is a
    /// no-op for the second call.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);
        let installed = match self.log_format {
            LogFormat::Pretty => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init(),
        };
        if installed.is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    }
}
