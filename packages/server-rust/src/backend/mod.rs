//! Retable API adapter: the HTTP implementation of [`RetableBackend`] and the
//! errors it surfaces.
//!
//! [`RetableBackend`]: crate::traits::RetableBackend

pub mod client;

pub use client::{BackendConfig, RetableClient, DEFAULT_BASE_URL};

use reqwest::StatusCode;
use serde_json::Value;

/// Failure of a single call against the Retable API.
///
/// None of the variants ever contain the API credential.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum BackendError {
    /// The client could not be constructed (e.g. an unusable base URL).
    #[error("retable client configuration error: {0}")]
    Configuration(String),

    /// An identifier that cannot stand as its own URL path segment.
    #[error("invalid identifier {0:?}: must not be empty, \".\" or \"..\"")]
    InvalidIdentifier(String),

    /// The request never produced an HTTP response.
    #[error("retable transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status. Displays as the remote
    /// message alone.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message reported by the API.
        message: String,
    },

    /// A success response whose body is not JSON.
    #[error("retable response was not valid JSON: {0}")]
    Decode(String),
}

impl BackendError {
    /// Builds an [`BackendError::Api`] from a non-success response.
    ///
    /// The message is the body's `message` (or `error`) string when the body
    /// is a JSON object carrying one, else the raw body text, else the
    /// canonical status reason.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let from_json = serde_json::from_slice::<Value>(body).ok().and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
        });
        let message = from_json
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (!text.is_empty()).then_some(text)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Self::Api {
            status: status.as_u16(),
            message,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(value: reqwest::Error) -> Self {
        // The credential travels in a header, never in the URL.
        Self::Transport(value.to_string())
    }
}
