//! `reqwest` implementation of [`RetableBackend`] against the Retable public API.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Method, Url};
use retable_mcp_core::messages::{
    ColumnIds, NewColumns, NewProject, NewRows, NewWorkspace, RowIds, RowUpdates,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::BackendError;
use crate::traits::RetableBackend;

/// Public API root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.retable.io/v1/public";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "ApiKey";

/// Connection settings for [`RetableClient`].
///
/// No `Default` impl because the credential has no sensible default.
#[derive(Clone)]
pub struct BackendConfig {
    /// API root; path segments are appended to it.
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: SecretString,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// HTTP client for the Retable API. Constructed once at startup and shared.
pub struct RetableClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl fmt::Debug for RetableClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetableClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RetableClient {
    /// Builds the client. Connection pooling and socket lifecycle are left to
    /// `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Configuration`] if the base URL does not parse
    /// or cannot carry path segments, or if the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let base_url = Url::parse(&config.base_url).map_err(|error| {
            BackendError::Configuration(format!("invalid base url {:?}: {error}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Configuration(format!(
                "base url {:?} cannot carry path segments",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("retable-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| BackendError::Configuration(error.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Returns the configured API root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    ///
    /// Empty, `.` and `..` segments are rejected: the URL parser would drop
    /// or resolve them and address a different endpoint.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(BackendError::InvalidIdentifier((*bad).to_string()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                BackendError::Configuration("base url cannot carry path segments".to_string())
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Performs one request and returns the decoded JSON body.
    async fn send<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Value, BackendError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(segments)?;
        debug!(method = %method, path = url.path(), "retable request");

        let mut request = self
            .http
            .request(method, url)
            .header(API_KEY_HEADER, self.api_key.expose_secret());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "retable request rejected");
            return Err(BackendError::from_response(status, &bytes));
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|error| BackendError::Decode(error.to_string()))
    }

    async fn get(&self, segments: &[&str]) -> Result<Value, BackendError> {
        self.send::<()>(Method::GET, segments, None).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<Value, BackendError> {
        self.send::<()>(Method::DELETE, segments, None).await
    }
}

#[async_trait]
impl RetableBackend for RetableClient {
    async fn get_workspace(&self, workspace_id: &str) -> Result<Value, BackendError> {
        self.get(&["workspace", workspace_id]).await
    }

    async fn get_all_workspaces(&self) -> Result<Value, BackendError> {
        self.get(&["workspace"]).await
    }

    async fn create_workspace(&self, workspace: &NewWorkspace) -> Result<Value, BackendError> {
        self.send(Method::POST, &["workspace"], Some(workspace)).await
    }

    async fn delete_workspace(&self, workspace_id: &str) -> Result<Value, BackendError> {
        self.delete(&["workspace", workspace_id]).await
    }

    async fn get_workspace_projects(&self, workspace_id: &str) -> Result<Value, BackendError> {
        self.get(&["workspace", workspace_id, "project"]).await
    }

    async fn create_project(
        &self,
        workspace_id: &str,
        project: &NewProject,
    ) -> Result<Value, BackendError> {
        self.send(Method::POST, &["workspace", workspace_id, "project"], Some(project))
            .await
    }

    async fn get_project(&self, project_id: &str) -> Result<Value, BackendError> {
        self.get(&["project", project_id]).await
    }

    async fn delete_project(&self, project_id: &str) -> Result<Value, BackendError> {
        self.delete(&["project", project_id]).await
    }

    async fn get_project_tables(&self, project_id: &str) -> Result<Value, BackendError> {
        self.get(&["project", project_id, "retable"]).await
    }

    async fn create_table(&self, project_id: &str) -> Result<Value, BackendError> {
        self.send::<()>(Method::POST, &["project", project_id, "retable"], None)
            .await
    }

    async fn get_table(&self, table_id: &str) -> Result<Value, BackendError> {
        self.get(&["retable", table_id]).await
    }

    async fn add_column(
        &self,
        table_id: &str,
        columns: &NewColumns,
    ) -> Result<Value, BackendError> {
        self.send(Method::POST, &["retable", table_id, "column"], Some(columns))
            .await
    }

    async fn delete_column(
        &self,
        table_id: &str,
        columns: &ColumnIds,
    ) -> Result<Value, BackendError> {
        self.send(Method::DELETE, &["retable", table_id, "column"], Some(columns))
            .await
    }

    async fn get_rows(&self, table_id: &str) -> Result<Value, BackendError> {
        self.get(&["retable", table_id, "data"]).await
    }

    async fn insert_row(&self, table_id: &str, rows: &NewRows) -> Result<Value, BackendError> {
        self.send(Method::POST, &["retable", table_id, "data"], Some(rows))
            .await
    }

    async fn update_row(&self, table_id: &str, rows: &RowUpdates) -> Result<Value, BackendError> {
        self.send(Method::PUT, &["retable", table_id, "data"], Some(rows))
            .await
    }

    async fn delete_row(&self, table_id: &str, rows: &RowIds) -> Result<Value, BackendError> {
        self.send(Method::DELETE, &["retable", table_id, "data"], Some(rows))
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
