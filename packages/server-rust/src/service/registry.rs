//! Tool catalogue and the invocation failure boundary.

use std::any::Any;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::FutureExt;
use retable_mcp_core::messages::ToolInfo;
use retable_mcp_core::{Envelope, ObjectSchema, ToolArgs};
use serde::Serialize;
use serde_json::Value;
use tower::Service;

use super::operation::{OperationError, ToolCall};

type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value, OperationError>> + Send>>;

/// Type-erased handler: raw (already validated) arguments in, JSON result out.
type Handler = Arc<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

// ---------------------------------------------------------------------------
// ToolDescriptor
// ---------------------------------------------------------------------------

/// One registered tool. Immutable once registered.
pub struct ToolDescriptor {
    name: &'static str,
    description: &'static str,
    schema: ObjectSchema,
    input_schema: Value,
    handler: Handler,
}

impl ToolDescriptor {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description
    }

    #[must_use]
    pub fn schema(&self) -> &ObjectSchema {
        &self.schema
    }

    /// Listing entry for `tools/list`.
    #[must_use]
    pub fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema.clone(),
        }
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Error raised while building the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("tool already registered: {name}")]
    AlreadyRegistered { name: &'static str },
}

// ---------------------------------------------------------------------------
// ToolRegistry
// ---------------------------------------------------------------------------

/// Name-keyed catalogue of tools.
///
/// Built once at startup and shared read-only afterwards. Listing preserves
/// registration order. [`ToolRegistry::invoke`] is the single failure boundary:
/// every outcome, panics included, comes back as an [`Envelope`].
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool whose arguments deserialize into `A`.
    ///
    /// The argument schema is `A::schema()`. Handler failures surface to the
    /// caller as their `Display` text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyRegistered`] if `name` is taken.
    pub fn register<A, F, Fut, R, E>(
        &mut self,
        name: &'static str,
        description: &'static str,
        handler: F,
    ) -> Result<(), RegistryError>
    where
        A: ToolArgs,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Serialize,
        E: Display,
    {
        if self.contains(name) {
            return Err(RegistryError::AlreadyRegistered { name });
        }

        let handler: Handler = Arc::new(move |arguments: Value| -> HandlerFuture {
            let args = match serde_json::from_value::<A>(arguments) {
                Ok(args) => args,
                Err(e) => {
                    let err = OperationError::Deserialize {
                        tool: name,
                        message: e.to_string(),
                    };
                    return Box::pin(std::future::ready(Err(err)));
                }
            };
            let fut = handler(args);
            Box::pin(async move {
                let result = fut.await.map_err(|e| OperationError::Handler {
                    message: e.to_string(),
                })?;
                serde_json::to_value(result).map_err(|e| OperationError::Serialize {
                    tool: name,
                    message: e.to_string(),
                })
            })
        });

        let schema = A::schema();
        let input_schema = schema.to_json_schema();
        self.by_name.insert(name, self.tools.len());
        self.tools.push(ToolDescriptor {
            name,
            description,
            schema,
            input_schema,
            handler,
        });
        Ok(())
    }

    /// Looks up a tool by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.by_name.get(name).map(|&index| &self.tools[index])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Every tool in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools.iter().map(ToolDescriptor::info).collect()
    }

    /// Runs the named tool against `arguments`. Never fails and never panics.
    ///
    /// Arguments are validated before the handler runs; a violation means the
    /// handler is not called at all.
    pub async fn invoke(&self, name: &str, arguments: Value) -> Envelope {
        match self.try_invoke(name, arguments).await {
            Ok(payload) => Envelope::success(payload),
            Err(err) => {
                tracing::debug!(tool = name, error = %err, "tool call failed");
                Envelope::error(err.to_string())
            }
        }
    }

    async fn try_invoke(&self, name: &str, mut arguments: Value) -> Result<Value, OperationError> {
        let tool = self.get(name).ok_or_else(|| OperationError::UnknownTool {
            name: name.to_string(),
        })?;

        tool.schema
            .validate(&arguments)
            .map_err(|source| OperationError::InvalidArguments {
                tool: tool.name,
                source,
            })?;
        tool.schema.normalize(&mut arguments);

        // A handler may panic while building its future or while polling it.
        let handler = &tool.handler;
        let fut = std::panic::catch_unwind(AssertUnwindSafe(|| handler(arguments))).map_err(
            |payload| OperationError::Panicked {
                tool: tool.name,
                message: panic_message(payload.as_ref()),
            },
        )?;

        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(OperationError::Panicked {
                tool: tool.name,
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Service<ToolCall> for Arc<ToolRegistry> {
    type Response = Envelope;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Envelope, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, call: ToolCall) -> Self::Future {
        let registry = Arc::clone(self);
        Box::pin(async move {
            Ok(registry
                .invoke(&call.ctx.tool_name, call.arguments)
                .await)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
