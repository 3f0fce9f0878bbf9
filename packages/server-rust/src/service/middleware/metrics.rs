//! Metrics middleware for tool calls.
//!
//! Records call duration and outcome using `tracing` spans, not a full
//! metrics crate.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use retable_mcp_core::Envelope;
use tower::{Layer, Service};
use tracing::{info_span, Instrument};

use crate::service::operation::ToolCall;

// ---------------------------------------------------------------------------
// MetricsLayer
// ---------------------------------------------------------------------------

/// Tower layer that instruments tool calls with timing via `tracing` spans.
#[derive(Debug, Clone)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService { inner }
    }
}

// ---------------------------------------------------------------------------
// MetricsService
// ---------------------------------------------------------------------------

/// Service wrapper that records call duration and outcome in tracing spans.
#[derive(Debug, Clone)]
pub struct MetricsService<S> {
    inner: S,
}

impl<S> Service<ToolCall> for MetricsService<S>
where
    S: Service<ToolCall, Response = Envelope, Error = Infallible> + Send,
    S::Future: Send + 'static,
{
    type Response = Envelope;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Envelope, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, call: ToolCall) -> Self::Future {
        let tool = call.ctx().tool_name.clone();
        let call_id = call.ctx().call_id;

        let span = info_span!(
            "tool_call",
            tool = %tool,
            call_id = call_id,
            duration_ms = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let fut = self.inner.call(call);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = fut.await;

                #[allow(clippy::cast_possible_truncation)]
                let duration_ms = start.elapsed().as_millis() as u64;
                let outcome = match &result {
                    Ok(envelope) if envelope.is_error() => "error",
                    Ok(_) => "ok",
                    Err(never) => match *never {},
                };

                tracing::Span::current().record("duration_ms", duration_ms);
                tracing::Span::current().record("outcome", outcome);

                tracing::info!(
                    tool = %tool,
                    call_id = call_id,
                    duration_ms = duration_ms,
                    outcome = outcome,
                    "tool call complete"
                );

                result
            }
            .instrument(span),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
