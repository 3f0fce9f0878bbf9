//! Graceful shutdown controller with in-flight invocation tracking.
//!
//! Uses `ArcSwap` for lock-free lifecycle transitions and an atomic counter
//! with RAII guards, paired with a `Notify` so draining wakes up as soon as
//! the last invocation finishes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::{watch, Notify};

/// Transport lifecycle state.
///
/// State machine: Starting -> Ready -> Draining -> Stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    /// Registry built, input not yet being read.
    Starting,
    /// Reading requests from the input stream.
    Ready,
    /// Input closed or interrupted; waiting on in-flight invocations.
    Draining,
    /// Writer closed.
    Stopped,
}

#[derive(Debug, Default)]
struct InFlight {
    count: AtomicU64,
    idle: Notify,
}

/// Coordinates shutdown of the stdio transport.
///
/// 1. The read loop selects on `shutdown_receiver()` next to the input stream
/// 2. Every spawned request task holds an `InFlightGuard`
/// 3. `trigger_shutdown()` moves to Draining and wakes the read loop
/// 4. `wait_for_drain()` resolves once every guard is dropped or the timeout hits
#[derive(Debug)]
pub struct ShutdownController {
    shutdown_signal: watch::Sender<bool>,
    in_flight: Arc<InFlight>,
    state: ArcSwap<HealthState>,
}

impl ShutdownController {
    /// Creates a controller in the `Starting` state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            shutdown_signal: tx,
            in_flight: Arc::new(InFlight::default()),
            state: ArcSwap::from_pointee(HealthState::Starting),
        }
    }

    /// Moves `Starting` to `Ready`. Does nothing once shutdown has begun.
    pub fn set_ready(&self) {
        self.state.rcu(|current| match **current {
            HealthState::Starting => Arc::new(HealthState::Ready),
            _ => Arc::clone(current),
        });
    }

    /// Receiver flipped to `true` once shutdown is triggered.
    #[must_use]
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_signal.subscribe()
    }

    /// Moves to `Draining` and signals every receiver. Idempotent.
    pub fn trigger_shutdown(&self) {
        if matches!(
            self.health_state(),
            HealthState::Draining | HealthState::Stopped
        ) {
            return;
        }
        self.state.store(Arc::new(HealthState::Draining));
        // Stored even with no receiver yet, so a later subscriber sees it.
        self.shutdown_signal.send_replace(true);
    }

    /// Final transition, once the writer has flushed and closed.
    pub fn mark_stopped(&self) {
        self.state.store(Arc::new(HealthState::Stopped));
    }

    #[must_use]
    pub fn health_state(&self) -> HealthState {
        **self.state.load()
    }

    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_signal.borrow()
    }

    /// Tracks one in-flight invocation until the guard drops, panics included.
    #[must_use]
    pub fn in_flight_guard(&self) -> InFlightGuard {
        self.in_flight.count.fetch_add(1, Ordering::AcqRel);
        InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    #[must_use]
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.count.load(Ordering::Acquire)
    }

    /// Waits for every in-flight invocation to finish, up to `timeout`.
    ///
    /// Returns `true` if the count reached zero in time. The state is left
    /// untouched either way; callers finish with [`Self::mark_stopped`].
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let drained = async {
            loop {
                let notified = self.in_flight.idle.notified();
                tokio::pin!(notified);
                // Register before checking so a drop in between is not missed.
                notified.as_mut().enable();
                if self.in_flight_count() == 0 {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(timeout, drained).await.is_ok()
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for one in-flight invocation.
#[derive(Debug)]
pub struct InFlightGuard {
    in_flight: Arc<InFlight>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.in_flight.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.in_flight.idle.notify_waiters();
        }
    }
}
