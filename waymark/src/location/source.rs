//! Coordinate event source.
//!
//! [`SystemLocationSource`] owns a backend and fans its fixes out to any
//! number of subscribers over a broadcast channel. The stream it produces is
//! continuous and error-free: it never terminates on its own and carries no
//! failure values, because the sink swallows backend failures before they
//! reach the channel.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::coord::Coordinate;

use super::backend::{BackendError, FixSink, LocationBackend};

/// Capacity of the coordinate broadcast channel.
///
/// Position fixes arrive at feed rate (about 1 Hz for GPS-style feeds), so a
/// small buffer is enough; a subscriber that falls further behind observes a
/// lag and keeps going.
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

/// A push-based stream of coordinate events.
///
/// `subscribe` may be called any number of times; each receiver sees events
/// published after its subscription, in publication order. There is no
/// replay, so consumers that must not miss the first fix subscribe before
/// calling `start`.
pub trait LocationSource {
    /// Begin producing coordinate events.
    ///
    /// Not guarded: calling this again re-requests authorization and starts
    /// another update task. Callers get no signal of whether updates
    /// actually began; failures are logged and swallowed.
    fn start(&self);

    /// Subscribe to the coordinate stream.
    fn subscribe(&self) -> broadcast::Receiver<Coordinate>;
}

/// Location source backed by a [`LocationBackend`].
///
/// Must be created within a Tokio runtime context; update tasks are spawned
/// onto the runtime that was current at construction time. Dropping the
/// source cancels every task it started.
pub struct SystemLocationSource<B> {
    backend: Arc<B>,
    events: broadcast::Sender<Coordinate>,
    runtime: Handle,
    cancellation: CancellationToken,
}

impl<B: LocationBackend + 'static> SystemLocationSource<B> {
    /// Create a source over the given backend.
    pub fn new(backend: B) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            backend: Arc::new(backend),
            events,
            runtime: Handle::current(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: LocationBackend + 'static> LocationSource for SystemLocationSource<B> {
    fn start(&self) {
        self.backend.request_authorization();

        let backend = Arc::clone(&self.backend);
        let sink = FixSink::new(self.events.clone());
        let cancel = self.cancellation.child_token();

        // The enabled check and the update loop both run off the caller's
        // context; start() returns before either has happened.
        self.runtime.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(backend = backend.name(), "location updates cancelled");
                }
                _ = async {
                    if backend.services_enabled() {
                        tracing::debug!(backend = backend.name(), "starting location updates");
                        backend.start_updates(sink).await;
                        tracing::debug!(backend = backend.name(), "location updates ended");
                    } else {
                        sink.deliver_failure(BackendError::Disabled);
                    }
                } => {}
            }
        });
    }

    fn subscribe(&self) -> broadcast::Receiver<Coordinate> {
        self.events.subscribe()
    }
}

impl<B> Drop for SystemLocationSource<B> {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}
