//! Location backend abstraction.
//!
//! A backend is the collaborator that actually produces position fixes: the
//! UDP feed listener, the demo route player, or a test double. Backends do
//! not talk to subscribers directly; they push batches of fixes and failure
//! reports into a [`FixSink`], which translates them into coordinate events
//! on the source's broadcast channel.
//!
//! # Failure policy
//!
//! Backend failures are logged where they reach the sink and then dropped.
//! They never surface downstream, are never retried, and never close the
//! coordinate stream. Subscribers only ever see coordinates.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::coord::Coordinate;

/// Boxed future type for dyn-compatible backend methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One raw position report from a backend.
///
/// Carries the optional motion data a feed sentence may include; the
/// pipeline itself only consumes the coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    /// Position of the fix.
    pub coordinate: Coordinate,
    /// Altitude above sea level in metres, if reported.
    pub altitude_m: Option<f64>,
    /// Ground track in degrees true, if reported.
    pub track_deg: Option<f64>,
    /// Ground speed in metres per second, if reported.
    pub speed_mps: Option<f64>,
}

impl PositionFix {
    /// Create a fix with position only.
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            altitude_m: None,
            track_deg: None,
            speed_mps: None,
        }
    }
}

/// Errors reported by location backends.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A feed sentence could not be parsed.
    #[error("malformed sentence '{sentence}': {reason}")]
    Malformed { sentence: String, reason: String },

    /// The feed socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    /// Receiving from the feed socket failed.
    #[error("receive error: {0}")]
    Receive(#[from] io::Error),

    /// Location services are switched off.
    #[error("location services disabled")]
    Disabled,

    /// A route file could not be loaded.
    #[error("invalid route file {path}: {reason}")]
    RouteFile { path: PathBuf, reason: String },
}

/// A source of continuous position updates.
///
/// Implementations wrap whatever actually produces fixes so the rest of the
/// pipeline can be exercised with test doubles. All methods may be called
/// again after a restart; backends do not dedup repeated starts.
pub trait LocationBackend: Send + Sync {
    /// Short name for logs and status displays.
    fn name(&self) -> &str;

    /// Request permission to read positions.
    ///
    /// Fire-and-forget: the outcome is not observed and no callback is
    /// wired. Backends with no permission concept implement this as a no-op.
    fn request_authorization(&self);

    /// Whether the backend is allowed to deliver updates at all.
    ///
    /// Checked off the UI context before updates are started.
    fn services_enabled(&self) -> bool;

    /// Begin continuous updates, delivering events through the sink.
    ///
    /// The returned future runs until the feed ends or the owning source is
    /// dropped; it is polled on the runtime, never on the UI context.
    fn start_updates(&self, sink: FixSink) -> BoxFuture<'static, ()>;
}

impl LocationBackend for Box<dyn LocationBackend> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn request_authorization(&self) {
        (**self).request_authorization()
    }

    fn services_enabled(&self) -> bool {
        (**self).services_enabled()
    }

    fn start_updates(&self, sink: FixSink) -> BoxFuture<'static, ()> {
        (**self).start_updates(sink)
    }
}

/// Adapter that turns backend callbacks into coordinate events.
///
/// Cloning is cheap; backends may hand clones to helper tasks.
#[derive(Debug, Clone)]
pub struct FixSink {
    events: broadcast::Sender<Coordinate>,
}

impl FixSink {
    /// Wrap a broadcast sender.
    pub(crate) fn new(events: broadcast::Sender<Coordinate>) -> Self {
        Self { events }
    }

    /// Publish the first fix of a batch as a coordinate event.
    ///
    /// Only the first fix is published; the rest of the batch is dropped.
    /// A multi-sentence datagram therefore collapses to its leading
    /// position. An empty batch publishes nothing.
    pub fn deliver_fixes(&self, fixes: &[PositionFix]) {
        let Some(fix) = fixes.first() else {
            return;
        };

        if fixes.len() > 1 {
            tracing::trace!(dropped = fixes.len() - 1, "batch truncated to first fix");
        }

        if self.events.send(fix.coordinate).is_err() {
            // No live subscribers; broadcast does not replay
            tracing::trace!(coordinate = %fix.coordinate, "no subscribers, fix dropped");
        }
    }

    /// Swallow a backend failure.
    ///
    /// The failure is logged and nothing else happens: no event, no retry,
    /// and the stream stays open.
    pub fn deliver_failure(&self, error: BackendError) {
        tracing::warn!(error = %error, "location update failed");
    }
}
