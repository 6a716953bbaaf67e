//! Location pipeline.
//!
//! Position data flows one way: a [`LocationBackend`] produces batches of
//! fixes, a [`FixSink`] reduces each batch to its first coordinate and
//! publishes it, and a [`SystemLocationSource`] fans the resulting stream
//! out to any number of subscribers over a broadcast channel. Failures are
//! logged and swallowed inside the pipeline, so subscribers only ever see
//! coordinates.
//!
//! Two backends ship with the crate: [`UdpFeedBackend`] reads XGPS
//! sentences from a UDP socket, and [`RouteBackend`] replays a scripted
//! route for demos.

pub mod backend;
pub mod route;
pub mod source;
pub mod udp;

pub use backend::{BackendError, BoxFuture, FixSink, LocationBackend, PositionFix};
pub use route::{Route, RouteBackend, RouteConfig};
pub use source::{LocationSource, SystemLocationSource, EVENT_CHANNEL_CAPACITY};
pub use udp::{UdpFeedBackend, UdpFeedConfig, DEFAULT_FEED_BIND, DEFAULT_FEED_PORT};
