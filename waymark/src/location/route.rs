//! Scripted demo routes.
//!
//! A [`RouteBackend`] replays a fixed list of waypoints on a timer, standing
//! in for a live feed during demos and on machines without one. Routes load
//! from a JSON file or come from [`Route::default_walk`].

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;

use super::backend::{BackendError, BoxFuture, FixSink, LocationBackend, PositionFix};

/// A named sequence of waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub waypoints: Vec<Coordinate>,
}

impl Route {
    /// Load a route from a JSON file.
    ///
    /// The file holds a single object with `name` and `waypoints` fields.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref();
        let route_file = |reason: String| BackendError::RouteFile {
            path: path.to_path_buf(),
            reason,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| route_file(e.to_string()))?;
        let route: Route =
            serde_json::from_str(&contents).map_err(|e| route_file(e.to_string()))?;
        if route.waypoints.is_empty() {
            return Err(route_file("route has no waypoints".to_string()));
        }
        Ok(route)
    }

    /// A short walk around a city block.
    ///
    /// One waypoint repeats back to back, so replaying this route exercises
    /// the duplicate suppression downstream.
    pub fn default_walk() -> Self {
        Self {
            name: "city walk".to_string(),
            waypoints: vec![
                Coordinate::new(55.7512, 37.6184),
                Coordinate::new(55.7516, 37.6189),
                Coordinate::new(55.7516, 37.6189),
                Coordinate::new(55.7521, 37.6180),
                Coordinate::new(55.7518, 37.6171),
                Coordinate::new(55.7512, 37.6175),
            ],
        }
    }
}

/// Configuration for route replay.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Delay between waypoint deliveries.
    pub interval: Duration,
    /// Restart from the first waypoint after the last.
    pub loop_route: bool,
    /// Whether the demo feed is enabled at all.
    pub enabled: bool,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            loop_route: true,
            enabled: true,
        }
    }
}

impl RouteConfig {
    /// Set the delay between waypoints.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set whether the route loops.
    pub fn with_loop(mut self, loop_route: bool) -> Self {
        self.loop_route = loop_route;
        self
    }
}

/// Location backend replaying a [`Route`] on a timer.
///
/// Counts authorization requests and update starts so callers can observe
/// how often the pipeline poked it.
pub struct RouteBackend {
    route: Route,
    config: RouteConfig,
    authorization_requests: Arc<AtomicUsize>,
    update_starts: Arc<AtomicUsize>,
}

impl RouteBackend {
    /// Create a backend replaying the given route.
    pub fn new(route: Route, config: RouteConfig) -> Self {
        Self {
            route,
            config,
            authorization_requests: Arc::new(AtomicUsize::new(0)),
            update_starts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The route being replayed.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// How many times authorization was requested.
    pub fn authorization_requests(&self) -> usize {
        self.authorization_requests.load(Ordering::SeqCst)
    }

    /// How many times the update stream was started.
    pub fn update_starts(&self) -> usize {
        self.update_starts.load(Ordering::SeqCst)
    }
}

impl Default for RouteBackend {
    fn default() -> Self {
        Self::new(Route::default_walk(), RouteConfig::default())
    }
}

impl LocationBackend for RouteBackend {
    fn name(&self) -> &str {
        "demo"
    }

    fn request_authorization(&self) {
        self.authorization_requests.fetch_add(1, Ordering::SeqCst);
        tracing::trace!("authorization implicit for scripted route");
    }

    fn services_enabled(&self) -> bool {
        self.config.enabled
    }

    fn start_updates(&self, sink: FixSink) -> BoxFuture<'static, ()> {
        self.update_starts.fetch_add(1, Ordering::SeqCst);
        let waypoints = self.route.waypoints.clone();
        let interval = self.config.interval;
        let loop_route = self.config.loop_route;
        Box::pin(async move {
            if waypoints.is_empty() {
                tracing::warn!("route has no waypoints, nothing to replay");
                return;
            }
            loop {
                for waypoint in &waypoints {
                    sink.deliver_fixes(&[PositionFix::new(*waypoint)]);
                    tokio::time::sleep(interval).await;
                }
                if !loop_route {
                    break;
                }
            }
            tracing::info!("route replay finished");
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast;

    use super::*;

    #[test]
    fn test_default_walk_repeats_a_waypoint() {
        let walk = Route::default_walk();

        assert!(walk.waypoints.len() >= 2);
        assert!(
            walk.waypoints.windows(2).any(|pair| pair[0] == pair[1]),
            "default walk should contain a back-to-back repeat"
        );
    }

    #[test]
    fn test_route_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.json");
        let route = Route::default_walk();

        std::fs::write(&path, serde_json::to_string_pretty(&route).unwrap()).unwrap();
        let loaded = Route::from_file(&path).unwrap();

        assert_eq!(loaded, route);
    }

    #[test]
    fn test_route_file_missing() {
        let err = Route::from_file("/nonexistent/route.json").unwrap_err();
        assert!(matches!(err, BackendError::RouteFile { .. }));
    }

    #[test]
    fn test_route_file_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Route::from_file(&path).unwrap_err(),
            BackendError::RouteFile { .. }
        ));
    }

    #[test]
    fn test_route_file_rejects_empty_waypoints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.json");
        std::fs::write(&path, r#"{"name":"empty","waypoints":[]}"#).unwrap();

        assert!(Route::from_file(&path).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_delivers_waypoints_in_order() {
        let route = Route {
            name: "line".to_string(),
            waypoints: vec![
                Coordinate::new(1.0, 1.0),
                Coordinate::new(2.0, 2.0),
                Coordinate::new(3.0, 3.0),
            ],
        };
        let backend = RouteBackend::new(route, RouteConfig::default().with_loop(false));

        let (tx, mut rx) = broadcast::channel(16);
        tokio::spawn(backend.start_updates(FixSink::new(tx)));

        for expected in [1.0, 2.0, 3.0] {
            let coordinate = rx.recv().await.unwrap();
            assert_eq!(coordinate, Coordinate::new(expected, expected));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_loops_when_configured() {
        let route = Route {
            name: "pair".to_string(),
            waypoints: vec![Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0)],
        };
        let backend = RouteBackend::new(route, RouteConfig::default().with_loop(true));

        let (tx, mut rx) = broadcast::channel(16);
        let replay = tokio::spawn(backend.start_updates(FixSink::new(tx)));

        for expected in [1.0, 2.0, 1.0, 2.0] {
            let coordinate = rx.recv().await.unwrap();
            assert_eq!(coordinate, Coordinate::new(expected, expected));
        }

        replay.abort();
    }

    #[test]
    fn test_backend_counts_starts_and_authorizations() {
        let backend = RouteBackend::default();

        backend.request_authorization();
        backend.request_authorization();
        let _first = backend.start_updates(FixSink::new(broadcast::channel(1).0));
        let _second = backend.start_updates(FixSink::new(broadcast::channel(1).0));

        assert_eq!(backend.authorization_requests(), 2);
        assert_eq!(backend.update_starts(), 2);
    }
}
