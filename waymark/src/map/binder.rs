//! Binding between a location source and a map display.
//!
//! The binder subscribes to a [`LocationSource`], starts it, and applies
//! each new coordinate to a [`MapDisplay`] as a region centered on that
//! coordinate. Consecutive identical coordinates are suppressed; two
//! coordinates are identical only when both components compare equal
//! exactly, so even a sub-meter change still moves the map.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::coord::{Coordinate, CoordSpan, MapRegion};
use crate::location::LocationSource;

use super::display::MapDisplay;

/// Drives a [`MapDisplay`] from a [`LocationSource`].
///
/// Construction subscribes to the source and then starts it, so no
/// coordinate published after construction is missed. The binder owns both
/// ends; dropping it tears the subscription down.
pub struct MapBinder<S: LocationSource, D: MapDisplay> {
    source: S,
    display: D,
    events: broadcast::Receiver<Coordinate>,
    last_applied: Option<Coordinate>,
    span: CoordSpan,
    animate: bool,
    regions_applied: u64,
    updates_suppressed: u64,
}

impl<S: LocationSource, D: MapDisplay> MapBinder<S, D> {
    /// Bind a display to a source and start the source.
    pub fn new(source: S, display: D) -> Self {
        let events = source.subscribe();
        source.start();
        Self {
            source,
            display,
            events,
            last_applied: None,
            span: CoordSpan::default(),
            animate: true,
            regions_applied: 0,
            updates_suppressed: 0,
        }
    }

    /// Set the span of the regions the binder applies.
    pub fn with_span(mut self, span: CoordSpan) -> Self {
        self.span = span;
        self
    }

    /// Set whether region changes are animated.
    pub fn with_animation(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    /// Drain all pending coordinates and apply them to the display.
    ///
    /// Returns the number of coordinates processed. Call this from a render
    /// loop that polls between frames.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        loop {
            match self.events.try_recv() {
                Ok(coordinate) => {
                    self.apply(coordinate);
                    processed += 1;
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::trace!(skipped, "coordinate stream lagged");
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => break,
            }
        }
        processed
    }

    /// Apply coordinates as they arrive until cancelled.
    ///
    /// The push-driven twin of [`pump`](Self::pump), for displays that do
    /// not sit inside a render loop.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    tracing::debug!("map binding cancelled");
                    break;
                }
                event = self.events.recv() => match event {
                    Ok(coordinate) => self.apply(coordinate),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::trace!(skipped, "coordinate stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("coordinate stream closed");
                        break;
                    }
                },
            }
        }
    }

    fn apply(&mut self, coordinate: Coordinate) {
        if self.last_applied == Some(coordinate) {
            self.updates_suppressed += 1;
            tracing::trace!(%coordinate, "duplicate coordinate suppressed");
            return;
        }
        self.display.set_shows_user_location(true);
        self.last_applied = Some(coordinate);
        self.display
            .set_region(MapRegion::centered(coordinate, self.span), self.animate);
        self.regions_applied += 1;
        tracing::debug!(%coordinate, "map recentered");
    }

    /// The coordinate the display currently centers on.
    pub fn last_applied(&self) -> Option<Coordinate> {
        self.last_applied
    }

    /// Region sets applied since construction.
    pub fn regions_applied(&self) -> u64 {
        self.regions_applied
    }

    /// Duplicate coordinates suppressed since construction.
    pub fn updates_suppressed(&self) -> u64 {
        self.updates_suppressed
    }

    /// Span used for applied regions.
    pub fn span(&self) -> CoordSpan {
        self.span
    }

    /// The bound source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The bound display.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the bound display.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}

#[cfg(test)]
mod tests {
    use crate::coord::DEFAULT_SPAN_DEG;
    use crate::map::display::RecordingDisplay;

    use super::*;

    /// Source that publishes a fixed list synchronously from `start`.
    ///
    /// Works because the binder subscribes before starting; the sends land
    /// in the already open subscription.
    struct FakeSource {
        tx: broadcast::Sender<Coordinate>,
        emit_on_start: Vec<Coordinate>,
    }

    impl FakeSource {
        fn new(emit_on_start: Vec<Coordinate>) -> Self {
            let (tx, _) = broadcast::channel(16);
            Self { tx, emit_on_start }
        }
    }

    impl LocationSource for FakeSource {
        fn start(&self) {
            for coordinate in &self.emit_on_start {
                let _ = self.tx.send(*coordinate);
            }
        }

        fn subscribe(&self) -> broadcast::Receiver<Coordinate> {
            self.tx.subscribe()
        }
    }

    fn bound_recorder(
        coordinates: Vec<Coordinate>,
    ) -> MapBinder<FakeSource, RecordingDisplay> {
        MapBinder::new(FakeSource::new(coordinates), RecordingDisplay::new())
    }

    #[test]
    fn test_first_coordinate_centers_map() {
        let mut binder = bound_recorder(vec![Coordinate::new(10.0, 20.0)]);

        assert_eq!(binder.pump(), 1);

        let sets = binder.display().region_sets();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].region.center, Coordinate::new(10.0, 20.0));
        assert_eq!(sets[0].region.span.latitude_delta, DEFAULT_SPAN_DEG);
        assert!(sets[0].animated);
        assert!(binder.display().shows_user_location());
    }

    #[test]
    fn test_duplicate_coordinates_apply_once() {
        let mut binder = bound_recorder(vec![
            Coordinate::new(10.0, 20.0),
            Coordinate::new(10.0, 20.0),
            Coordinate::new(10.0, 20.0001),
        ]);

        assert_eq!(binder.pump(), 3);

        let sets = binder.display().region_sets();
        assert_eq!(sets.len(), 2, "exact duplicate must not recenter");
        assert_eq!(sets[0].region.center, Coordinate::new(10.0, 20.0));
        assert_eq!(sets[1].region.center, Coordinate::new(10.0, 20.0001));
        assert_eq!(binder.regions_applied(), 2);
        assert_eq!(binder.updates_suppressed(), 1);
    }

    #[test]
    fn test_nonconsecutive_repeat_recenters() {
        let mut binder = bound_recorder(vec![
            Coordinate::new(10.0, 20.0),
            Coordinate::new(11.0, 20.0),
            Coordinate::new(10.0, 20.0),
        ]);

        binder.pump();

        assert_eq!(binder.display().region_sets().len(), 3);
        assert_eq!(binder.updates_suppressed(), 0);
    }

    #[test]
    fn test_no_coordinates_no_region() {
        let mut binder = bound_recorder(vec![]);

        assert_eq!(binder.pump(), 0);
        assert!(binder.display().region_sets().is_empty());
        assert!(!binder.display().shows_user_location());
        assert_eq!(binder.last_applied(), None);
    }

    #[test]
    fn test_span_override_applies_to_regions() {
        let mut binder = bound_recorder(vec![Coordinate::new(5.0, 6.0)])
            .with_span(CoordSpan::square(0.05));

        binder.pump();

        let sets = binder.display().region_sets();
        assert_eq!(sets[0].region.span.latitude_delta, 0.05);
        assert_eq!(sets[0].region.span.longitude_delta, 0.05);
    }

    #[test]
    fn test_animation_flag_is_forwarded() {
        let mut binder =
            bound_recorder(vec![Coordinate::new(5.0, 6.0)]).with_animation(false);

        binder.pump();

        assert!(!binder.display().region_sets()[0].animated);
    }

    #[test]
    fn test_lagged_stream_skips_and_continues() {
        // 20 sends into a capacity 16 channel: the oldest 4 are lost, the
        // binder logs the gap and keeps applying.
        let coordinates: Vec<_> = (0..20)
            .map(|i| Coordinate::new(i as f64, 0.0))
            .collect();
        let mut binder = bound_recorder(coordinates);

        assert_eq!(binder.pump(), 16);
        assert_eq!(binder.last_applied(), Some(Coordinate::new(19.0, 0.0)));
        assert_eq!(binder.regions_applied(), 16);
    }

    #[test]
    fn test_pump_is_idempotent_when_drained() {
        let mut binder = bound_recorder(vec![Coordinate::new(1.0, 1.0)]);

        assert_eq!(binder.pump(), 1);
        assert_eq!(binder.pump(), 0);
        assert_eq!(binder.display().region_sets().len(), 1);
    }

    #[tokio::test]
    async fn test_run_applies_until_cancelled() {
        let source = FakeSource::new(vec![]);
        let tx = source.tx.clone();
        let display = RecordingDisplay::new();
        let observer = display.clone();

        let cancel = CancellationToken::new();
        let binding = tokio::spawn(
            MapBinder::new(source, display).run(cancel.child_token()),
        );

        tx.send(Coordinate::new(10.0, 20.0)).unwrap();
        tx.send(Coordinate::new(10.0, 20.0)).unwrap();
        tx.send(Coordinate::new(10.0, 20.0001)).unwrap();

        // Wait for the binding task to drain the channel.
        for _ in 0..100 {
            if observer.region_sets().len() == 2 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        cancel.cancel();
        binding.await.unwrap();

        let sets = observer.region_sets();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[1].region.center, Coordinate::new(10.0, 20.0001));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// Coordinates drawn from a small grid so runs contain duplicates.
        fn arb_coordinate() -> impl Strategy<Value = Coordinate> {
            (0u8..3, 0u8..3).prop_map(|(lat, lon)| Coordinate::new(lat as f64, lon as f64))
        }

        proptest! {
            #[test]
            fn test_applied_count_matches_adjacent_distinct(
                coordinates in proptest::collection::vec(arb_coordinate(), 0..16)
            ) {
                let mut binder = bound_recorder(coordinates.clone());
                let processed = binder.pump();

                let mut expected_applied = 0u64;
                let mut last: Option<Coordinate> = None;
                for coordinate in &coordinates {
                    if last != Some(*coordinate) {
                        expected_applied += 1;
                        last = Some(*coordinate);
                    }
                }

                prop_assert_eq!(processed, coordinates.len());
                prop_assert_eq!(binder.regions_applied(), expected_applied);
                prop_assert_eq!(
                    binder.updates_suppressed(),
                    coordinates.len() as u64 - expected_applied
                );
                prop_assert_eq!(binder.last_applied(), last);
            }

            #[test]
            fn test_final_center_matches_final_coordinate(
                coordinates in proptest::collection::vec(arb_coordinate(), 1..16)
            ) {
                let mut binder = bound_recorder(coordinates.clone());
                binder.pump();

                // A suppressed final event still leaves the display centered
                // on an equal value, so the last applied center always
                // matches the last coordinate.
                let sets = binder.display().region_sets();
                prop_assert_eq!(
                    sets.last().map(|s| s.region.center),
                    coordinates.last().copied()
                );
            }
        }
    }
}
