//! UDP position feed backend.
//!
//! Listens for GPS broadcast sentences in the `XGPS` format that simulator
//! and EFB apps emit over UDP:
//!
//! ```text
//! XGPS<device>,<longitude>,<latitude>[,<altitude_m>,<track_deg>,<speed_mps>]
//! ```
//!
//! Longitude comes first. A datagram may carry several newline-separated
//! sentences and is treated as one batch; `XATT` attitude sentences sharing
//! the port are skipped. Malformed sentences, bind failures, and receive
//! failures all become swallowed failure events per the pipeline's error
//! policy.

use std::time::Duration;

use tokio::net::UdpSocket;

use crate::coord::Coordinate;

use super::backend::{BackendError, BoxFuture, FixSink, LocationBackend, PositionFix};

/// Conventional port for XGPS position broadcasts.
pub const DEFAULT_FEED_PORT: u16 = 49002;

/// Default listen address for the feed socket.
pub const DEFAULT_FEED_BIND: &str = "0.0.0.0:49002";

/// Pause after a receive error before listening again.
const RECV_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Configuration for the UDP feed backend.
#[derive(Debug, Clone)]
pub struct UdpFeedConfig {
    /// Address the feed socket binds to.
    pub bind_addr: String,
    /// Whether the feed is enabled at all.
    pub enabled: bool,
}

impl Default for UdpFeedConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_FEED_BIND.to_string(),
            enabled: true,
        }
    }
}

impl UdpFeedConfig {
    /// Set the bind address.
    pub fn with_bind_addr(mut self, bind_addr: impl Into<String>) -> Self {
        self.bind_addr = bind_addr.into();
        self
    }
}

/// Location backend reading XGPS sentences from a UDP socket.
pub struct UdpFeedBackend {
    config: UdpFeedConfig,
}

impl UdpFeedBackend {
    /// Create a backend with the given configuration.
    pub fn new(config: UdpFeedConfig) -> Self {
        Self { config }
    }
}

impl Default for UdpFeedBackend {
    fn default() -> Self {
        Self::new(UdpFeedConfig::default())
    }
}

impl LocationBackend for UdpFeedBackend {
    fn name(&self) -> &str {
        "udp"
    }

    fn request_authorization(&self) {
        // A local feed needs no permission grant.
        tracing::trace!("authorization implicit for local feed");
    }

    fn services_enabled(&self) -> bool {
        self.config.enabled
    }

    fn start_updates(&self, sink: FixSink) -> BoxFuture<'static, ()> {
        let bind_addr = self.config.bind_addr.clone();
        Box::pin(async move {
            let socket = match UdpSocket::bind(&bind_addr).await {
                Ok(socket) => socket,
                Err(e) => {
                    sink.deliver_failure(BackendError::Bind {
                        addr: bind_addr,
                        source: e,
                    });
                    return;
                }
            };
            tracing::info!(addr = %bind_addr, "listening for position sentences");
            run_feed(socket, sink).await;
        })
    }
}

/// Receive loop over an already bound socket.
///
/// Runs until the future is dropped. Split out from the backend so tests can
/// bind an ephemeral port themselves.
pub async fn run_feed(socket: UdpSocket, sink: FixSink) {
    let mut buf = [0u8; 2048];
    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, _peer)) => {
                let datagram = String::from_utf8_lossy(&buf[..len]);
                match parse_datagram(&datagram) {
                    Ok(fixes) => sink.deliver_fixes(&fixes),
                    Err(e) => sink.deliver_failure(e),
                }
            }
            Err(e) => {
                sink.deliver_failure(BackendError::Receive(e));
                tokio::time::sleep(RECV_RETRY_DELAY).await;
            }
        }
    }
}

/// Parse one datagram into a batch of fixes.
///
/// `XATT` sentences and blank lines are skipped. Any malformed sentence
/// fails the whole datagram; partial batches are not delivered.
pub fn parse_datagram(datagram: &str) -> Result<Vec<PositionFix>, BackendError> {
    let mut fixes = Vec::new();
    for line in datagram.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("XATT") {
            continue;
        }
        fixes.push(parse_sentence(line)?);
    }
    Ok(fixes)
}

/// Parse a single XGPS sentence.
pub fn parse_sentence(sentence: &str) -> Result<PositionFix, BackendError> {
    let malformed = |reason: &str| BackendError::Malformed {
        sentence: sentence.to_string(),
        reason: reason.to_string(),
    };

    let mut fields = sentence.split(',');

    let tag = fields.next().unwrap_or_default();
    if !tag.starts_with("XGPS") {
        return Err(malformed("unknown sentence tag"));
    }

    let longitude = fields
        .next()
        .and_then(|f| f.trim().parse::<f64>().ok())
        .ok_or_else(|| malformed("invalid longitude"))?;
    let latitude = fields
        .next()
        .and_then(|f| f.trim().parse::<f64>().ok())
        .ok_or_else(|| malformed("invalid latitude"))?;

    if !(-90.0..=90.0).contains(&latitude) {
        return Err(malformed("latitude out of range"));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(malformed("longitude out of range"));
    }

    let mut optional = |reason: &'static str| -> Result<Option<f64>, BackendError> {
        match fields.next() {
            None => Ok(None),
            Some(f) => f
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| malformed(reason)),
        }
    };

    let altitude_m = optional("invalid altitude")?;
    let track_deg = optional("invalid track")?;
    let speed_mps = optional("invalid speed")?;

    Ok(PositionFix {
        coordinate: Coordinate::new(latitude, longitude),
        altitude_m,
        track_deg,
        speed_mps,
    })
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast;

    use super::*;

    #[test]
    fn test_parse_sentence_longitude_first() {
        let fix = parse_sentence("XGPS1,37.618,55.751,142.0,90.0,1.4").unwrap();

        assert_eq!(fix.coordinate, Coordinate::new(55.751, 37.618));
        assert_eq!(fix.altitude_m, Some(142.0));
        assert_eq!(fix.track_deg, Some(90.0));
        assert_eq!(fix.speed_mps, Some(1.4));
    }

    #[test]
    fn test_parse_sentence_position_only() {
        let fix = parse_sentence("XGPS1,-74.006,40.7128").unwrap();

        assert_eq!(fix.coordinate, Coordinate::new(40.7128, -74.006));
        assert_eq!(fix.altitude_m, None);
        assert_eq!(fix.track_deg, None);
        assert_eq!(fix.speed_mps, None);
    }

    #[test]
    fn test_parse_sentence_device_suffix_ignored() {
        let fix = parse_sentence("XGPSWaymark,2.35,48.85").unwrap();
        assert_eq!(fix.coordinate, Coordinate::new(48.85, 2.35));
    }

    #[test]
    fn test_parse_sentence_rejects_unknown_tag() {
        let err = parse_sentence("GPGGA,1.0,2.0").unwrap_err();
        assert!(matches!(err, BackendError::Malformed { .. }));
    }

    #[test]
    fn test_parse_sentence_rejects_non_numeric_fields() {
        assert!(parse_sentence("XGPS1,abc,55.0").is_err());
        assert!(parse_sentence("XGPS1,37.0,xyz").is_err());
        assert!(parse_sentence("XGPS1,37.0,55.0,high").is_err());
    }

    #[test]
    fn test_parse_sentence_rejects_out_of_range() {
        assert!(parse_sentence("XGPS1,37.0,95.0").is_err());
        assert!(parse_sentence("XGPS1,181.0,55.0").is_err());
    }

    #[test]
    fn test_parse_sentence_missing_fields() {
        assert!(parse_sentence("XGPS1").is_err());
        assert!(parse_sentence("XGPS1,37.0").is_err());
    }

    #[test]
    fn test_parse_datagram_multiple_sentences() {
        let fixes = parse_datagram("XGPS1,10.0,50.0\nXGPS1,10.1,50.1\r\n").unwrap();

        assert_eq!(fixes.len(), 2);
        assert_eq!(fixes[0].coordinate, Coordinate::new(50.0, 10.0));
        assert_eq!(fixes[1].coordinate, Coordinate::new(50.1, 10.1));
    }

    #[test]
    fn test_parse_datagram_skips_attitude_sentences() {
        let fixes = parse_datagram("XATT1,12.0,-1.5,0.2\nXGPS1,10.0,50.0").unwrap();

        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].coordinate, Coordinate::new(50.0, 10.0));
    }

    #[test]
    fn test_parse_datagram_attitude_only_is_empty_batch() {
        let fixes = parse_datagram("XATT1,12.0,-1.5,0.2").unwrap();
        assert!(fixes.is_empty());
    }

    #[test]
    fn test_parse_datagram_fails_on_any_malformed_sentence() {
        assert!(parse_datagram("XGPS1,10.0,50.0\nXGPS1,broken").is_err());
    }

    #[tokio::test]
    async fn test_run_feed_delivers_first_fix_per_datagram() {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let feed_addr = socket.local_addr().unwrap();

        let (tx, mut rx) = broadcast::channel(16);
        let sink = FixSink::new(tx);
        let feed = tokio::spawn(run_feed(socket, sink));

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client
            .send_to(b"XGPS1,37.618,55.751\nXGPS1,37.620,55.752\n", feed_addr)
            .await
            .unwrap();

        let coordinate = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("feed should deliver a coordinate")
            .unwrap();
        assert_eq!(coordinate, Coordinate::new(55.751, 37.618));
        assert!(
            rx.try_recv().is_err(),
            "second sentence of the batch is dropped"
        );

        feed.abort();
    }

    #[tokio::test]
    async fn test_run_feed_survives_malformed_datagram() {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let feed_addr = socket.local_addr().unwrap();

        let (tx, mut rx) = broadcast::channel(16);
        let sink = FixSink::new(tx);
        let feed = tokio::spawn(run_feed(socket, sink));

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.send_to(b"not a sentence", feed_addr).await.unwrap();
        client
            .send_to(b"XGPS1,2.35,48.85", feed_addr)
            .await
            .unwrap();

        let coordinate = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("feed should keep listening after a bad datagram")
            .unwrap();
        assert_eq!(coordinate, Coordinate::new(48.85, 2.35));

        feed.abort();
    }

    #[tokio::test]
    async fn test_bind_failure_is_swallowed() {
        // Two listeners on one port: the second start must not panic.
        let holder = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = holder.local_addr().unwrap();

        let backend = UdpFeedBackend::new(UdpFeedConfig::default().with_bind_addr(addr.to_string()));
        let (tx, mut rx) = broadcast::channel(16);
        backend.start_updates(FixSink::new(tx)).await;

        assert!(rx.try_recv().is_err(), "bind failure produces no event");
    }
}
