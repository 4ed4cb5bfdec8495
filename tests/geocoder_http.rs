mod common;

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use common::FakeBackend;
use topo::config::GeocoderConfig;
use topo::geocoder::{GeocodingClient, Progress};
use topo::{PlaceType, ResolveError};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_google_found() {
    let backend = FakeBackend::spawn().await;
    let client = GeocodingClient::new(&backend.google_config()).unwrap();

    let record = client.resolve("Paris").await;
    assert!(record.is_found());
    assert_eq!(record.name, "Paris");
    assert_eq!(record.display_name(), Some("Paris, France"));
    assert_eq!(record.lat(), Some(48.8566));
    assert_eq!(record.lon(), Some(2.3522));
    assert_eq!(record.place_type(), Some(PlaceType::City));
}

#[tokio::test]
async fn test_google_failures() {
    let backend = FakeBackend::spawn().await;
    let client = GeocodingClient::new(&backend.google_config()).unwrap();

    assert_eq!(
        client.resolve("Atlantis").await.error(),
        Some(&ResolveError::NotFound)
    );
    assert_eq!(
        client.resolve("Denied").await.error(),
        Some(&ResolveError::Api("OVER_QUERY_LIMIT".into()))
    );
    assert_eq!(
        client.resolve("Boom").await.error(),
        Some(&ResolveError::Http(500))
    );
}

#[tokio::test]
async fn test_google_river() {
    let backend = FakeBackend::spawn().await;
    let client = GeocodingClient::new(&backend.google_config()).unwrap();

    let record = client.resolve("Rhine").await;
    assert_eq!(record.place_type(), Some(PlaceType::River));
}

#[tokio::test]
async fn test_timeout_fails_only_that_name() {
    let backend = FakeBackend::spawn().await;
    let client = GeocodingClient::new(&backend.google_config()).unwrap();

    let records = client
        .resolve_all(&names(&["Paris", "Slow", "London"]), |_| {})
        .await;

    assert_eq!(records.len(), 3);
    assert!(records[0].is_found());
    assert_eq!(records[1].error(), Some(&ResolveError::Timeout));
    assert!(records[2].is_found());
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Bind and drop a listener to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = GeocoderConfig {
        endpoint: Some(format!("http://{}/search", addr)),
        throttle_ms: Some(0),
        ..Default::default()
    };
    let client = GeocodingClient::new(&config).unwrap();

    let record = client.resolve("Paris").await;
    assert!(matches!(record.error(), Some(ResolveError::Network(_))));
}

#[tokio::test]
async fn test_resolve_all_keeps_positions_and_reports_progress() {
    let backend = FakeBackend::spawn().await;
    let client = GeocodingClient::new(&backend.google_config()).unwrap();
    let input = names(&["Rome", "Atlantis", "Berlin", "Rome"]);

    let mut events = Vec::new();
    let records = client
        .resolve_all(&input, |progress| match progress {
            Progress::Started { index, total, name } => {
                events.push(format!("start {}/{} {}", index + 1, total, name))
            }
            Progress::Resolved { index, record, .. } => {
                events.push(format!("done {} {}", index + 1, record.is_found()))
            }
        })
        .await;

    let resolved: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(resolved, vec!["Rome", "Atlantis", "Berlin", "Rome"]);
    assert_eq!(
        events,
        vec![
            "start 1/4 Rome",
            "done 1 true",
            "start 2/4 Atlantis",
            "done 2 false",
            "start 3/4 Berlin",
            "done 3 true",
            "start 4/4 Rome",
            "done 4 true",
        ]
    );

    // Sent in input order, never overlapping
    assert_eq!(backend.state.queries(), input);
    assert_eq!(backend.state.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_nominatim_throttled() {
    let backend = FakeBackend::spawn().await;
    let client = GeocodingClient::new(&backend.nominatim_config(200)).unwrap();

    let start = Instant::now();
    let records = client
        .resolve_all(&names(&["Paris", "Maas", "Atlantis"]), |_| {})
        .await;

    assert!(start.elapsed() >= Duration::from_millis(400));
    assert_eq!(records[0].display_name(), Some("Paris, France"));
    assert_eq!(records[0].place_type(), Some(PlaceType::City));
    assert_eq!(records[1].place_type(), Some(PlaceType::River));
    assert_eq!(records[2].error(), Some(&ResolveError::NotFound));
}
