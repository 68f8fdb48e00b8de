//! End-to-end behaviour of `GeocodingClient` over a recording transport.

use std::sync::Arc;
use std::time::Duration;

use geolocate::config::{AppConfig, GeocodingSettings};
use geolocate::{Coordinate, Credentials, GeocodingClient, ProviderKind};

use crate::mock_transport::{MockTransport, Reply, GOOGLE_URL, HERE_URL};

const GOOGLE_SF: &str = r#"{"results":[{"geometry":{"location":{"lat":37.7749,"lng":-122.4194}},
    "formatted_address":"San Francisco, CA, USA"}]}"#;
const GOOGLE_EMPTY: &str = r#"{"results":[]}"#;
const GOOGLE_DENIED: &str =
    r#"{"results":[],"status":"REQUEST_DENIED","error_message":"The provided API key is invalid."}"#;
const HERE_WPI: &str = r#"{"results":{"items":[{"position":[42.2,-71.8],
    "title":"WPI","vicinity":"Worcester, MA"}]}}"#;

fn settings() -> GeocodingSettings {
    GeocodingSettings {
        providers: vec![ProviderKind::Google, ProviderKind::Here],
        timeout: Duration::from_secs(1),
        user_agent: "geolocate-test".to_string(),
        google_endpoint: GOOGLE_URL.to_string(),
        here_endpoint: HERE_URL.to_string(),
        here_anchor: Coordinate::new(0.0, 0.0),
    }
}

fn credentials() -> Credentials {
    Credentials::new("google-key", "here-id", "here-code")
}

fn client_with(
    credentials: Credentials,
    settings: &GeocodingSettings,
    transport: &MockTransport,
) -> GeocodingClient {
    GeocodingClient::with_transport(credentials, settings, Arc::new(transport.clone()))
}

#[tokio::test]
async fn test_google_result_is_returned() {
    let transport = MockTransport::new();
    transport
        .reply(GOOGLE_URL, Reply::body(GOOGLE_SF))
        .reply(HERE_URL, Reply::body(HERE_WPI));

    let client = client_with(credentials(), &settings(), &transport);
    let coord = client.resolve("San Francisco, CA").await;

    assert_eq!(coord.map(|c| c.as_tuple()), Some((37.7749, -122.4194)));
    assert_eq!(transport.calls_to(GOOGLE_URL), 1);
    assert_eq!(transport.calls_to(HERE_URL), 0);

    let request = &transport.requests()[0];
    assert_eq!(request.param("address"), Some("San Francisco, CA"));
    assert_eq!(request.param("key"), Some("google-key"));
}

#[tokio::test]
async fn test_here_used_when_google_has_no_results() {
    let transport = MockTransport::new();
    transport
        .reply(GOOGLE_URL, Reply::body(GOOGLE_EMPTY))
        .reply(HERE_URL, Reply::body(HERE_WPI));

    let client = client_with(credentials(), &settings(), &transport);
    let resolution = client.lookup("100 Institute Rd, Worcester, MA").await.unwrap();

    assert_eq!(resolution.provider, ProviderKind::Here);
    assert_eq!(resolution.location.coordinate, Coordinate::new(42.2, -71.8));
    assert_eq!(resolution.location.formatted_address, "WPI, Worcester, MA");

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, GOOGLE_URL);
    assert_eq!(requests[1].url, HERE_URL);
    assert_eq!(requests[1].param("q"), Some("100 Institute Rd, Worcester, MA"));
    assert_eq!(requests[1].param("at"), Some("0.0000,0.0000"));
    assert_eq!(requests[1].param("app_id"), Some("here-id"));
    assert_eq!(requests[1].param("app_code"), Some("here-code"));
}

#[tokio::test]
async fn test_missing_google_key_goes_straight_to_here() {
    let transport = MockTransport::new();
    transport
        .reply(GOOGLE_URL, Reply::body(GOOGLE_SF))
        .reply(HERE_URL, Reply::body(HERE_WPI));

    let client = client_with(
        Credentials::new("", "here-id", "here-code"),
        &settings(),
        &transport,
    );

    assert_eq!(client.resolve("WPI").await, Some(Coordinate::new(42.2, -71.8)));
    assert_eq!(transport.calls_to(GOOGLE_URL), 0);
    assert_eq!(transport.calls_to(HERE_URL), 1);
}

#[tokio::test]
async fn test_rejected_google_request_falls_back() {
    let transport = MockTransport::new();
    transport
        .reply(GOOGLE_URL, Reply::body(GOOGLE_DENIED))
        .reply(HERE_URL, Reply::body(HERE_WPI));

    let client = client_with(credentials(), &settings(), &transport);
    let resolution = client.lookup("WPI").await.unwrap();
    assert_eq!(resolution.provider, ProviderKind::Here);
}

#[tokio::test]
async fn test_both_fail_returns_none() {
    let failures = [
        (Reply::Refused, Reply::body("not json")),
        (Reply::Timeout, Reply::Status(503)),
        (Reply::Status(403), Reply::body(r#"{"results":{"items":[]}}"#)),
        (Reply::body("{}"), Reply::Refused),
    ];

    for (google, here) in failures {
        let transport = MockTransport::new();
        transport.reply(GOOGLE_URL, google).reply(HERE_URL, here);

        let client = client_with(credentials(), &settings(), &transport);
        assert_eq!(client.resolve("Atlantis").await, None);
        assert_eq!(transport.calls_to(GOOGLE_URL), 1);
        assert_eq!(transport.calls_to(HERE_URL), 1);
    }
}

#[tokio::test]
async fn test_no_credentials_means_no_requests() {
    let transport = MockTransport::new();
    let client = client_with(Credentials::empty(), &settings(), &transport);

    assert_eq!(client.resolve("San Francisco, CA").await, None);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_resolve_is_total_for_odd_addresses() {
    let transport = MockTransport::new();
    transport
        .reply(GOOGLE_URL, Reply::body(GOOGLE_EMPTY))
        .reply(HERE_URL, Reply::body(r#"{"results":{"items":[{"position":[1.0]}]}}"#));

    let client = client_with(credentials(), &settings(), &transport);
    let long = "x".repeat(4096);
    for address in ["", " ", "🗺️", "a&b=c?d", long.as_str()] {
        assert_eq!(client.resolve(address).await, None);
    }
    assert_eq!(transport.calls_to(GOOGLE_URL), 5);
    assert_eq!(transport.calls_to(HERE_URL), 5);
}

#[tokio::test]
async fn test_configured_order_is_honoured() {
    let transport = MockTransport::new();
    transport
        .reply(GOOGLE_URL, Reply::body(GOOGLE_SF))
        .reply(HERE_URL, Reply::body(HERE_WPI));

    let settings = GeocodingSettings {
        providers: vec![ProviderKind::Here, ProviderKind::Google],
        ..settings()
    };
    let client = client_with(credentials(), &settings, &transport);

    assert_eq!(client.providers(), vec![ProviderKind::Here, ProviderKind::Google]);
    assert_eq!(client.resolve("WPI").await, Some(Coordinate::new(42.2, -71.8)));
    assert_eq!(transport.calls_to(GOOGLE_URL), 0);
}

#[tokio::test]
async fn test_custom_here_anchor() {
    let transport = MockTransport::new();
    transport.reply(HERE_URL, Reply::body(HERE_WPI));

    let settings = GeocodingSettings {
        providers: vec![ProviderKind::Here],
        here_anchor: Coordinate::new(42.27, -71.81),
        ..settings()
    };
    let client = client_with(credentials(), &settings, &transport);

    assert!(client.resolve("WPI").await.is_some());
    assert_eq!(transport.requests()[0].param("at"), Some("42.2700,-71.8100"));
}

#[tokio::test]
async fn test_client_from_config_file_keys() {
    let dir = tempfile::tempdir().unwrap();
    let google_key = dir.path().join("google_dev_key.txt");
    let here_key = dir.path().join("here_dev_key.txt");
    std::fs::write(&google_key, "file-google-key\n").unwrap();
    std::fs::write(&here_key, "app_id:\nfile-id\napp_code:\nfile-code\n").unwrap();

    let toml = format!(
        r#"
        [geocoding]
        timeout_secs = 2

        [google]
        api_key_env = "GEOLOCATE_IT_UNSET_GOOGLE"
        key_file = "{}"

        [here]
        app_id_env = "GEOLOCATE_IT_UNSET_HERE_ID"
        app_code_env = "GEOLOCATE_IT_UNSET_HERE_CODE"
        key_file = "{}"
        "#,
        google_key.display(),
        here_key.display()
    );
    let cfg = AppConfig::parse(&toml).unwrap();

    let client = GeocodingClient::from_config(&cfg).unwrap();
    assert_eq!(client.providers(), vec![ProviderKind::Google, ProviderKind::Here]);

    let credentials = Credentials::empty().resolve(&cfg.credential_sources());
    assert_eq!(credentials.google.api_key(), "file-google-key");
    assert_eq!(credentials.here.app_id(), "file-id");
    assert_eq!(credentials.here.app_code(), "file-code");
}
