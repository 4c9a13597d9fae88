//! Integration tests for `NominatimClient` using wiremock HTTP mocks.

use ridefare_core::rate_limit::RateLimitConfig;
use ridefare_core::retry::RetryConfig;
use ridefare_geo::Coordinate;
use ridefare_geocoder::{GeocodeError, GeocoderConfig, LocationMatcher, NominatimClient};
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> NominatimClient {
    let config = GeocoderConfig::default()
        .with_base_url(base_url)
        .with_user_agent("ridefare-tests/1.0")
        .with_rate_limit(RateLimitConfig::per_second(100))
        .with_cooldown(RetryConfig::throttled().without_jitter());
    NominatimClient::with_config(config).expect("client construction should not fail")
}

fn vijayawada() -> serde_json::Value {
    serde_json::json!({
        "place_id": 297_441_204,
        "licence": "Data © OpenStreetMap contributors, ODbL 1.0.",
        "osm_type": "relation",
        "lat": "16.5061743",
        "lon": "80.6480153",
        "display_name": "Vijayawada, NTR, Andhra Pradesh, India",
        "address": {
            "city": "Vijayawada",
            "state": "Andhra Pradesh",
            "country": "India",
            "country_code": "in"
        }
    })
}

#[tokio::test]
async fn search_sends_provider_contract() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Vijayawada"))
        .and(query_param("countrycodes", "in"))
        .and(query_param("format", "json"))
        .and(query_param("addressdetails", "1"))
        .and(query_param("limit", "8"))
        .and(query_param("dedupe", "1"))
        .and(header("user-agent", "ridefare-tests/1.0"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([vijayawada()])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let candidates = client.search("Vijayawada").await.expect("should parse candidates");

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].place_id, 297_441_204);
    assert!((candidates[0].lat - 16.506_174_3).abs() < 1e-9);
    assert_eq!(candidates[0].address.city.as_deref(), Some("Vijayawada"));
}

#[tokio::test]
async fn search_without_country_filter_omits_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let config = GeocoderConfig::default()
        .with_base_url(server.uri())
        .with_country_codes("")
        .with_rate_limit(RateLimitConfig::per_second(100));
    let client = NominatimClient::with_config(config).unwrap();

    assert!(client.search("Colombo").await.unwrap().is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].url.query_pairs().any(|(k, _)| k == "countrycodes"));
}

#[tokio::test]
async fn server_error_maps_to_provider_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search("Guntur").await.unwrap_err();

    match err {
        GeocodeError::ProviderUnavailable { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Service Unavailable");
        }
        other => panic!("expected ProviderUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search("Guntur").await.unwrap_err();

    assert!(matches!(err, GeocodeError::Decode(_)));
    assert!(err.is_provider_unavailable());
}

#[tokio::test]
async fn rate_limited_starts_cooldown_and_fails_fast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "5"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());

    let first = client.search("Nellore").await.unwrap_err();
    assert!(matches!(
        first,
        GeocodeError::RateLimited { retry_after: Some(d) } if d == Duration::from_secs(5)
    ));

    // Served from the cooldown without touching the server
    let second = client.search("Nellore").await.unwrap_err();
    assert!(second.is_rate_limited());
    assert!(client.cooldown_remaining().is_some());
}

#[tokio::test]
async fn reverse_returns_single_place() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "16.5062"))
        .and(query_param("lon", "80.648"))
        .and(query_param("format", "json"))
        .and(query_param("addressdetails", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vijayawada()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let place = client
        .reverse(Coordinate::new(16.5062, 80.648))
        .await
        .expect("should parse place");

    assert_eq!(place.clean_name(), "vijayawada");
}

#[tokio::test]
async fn reverse_with_nothing_nearby_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"error": "Unable to geocode"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.reverse(Coordinate::new(0.0, -160.0)).await.unwrap_err();
    assert!(matches!(err, GeocodeError::Decode(_)));
}

#[tokio::test]
async fn matcher_retries_with_normalized_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Vijayawadaa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "vijaiavad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([vijayawada()])))
        .expect(1)
        .mount(&server)
        .await;

    let matcher = LocationMatcher::new(test_client(&server.uri()))
        .with_retry_pause(Duration::from_millis(10));

    let suggestions = matcher.suggest("Vijayawadaa").await;
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].clean_name(), "vijayawada");
}
