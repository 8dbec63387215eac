//! Integration tests for the forecast client using wiremock
//!
//! These tests run the reqwest-backed sessions against a mock server and
//! check request shape, redirect handling and the caching of lookups.

use std::sync::Arc;

use domain::{Location, LocationResult, StationId};
use integration_kachelmann::http::DEFAULT_USER_AGENT;
use integration_kachelmann::{
    ForecastClient, HeaderConfig, KachelmannClient, KachelmannConfig, KachelmannError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path, query_param},
};

const FIXTURE: &str = include_str!("fixtures/nexthoursdays.html");

/// Create a client talking to the mock server with its own headers
///
/// # Panics
///
/// Panics if the client cannot be built.
fn create_client(server: &MockServer) -> (KachelmannClient, Arc<HeaderConfig>) {
    let headers = Arc::new(HeaderConfig::new());
    let config = KachelmannConfig::for_testing(format!("{}/de", server.uri()));
    let client = KachelmannClient::with_headers(&config, Arc::clone(&headers))
        .expect("Failed to create client");
    (client, headers)
}

fn forecast_page() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(FIXTURE)
}

#[tokio::test]
async fn test_forecast_by_station_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/de/ajax_pub/weathernexthoursdays"))
        .and(query_param("city_id", "2950159"))
        .and(query_param("lang", "de"))
        .and(query_param("units", "de"))
        .and(query_param("tf", "1"))
        .respond_with(forecast_page())
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = create_client(&server);
    let forecast = client
        .next_hours_days(&Location::from("2950159"))
        .await
        .unwrap()
        .expect("forecast");

    assert_eq!(forecast.hours().len(), 2);
    assert_eq!(forecast.hours()[0].sky.symbol, "overcast");
    assert_eq!(forecast.days()[0].friendly_name, "Montag");
}

#[tokio::test]
async fn test_forecast_by_name_follows_search_redirect_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/de/wetter/search"))
        .and(body_string_contains("forecast_action=wetter"))
        .and(body_string_contains("forecast_input=Berlin"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "/de/wetter/2950159-berlin"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/de/ajax_pub/weathernexthoursdays"))
        .and(query_param("city_id", "2950159"))
        .respond_with(forecast_page())
        .expect(2)
        .mount(&server)
        .await;

    // the redirect target itself must never be requested
    Mock::given(method("GET"))
        .and(path("/de/wetter/2950159-berlin"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = create_client(&server);
    let berlin = Location::from("Berlin");
    assert!(client.next_hours_days(&berlin).await.unwrap().is_some());
    assert!(client.next_hours_days(&berlin).await.unwrap().is_some());

    assert_eq!(
        client.resolver().cached("Berlin").await,
        Some(LocationResult::StationId(StationId::new(2_950_159)))
    );
}

#[tokio::test]
async fn test_unknown_location() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/de/wetter/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Keine Treffer</html>"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/de/ajax_pub/weathernexthoursdays"))
        .respond_with(forecast_page())
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = create_client(&server);
    let atlantis = Location::from("Atlantis");
    assert!(client.next_hours_days(&atlantis).await.unwrap().is_none());
    assert!(client.next_hours_days(&atlantis).await.unwrap().is_none());
}

#[tokio::test]
async fn test_search_failure_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/de/wetter/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let (client, _) = create_client(&server);
    let resolver = client.resolver();
    assert_eq!(resolver.lookup("Berlin").await.unwrap(), LocationResult::CouldNotRetrieve);
    assert_eq!(resolver.get_location("Berlin").await.unwrap(), None);
}

#[tokio::test]
async fn test_malformed_redirect() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/de/wetter/search"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/de/wetter/berlin"))
        .mount(&server)
        .await;

    let (client, _) = create_client(&server);
    let err = client
        .next_hours_days(&Location::from("Berlin"))
        .await
        .unwrap_err();
    assert!(matches!(err, KachelmannError::MalformedRedirect { .. }));
}

#[tokio::test]
async fn test_forecast_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/de/ajax_pub/weathernexthoursdays"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (client, _) = create_client(&server);
    let result = client.next_hours_days(&Location::from(42_u32)).await;
    assert!(matches!(result, Ok(None)));
}

#[tokio::test]
async fn test_forecast_layout_change() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/de/ajax_pub/weathernexthoursdays"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<div class="nexthours-scroll"><div><div></div></div></div>"#),
        )
        .mount(&server)
        .await;

    let (client, _) = create_client(&server);
    let err = client
        .next_hours_days(&Location::from(42_u32))
        .await
        .unwrap_err();
    assert!(matches!(err, KachelmannError::Parse(_)));
}

#[tokio::test]
async fn test_user_agent_follows_header_changes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("User-Agent", DEFAULT_USER_AGENT))
        .respond_with(forecast_page())
        .expect(1)
        .mount(&server)
        .await;

    let custom = format!("WetterBot/2.0 {DEFAULT_USER_AGENT}");
    Mock::given(method("GET"))
        .and(header("User-Agent", custom.as_str()))
        .respond_with(forecast_page())
        .expect(1)
        .mount(&server)
        .await;

    let (client, headers) = create_client(&server);
    let station = Location::from(42_u32);
    assert!(client.next_hours_days(&station).await.unwrap().is_some());

    headers.set_user_agent("WetterBot/2.0", false).unwrap();
    assert!(client.next_hours_days(&station).await.unwrap().is_some());
}

#[tokio::test]
async fn test_unreachable_server() {
    let config = KachelmannConfig::for_testing("http://127.0.0.1:9/de");
    let client = KachelmannClient::with_headers(&config, Arc::new(HeaderConfig::new()))
        .expect("Failed to create client");

    assert!(client.next_hours_days(&Location::from(42_u32)).await.unwrap().is_none());
    assert_eq!(
        client.resolver().lookup("Berlin").await.unwrap(),
        LocationResult::CouldNotRetrieve
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = KachelmannConfig::for_testing("ftp://example.com");
    let result = KachelmannClient::with_headers(&config, Arc::new(HeaderConfig::new()));
    assert!(matches!(result, Err(KachelmannError::Configuration(_))));
}
