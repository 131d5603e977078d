//! Integration tests for the OpenWeather client using wiremock
//!
//! These tests run the client against a mock HTTP server and check the
//! error taxonomy as well as the request parameters.

use skypulse_core::{OpenWeatherClient, WeatherError, WeatherProvider};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const API_KEY: &str = "TEST_KEY";

fn current_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 501, "main": "Rain", "description": "chuva moderada", "icon": "10d"}],
        "main": {"temp": 11.4, "feels_like": 10.9, "humidity": 87, "pressure": 1009},
        "wind": {"speed": 5.1, "deg": 240},
        "dt": 1_700_000_000,
        "name": name,
        "cod": 200
    })
}

fn forecast_entry(i: i64) -> serde_json::Value {
    serde_json::json!({
        "dt": 1_700_000_000 + i * 3 * 3600,
        "main": {"temp": 10.0, "temp_min": 8.5, "temp_max": 12.5, "humidity": 75},
        "weather": [{"id": 803, "main": "Clouds", "description": "nublado", "icon": "04d"}],
        "wind": {"speed": 3.2},
        "pop": 0.35
    })
}

fn forecast_body(len: i64) -> serde_json::Value {
    serde_json::json!({
        "cod": "200",
        "message": 0,
        "cnt": len,
        "list": (0..len).map(forecast_entry).collect::<Vec<_>>(),
        "city": {"name": "London", "country": "GB"}
    })
}

fn create_test_client(mock_server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new(Some(API_KEY.to_string())).with_base_url(mock_server.uri())
}

// ============================================================================
// Success scenarios
// ============================================================================

#[tokio::test]
async fn current_by_city_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "pt_br"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let current = client
        .fetch_current_by_city("London")
        .await
        .expect("current weather");

    assert_eq!(current.location_name, "London");
    assert!((current.temperature_celsius - 11.4).abs() < 1e-9);
    assert_eq!(current.humidity_percent, 87);
    assert!((current.wind_speed_meters_per_second - 5.1).abs() < 1e-9);
    assert_eq!(current.conditions.len(), 1);
    assert_eq!(current.conditions[0].category, "Rain");
    assert_eq!(current.conditions[0].description, "chuva moderada");
    assert_eq!(current.conditions[0].icon.as_deref(), Some("10d"));
}

#[tokio::test]
async fn current_by_coordinates_sends_lat_lon() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "-8.05"))
        .and(query_param("lon", "-34.9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Recife")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let current = client
        .fetch_current_by_coordinates(-8.05, -34.9)
        .await
        .expect("current");

    assert_eq!(current.location_name, "Recife");
}

#[tokio::test]
async fn missing_wind_defaults_to_zero() {
    let mock_server = MockServer::start().await;

    let mut body = current_body("London");
    body.as_object_mut().expect("object").remove("wind");

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let current = client
        .fetch_current_by_city("London")
        .await
        .expect("current");

    assert_eq!(current.wind_speed_meters_per_second, 0.0);
}

#[tokio::test]
async fn forecast_by_city_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(40)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let series = client
        .fetch_forecast_by_city("London")
        .await
        .expect("forecast");

    assert_eq!(series.len(), 40);
    assert_eq!(series[0].timestamp_seconds, 1_700_000_000);
    assert_eq!(series[1].timestamp_seconds, 1_700_000_000 + 3 * 3600);
    assert!((series[0].temperature_min - 8.5).abs() < 1e-9);
    assert!((series[0].temperature_max - 12.5).abs() < 1e-9);
    assert!((series[0].precipitation_probability - 0.35).abs() < 1e-9);
    assert_eq!(series[0].conditions[0].category, "Clouds");
}

#[tokio::test]
async fn forecast_by_coordinates_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let series = client
        .fetch_forecast_by_coordinates(51.5, -0.12)
        .await
        .expect("forecast");

    assert_eq!(series.len(), 3);
}

// ============================================================================
// Error handling scenarios
// ============================================================================

#[tokio::test]
async fn missing_api_key_issues_no_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = OpenWeatherClient::new(None).with_base_url(mock_server.uri());

    assert_eq!(
        client.fetch_current_by_city("London").await.unwrap_err(),
        WeatherError::Configuration
    );
    assert_eq!(
        client
            .fetch_current_by_coordinates(51.5, -0.12)
            .await
            .unwrap_err(),
        WeatherError::Configuration
    );
    assert_eq!(
        client.fetch_forecast_by_city("London").await.unwrap_err(),
        WeatherError::Configuration
    );
    assert_eq!(
        client
            .fetch_forecast_by_coordinates(51.5, -0.12)
            .await
            .unwrap_err(),
        WeatherError::Configuration
    );

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn not_found_uses_provider_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"message": "city not found"})),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.fetch_current_by_city("Atlantis").await.unwrap_err();

    assert_eq!(err, WeatherError::provider(404, "city not found"));
}

#[tokio::test]
async fn server_error_without_message_uses_generic_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.fetch_forecast_by_city("London").await.unwrap_err();

    assert_eq!(
        err,
        WeatherError::provider(502, "Request failed with status code 502")
    );
}

#[tokio::test]
async fn error_payload_with_success_status_is_provider_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"cod": "401", "message": "Invalid API key"})),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.fetch_current_by_city("London").await.unwrap_err();

    assert_eq!(err, WeatherError::provider(401, "Invalid API key"));
}

#[tokio::test]
async fn invalid_json_is_provider_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_current_by_city("London").await;

    assert!(
        matches!(result, Err(WeatherError::Provider { status_code: 200, .. })),
        "Expected Provider error, got: {result:?}"
    );
}

#[tokio::test]
async fn empty_conditions_is_provider_error() {
    let mock_server = MockServer::start().await;

    let mut body = current_body("London");
    body["weather"] = serde_json::json!([]);

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_current_by_city("London").await;

    assert!(
        matches!(result, Err(WeatherError::Provider { .. })),
        "Expected Provider error, got: {result:?}"
    );
}

#[tokio::test]
async fn forecast_entry_without_conditions_is_provider_error() {
    let mock_server = MockServer::start().await;

    let mut body = forecast_body(3);
    body["list"][1]["weather"] = serde_json::json!([]);

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_forecast_by_city("London").await;

    assert!(
        matches!(result, Err(WeatherError::Provider { .. })),
        "Expected Provider error, got: {result:?}"
    );
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    // Nothing listens on the discard port.
    let client =
        OpenWeatherClient::new(Some(API_KEY.to_string())).with_base_url("http://127.0.0.1:9");
    let result = client.fetch_current_by_city("London").await;

    match result {
        Err(WeatherError::Network(message)) => assert!(!message.contains(API_KEY)),
        other => panic!("Expected Network error, got: {other:?}"),
    }
}
