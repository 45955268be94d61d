//! Integration tests for the relay HTTP surface.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! weather path talks to a local Open-Meteo stub bound to an ephemeral port,
//! so no test touches the network.

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::get,
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use breeze::config::WeatherConfig;
use breeze::llm::LlmProvider;
use breeze::llm::providers::dummy::DummyProvider;
use breeze::server::{AppState, build_router};
use breeze::weather::WeatherService;

// ── Harness ───────────────────────────────────────────────────────────────────

fn state(weather: Option<WeatherService>) -> AppState {
    AppState {
        llm: LlmProvider::Dummy(DummyProvider),
        weather,
        model: "test-model".into(),
        llm_url: "http://localhost:11434/v1/chat/completions".into(),
    }
}

/// Serve fixed geocoding + forecast payloads on an ephemeral port and return
/// a `WeatherConfig` pointing at it.
async fn spawn_open_meteo_stub(geocoding: Value, forecast: Value) -> WeatherConfig {
    let app = Router::new()
        .route("/v1/search", get(move || async move { Json(geocoding.clone()) }))
        .route("/v1/forecast", get(move || async move { Json(forecast.clone()) }));
    serve_stub(app).await
}

async fn serve_stub(app: Router) -> WeatherConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    WeatherConfig {
        enabled: true,
        geocoding_url: format!("{base}/v1/search"),
        forecast_url: format!("{base}/v1/forecast"),
        timeout_seconds: 5,
    }
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn austin_geocoding() -> Value {
    json!({
        "results": [{
            "latitude": 30.27,
            "longitude": -97.74,
            "name": "Austin",
            "admin1": "Texas",
            "country_code": "US"
        }]
    })
}

fn austin_forecast() -> Value {
    json!({
        "current": {
            "temperature_2m": 31.4,
            "apparent_temperature": 34.0,
            "relative_humidity_2m": 55.0,
            "wind_speed_10m": 12.2,
            "weather_code": 2
        },
        "daily": {
            "temperature_2m_max": [35.1],
            "temperature_2m_min": [24.9],
            "uv_index_max": [7.0]
        }
    })
}

// ── /health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_model() {
    let app = build_router(state(None));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["llm_url"], "http://localhost:11434/v1/chat/completions");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = build_router(state(None));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );
}

// ── /chat validation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_message_rejected() {
    let app = build_router(state(None));
    let response = app.oneshot(chat_request(json!({ "message": "   " }))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Message is required");
}

#[tokio::test]
async fn missing_message_field_rejected() {
    let app = build_router(state(None));
    let response = app.oneshot(chat_request(json!({}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Message is required");
}

// ── /chat LLM path ────────────────────────────────────────────────────────────

#[tokio::test]
async fn llm_path_returns_reply() {
    let app = build_router(state(None));
    let response = app
        .oneshot(chat_request(json!({ "message": "tell me a joke" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["reply"], "[echo] tell me a joke");
    assert!(body.get("ui").is_none());
}

#[tokio::test]
async fn weather_disabled_routes_to_llm() {
    // weather = None mirrors `[weather] enabled = false`.
    let app = build_router(state(None));
    let response = app
        .oneshot(chat_request(json!({ "message": "weather in Austin" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["reply"], "[echo] weather in Austin");
}

// ── /chat weather path ────────────────────────────────────────────────────────

#[tokio::test]
async fn weather_intent_returns_card() {
    let cfg = spawn_open_meteo_stub(austin_geocoding(), austin_forecast()).await;
    let weather = WeatherService::new(&cfg).unwrap();
    let app = build_router(state(Some(weather)));

    let response = app
        .oneshot(chat_request(json!({ "message": "what's the weather in Austin?" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["reply"],
        "⛅ Austin, Texas: Partly cloudy. 31° feels 34°. H:35° / L:25°  •  Humidity 55%  •  Wind 12 km/h."
    );
    assert_eq!(body["ui"]["type"], "weather");
    assert_eq!(body["ui"]["location"], "Austin, Texas");
    assert_eq!(body["ui"]["feelsLike"], 34.0);
    assert_eq!(body["ui"]["icon"], "⛅");
}

#[tokio::test]
async fn unknown_city_gets_apology() {
    let cfg = spawn_open_meteo_stub(json!({ "results": [] }), austin_forecast()).await;
    let weather = WeatherService::new(&cfg).unwrap();
    let app = build_router(state(Some(weather)));

    let response = app
        .oneshot(chat_request(json!({ "message": "weather in Atlantis" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["reply"], "Sorry, I couldn't find weather for 'Atlantis'.");
    assert!(body.get("ui").is_none());
}

#[tokio::test]
async fn geocoder_failure_is_server_error() {
    let app_stub = Router::new().route(
        "/v1/search",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let cfg = serve_stub(app_stub).await;
    let weather = WeatherService::new(&cfg).unwrap();
    let app = build_router(state(Some(weather)));

    let response = app
        .oneshot(chat_request(json!({ "message": "weather in Austin" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Weather lookup failed:"), "got: {error}");
}

#[tokio::test]
async fn non_weather_words_around_intent_still_detected() {
    let cfg = spawn_open_meteo_stub(austin_geocoding(), austin_forecast()).await;
    let weather = WeatherService::new(&cfg).unwrap();
    let app = build_router(state(Some(weather)));

    let response = app
        .oneshot(chat_request(json!({ "message": "hey, weather forecast for Austin" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ui"]["type"], "weather");
}
