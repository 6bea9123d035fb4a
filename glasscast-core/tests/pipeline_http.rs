//! Drives the pipeline over real HTTP against an in-process axum server.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use glasscast_core::{
    ApiRequest, EndpointConfig, FavoriteCity, NetworkError, NetworkService,
    network::ReqwestTransport,
    service::{DatabaseService, SupabaseDatabaseService},
};
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn echo_handler(headers: HeaderMap, body: String) -> impl IntoResponse {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned);
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    Json(json!({
        "apikey": header("apikey"),
        "authorization": header("authorization"),
        "content_type": header("content-type"),
        "accept": header("accept"),
        "body": body,
    }))
}

async fn favorites_handler(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    if query.get("user_id").map(String::as_str) == Some("eq.u1") {
        Json(json!([{
            "id": 3,
            "user_id": "u1",
            "city_name": "Lisbon",
            "latitude": 38.72,
            "longitude": -9.14
        }]))
    } else {
        Json(json!([]))
    }
}

async fn token_handler() -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "invalid_grant", "error_description": "Invalid login credentials"})),
    )
}

async fn boom_handler() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

async fn slow_handler() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({}))
}

async fn spawn_server() -> TestServer {
    let app = Router::new()
        .route("/echo", post(echo_handler))
        .route("/rest/v1/favourite_cities", get(favorites_handler))
        .route("/auth/v1/token", post(token_handler))
        .route("/boom", get(boom_handler))
        .route("/slow", get(slow_handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server must run");
    });

    TestServer { base_url: format!("http://{address}"), task }
}

fn network(base_url: &str, timeout: Duration) -> NetworkService {
    let config = EndpointConfig::new(base_url, timeout)
        .with_header("apikey", "k1")
        .with_header("Authorization", "Bearer anon");
    NetworkService::with_transport(config, Arc::new(ReqwestTransport::new()))
}

#[tokio::test]
async fn headers_and_body_reach_server() {
    let server = spawn_server().await;
    let svc = network(&server.base_url, Duration::from_secs(5));

    let echoed: Value = svc
        .request(
            ApiRequest::post("/echo")
                .header("apikey", "k2")
                .bearer_auth("user-jwt")
                .json(&json!({"city": "Lisbon"})),
        )
        .await
        .expect("echo succeeds");

    assert_eq!(echoed["apikey"], "k2");
    assert_eq!(echoed["authorization"], "Bearer user-jwt");
    assert_eq!(echoed["content_type"], "application/json");
    assert_eq!(echoed["accept"], "application/json");
    assert_eq!(echoed["body"], json!({"city": "Lisbon"}));
}

#[tokio::test]
async fn favorites_adapter_over_http() {
    let server = spawn_server().await;
    let db = SupabaseDatabaseService::new(network(&server.base_url, Duration::from_secs(5)));

    let rows: Vec<FavoriteCity> = db.favorite_cities("u1", "jwt").await.expect("list succeeds");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].city_name, "Lisbon");

    let none = db.favorite_cities("u2", "jwt").await.expect("list succeeds");
    assert!(none.is_empty());
}

#[tokio::test]
async fn error_body_message_is_extracted() {
    let server = spawn_server().await;
    let svc = network(&server.base_url, Duration::from_secs(5));

    let err = svc
        .request::<Value>(ApiRequest::post("/auth/v1/token").query("grant_type", "password"))
        .await
        .unwrap_err();

    assert!(matches!(err, NetworkError::ApiMessage(ref msg) if msg == "Invalid login credentials"));
}

#[tokio::test]
async fn plain_text_500_is_server_error() {
    let server = spawn_server().await;
    let svc = network(&server.base_url, Duration::from_secs(5));

    let err = svc.request::<Value>(ApiRequest::get("/boom")).await.unwrap_err();

    match err {
        NetworkError::ServerError { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body.as_deref(), Some("upstream exploded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_route_is_server_error_404() {
    let server = spawn_server().await;
    let svc = network(&server.base_url, Duration::from_secs(5));

    let err = svc.request::<Value>(ApiRequest::get("/missing")).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = spawn_server().await;
    let svc = network(&server.base_url, Duration::from_millis(100));

    let err = svc.request::<Value>(ApiRequest::get("/slow")).await.unwrap_err();

    assert!(matches!(err, NetworkError::Timeout), "unexpected error: {err:?}");
}

#[tokio::test]
async fn refused_connection_is_network_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let svc = network(&format!("http://{address}"), Duration::from_secs(5));
    let err = svc.request::<Value>(ApiRequest::get("/anything")).await.unwrap_err();

    assert!(matches!(err, NetworkError::NetworkUnavailable), "unexpected error: {err:?}");
}
