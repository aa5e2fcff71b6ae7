mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::{routing::get, Router};
use axum_test::TestServer;
use serde_json::{json, Value};

use common::seeded_server;
use safety_service::with_service_layers;

#[tokio::test]
async fn home_describes_the_api() {
    let (server, _stores) = seeded_server();
    let response = server.get("/").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(
        body["endpoints"],
        json!({
            "emergency_bells": "/api/emergency-bells",
            "community": "/api/community",
            "hotzone": "/api/hotzone"
        })
    );
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn health_reports_healthy() {
    let (server, _stores) = seeded_server();
    let body: Value = server.get("/api/health").await.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn unknown_route_gets_json_404() {
    let (server, _stores) = seeded_server();
    let response = server.get("/api/does-not-exist").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({"success": false, "error": "Endpoint not found"})
    );
}

#[tokio::test]
async fn resource_prefixes_accept_a_trailing_slash() {
    let (server, _stores) = seeded_server();

    for prefix in ["/api/emergency-bells", "/api/hotzone", "/api/community"] {
        let bare: Value = server.get(prefix).await.json();
        let response = server.get(&format!("{prefix}/")).await;
        response.assert_status_ok();
        let slashed: Value = response.json();
        assert_eq!(slashed["success"], true, "{prefix}/");
        assert_eq!(slashed["data"], bare["data"], "{prefix}/");
    }
}

#[tokio::test]
async fn create_on_trailing_slash_prefix() {
    let (server, _stores) = seeded_server();

    let response = server
        .post("/api/hotzone/")
        .json(&json!({"area_name": "Seoul Station plaza", "risk_level": 3, "latitude": 37.5547, "longitude": 126.9707}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let id = response.json::<Value>()["hotzone_id"].as_i64().unwrap();
    server
        .get(&format!("/api/hotzone/{id}"))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/community/")
        .json(&json!({"title": "t", "content": "c", "author": "a"}))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert!(response.json::<Value>()["post_id"].as_i64().is_some());
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (server, _stores) = seeded_server();
    let response = server
        .get("/api/health")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("http://localhost:3000"),
        )
        .await;
    assert_eq!(response.header("access-control-allow-origin"), "*");
}

async fn explode() -> &'static str {
    panic!("handler exploded")
}

#[tokio::test]
async fn panicking_handler_becomes_500_envelope() {
    let app = with_service_layers(Router::new().route("/boom", get(explode)));
    let server = TestServer::new(app).expect("test server");

    let response = server.get("/boom").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({"success": false, "error": "Internal server error"})
    );
}
