mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{empty_server, seeded_server};

#[tokio::test]
async fn list_returns_every_record() {
    let (server, _stores) = seeded_server();
    let response = server.get("/api/emergency-bells").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 4);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn missing_document_lists_nothing() {
    let (server, _stores) = empty_server();
    let body: Value = server.get("/api/emergency-bells").await.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn nearby_sorts_by_distance_with_default_radius() {
    let (server, _stores) = seeded_server();
    let response = server
        .get("/api/emergency-bells/nearby?lat=37.5665&lng=126.9780")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["radius_km"], 2.0);
    assert_eq!(body["center"], json!({"lat": 37.5665, "lng": 126.978}));
    assert_eq!(body["count"], 2);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data[0]["관리번호"], "B-001");
    assert_eq!(data[0]["distance"], 0.0);
    assert_eq!(data[1]["관리번호"], "B-002");
    assert_eq!(data[1]["distance"], 0.44);
}

#[tokio::test]
async fn nearby_wider_radius_reaches_further_bells() {
    let (server, _stores) = seeded_server();
    let body: Value = server
        .get("/api/emergency-bells/nearby?lat=37.5665&lng=126.9780&radius=6")
        .await
        .json();

    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["관리번호"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["B-001", "B-002", "B-003"]);
}

#[tokio::test]
async fn nearby_without_coordinates_is_rejected() {
    let (server, _stores) = seeded_server();
    for query in ["", "?lat=37.5", "?lat=abc&lng=127.0", "?lat=0&lng=127.0"] {
        let response = server
            .get(&format!("/api/emergency-bells/nearby{query}"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("lat"));
    }
}

#[tokio::test]
async fn filter_by_purpose() {
    let (server, _stores) = seeded_server();

    let body: Value = server
        .get("/api/emergency-bells/filter")
        .add_query_param("purpose", "방범용")
        .await
        .json();
    assert_eq!(body["filter"], "방범용");
    assert_eq!(body["count"], 2);

    let body: Value = server.get("/api/emergency-bells/filter").await.json();
    assert_eq!(body["filter"], "all");
    assert_eq!(body["count"], 4);

    let body: Value = server
        .get("/api/emergency-bells/filter?purpose=nothing-matches")
        .await
        .json();
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn stats_group_missing_keys_as_other_and_nulls_apart() {
    let (server, _stores) = seeded_server();
    let body: Value = server.get("/api/emergency-bells/stats").await.json();

    assert_eq!(body["success"], true);
    assert_eq!(body["total_count"], 4);
    assert_eq!(body["district_stats"]["서울특별시 중구"], 2);
    assert_eq!(body["district_stats"]["서울특별시 종로구"], 2);
    assert_eq!(body["purpose_stats"]["방범용"], 2);
    assert_eq!(body["location_stats"]["기타"], 1);
    assert_eq!(body["location_stats"]["null"], 1);
    assert_eq!(body["location_stats"]["도로"], 1);
}

#[tokio::test]
async fn edits_to_the_document_are_visible_immediately() {
    let (server, stores) = seeded_server();
    stores.write_bells(&json!([{"설치목적": "공원"}]));

    let body: Value = server.get("/api/emergency-bells").await.json();
    assert_eq!(body["count"], 1);
}
