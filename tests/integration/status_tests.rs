//! Status endpoint shape and counters.

use axum::http::StatusCode;
use tower::ServiceExt;

use super::test_utils::{body_bytes, build_app, get, MapSource};

#[tokio::test]
async fn test_status_reports_cache_occupancy() {
    let app = build_app(MapSource::new().with_tile(2, 6, 3, b"mvt-bytes"), None, 1024);

    app.router.clone().oneshot(get("/3/2/1/tile.mvt")).await.unwrap();

    let response = app.router.clone().oneshot(get("/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["cache"]["elements"], 1);
    assert_eq!(body["cache"]["size"], 9);
    assert_eq!(body["cache"]["max_size"], 1024);
}

#[tokio::test]
async fn test_status_counts_requests() {
    let app = build_app(MapSource::new().with_tile(2, 6, 3, b"mvt-bytes"), None, 1024);

    // One 200, one 404.
    app.router.clone().oneshot(get("/3/2/1/tile.mvt")).await.unwrap();
    app.router.clone().oneshot(get("/3/0/0/tile.mvt")).await.unwrap();

    let response = app.router.clone().oneshot(get("/status")).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();

    // Counters are recorded once the response is written, so the in-flight
    // status request is not yet included in its own snapshot.
    assert_eq!(body["requests"], 2);
    assert_eq!(body["status"]["200"], 1);
    assert_eq!(body["status"]["404"], 1);
    assert_eq!(body["methods"]["GET"], 2);
    assert!(body["start"].is_string());
}
