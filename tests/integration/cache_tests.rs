//! Cache effectiveness over the HTTP surface.

use axum::http::StatusCode;
use tower::ServiceExt;

use super::test_utils::{body_bytes, build_app, get, MapSource};

#[tokio::test]
async fn test_repeat_request_hits_cache() {
    let app = build_app(MapSource::new().with_tile(2, 6, 3, b"mvt-bytes"), None, 1024);

    let first = app.router.clone().oneshot(get("/3/2/1/tile.mvt")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.headers().get("x-tile-cache").unwrap(), "miss");
    let first_etag = first.headers().get("etag").unwrap().clone();
    assert_eq!(app.vector.fetch_count(), 1);

    let second = app.router.clone().oneshot(get("/3/2/1/tile.mvt")).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers().get("x-tile-cache").unwrap(), "hit");
    assert_eq!(second.headers().get("etag").unwrap(), &first_etag);
    assert_eq!(&body_bytes(second).await[..], b"mvt-bytes");

    // The second request never touched the package.
    assert_eq!(app.vector.fetch_count(), 1);
}

#[tokio::test]
async fn test_distinct_tiles_cached_independently() {
    let source = MapSource::new()
        .with_tile(2, 6, 3, b"tile-a")
        .with_tile(3, 6, 3, b"tile-b");
    let app = build_app(source, None, 1024);

    let a = app.router.clone().oneshot(get("/3/2/1/tile.mvt")).await.unwrap();
    assert_eq!(a.headers().get("x-tile-cache").unwrap(), "miss");

    let b = app.router.clone().oneshot(get("/3/3/1/tile.mvt")).await.unwrap();
    assert_eq!(b.headers().get("x-tile-cache").unwrap(), "miss");

    let status = app.cache.status().await;
    assert_eq!(status.elements, 2);
    assert_eq!(status.size, 12);
}

#[tokio::test]
async fn test_misses_are_not_cached() {
    let app = build_app(MapSource::new(), None, 1024);

    for _ in 0..3 {
        let response = app.router.clone().oneshot(get("/3/2/1/tile.mvt")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // Absence is re-probed every time; only payloads populate the cache.
    assert_eq!(app.vector.fetch_count(), 6);
    assert_eq!(app.cache.status().await.elements, 0);
}

#[tokio::test]
async fn test_eviction_under_pressure_stays_within_capacity() {
    // Capacity fits two 256-byte tiles.
    let tile = vec![7u8; 256];
    let source = MapSource::new()
        .with_tile(0, 7, 3, &tile)
        .with_tile(1, 7, 3, &tile)
        .with_tile(2, 7, 3, &tile);
    let app = build_app(source, None, 512);

    for column in 0..3 {
        let uri = format!("/3/{column}/0/tile.mvt");
        let response = app.router.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let status = app.cache.status().await;
    assert_eq!(status.elements, 2);
    assert_eq!(status.size, 512);
    // The first-requested tile was the least recently used.
    assert!(!app.cache.exists("/3/0/0/tile.mvt").await);
    assert!(app.cache.exists("/3/2/0/tile.mvt").await);
}
