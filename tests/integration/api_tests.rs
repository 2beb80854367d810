//! Tile endpoint behavior over the full router.

use axum::http::StatusCode;
use tower::ServiceExt;

use super::test_utils::{body_bytes, build_app, get, sha256_hex, MapSource};

#[tokio::test]
async fn test_vector_tile_roundtrip() {
    // Request row 1 at zoom 3 maps to TMS row 6.
    let app = build_app(MapSource::new().with_tile(2, 6, 3, b"mvt-bytes"), None, 1024);

    let response = app.router.clone().oneshot(get("/3/2/1/tile.mvt")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/x-protobuf"
    );
    assert_eq!(response.headers().get("content-encoding").unwrap(), "gzip");
    assert_eq!(
        response.headers().get("etag").unwrap(),
        sha256_hex(b"mvt-bytes").as_str()
    );
    assert_eq!(response.headers().get("x-tile-cache").unwrap(), "miss");

    let body = body_bytes(response).await;
    assert_eq!(&body[..], b"mvt-bytes");
}

#[tokio::test]
async fn test_named_route_serves_same_package() {
    let app = build_app(MapSource::new().with_tile(2, 6, 3, b"mvt-bytes"), None, 1024);

    let response = app
        .router
        .clone()
        .oneshot(get("/roads/3/2/1/tile.mvt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&body_bytes(response).await[..], b"mvt-bytes");

    // The named and unnamed paths are distinct cache entries.
    let response = app.router.clone().oneshot(get("/3/2/1/tile.mvt")).await.unwrap();
    assert_eq!(response.headers().get("x-tile-cache").unwrap(), "miss");
    assert_eq!(app.cache.status().await.elements, 2);
}

#[tokio::test]
async fn test_raw_row_fallback_served() {
    // Tile stored under the raw request row only: the package does not
    // follow the TMS convention, and the server accommodates it.
    let app = build_app(MapSource::new().with_tile(2, 1, 3, b"xyz-bytes"), None, 1024);

    let response = app.router.clone().oneshot(get("/3/2/1/tile.mvt")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&body_bytes(response).await[..], b"xyz-bytes");
    // TMS probe missed, raw-row probe hit.
    assert_eq!(app.vector.fetch_count(), 2);
}

#[tokio::test]
async fn test_missing_tile_is_empty_404() {
    let app = build_app(MapSource::new(), None, 1024);

    let response = app.router.clone().oneshot(get("/3/2/1/tile.mvt")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_source_failure_is_empty_500() {
    let app = build_app(MapSource::failing(), None, 1024);

    let response = app.router.clone().oneshot(get("/3/2/1/tile.mvt")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_bytes(response).await.is_empty());
    // The failed primary probe must not be followed by the fallback.
    assert_eq!(app.vector.fetch_count(), 1);
}

#[tokio::test]
async fn test_hillshade_not_configured() {
    let app = build_app(MapSource::new().with_tile(2, 6, 3, b"mvt"), None, 1024);

    let response = app.router.clone().oneshot(get("/3/2/1/hs.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hillshade_tile_roundtrip() {
    let hillshade = MapSource::new().with_tile(2, 6, 3, b"png-bytes");
    let app = build_app(MapSource::new(), Some(hillshade), 1024);

    let response = app.router.clone().oneshot(get("/3/2/1/hs.png")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "image/png");
    // Hillshade payloads are not gzip-wrapped.
    assert!(response.headers().get("content-encoding").is_none());
    assert_eq!(&body_bytes(response).await[..], b"png-bytes");
}

#[tokio::test]
async fn test_clacks_overhead_header() {
    let app = build_app(MapSource::new(), None, 1024);

    let response = app.router.clone().oneshot(get("/status")).await.unwrap();
    assert_eq!(
        response.headers().get("x-clacks-overhead").unwrap(),
        "GNU Terry Pratchett"
    );
}

#[tokio::test]
async fn test_fonts_served_from_static_dir() {
    use std::sync::Arc;

    use mbtiled::cache::ByteCache;
    use mbtiled::server::{create_router, AppState, RouterConfig};
    use mbtiled::tile::TileResolver;

    let dir = tempfile::TempDir::new().unwrap();
    let font_dir = dir.path().join("fonts").join("Noto Sans Regular");
    std::fs::create_dir_all(&font_dir).unwrap();
    std::fs::write(font_dir.join("0-255.pbf"), b"glyphs").unwrap();

    let cache = Arc::new(ByteCache::new(1024));
    let state = AppState::new(
        TileResolver::new(MapSource::new(), Arc::clone(&cache)),
        None,
        cache,
    );
    let router = create_router(
        state,
        RouterConfig::new()
            .with_static_dir(dir.path())
            .without_tracing(),
    );

    let response = router
        .clone()
        .oneshot(get("/fonts/Noto%20Sans%20Regular/0-255.pbf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(&body_bytes(response).await[..], b"glyphs");

    // A comma-separated stack list serves from the first stack named.
    let response = router
        .clone()
        .oneshot(get("/fonts/Noto%20Sans%20Regular,Fallback/0-255.pbf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Only .pbf files resolve.
    let response = router
        .clone()
        .oneshot(get("/fonts/Noto%20Sans%20Regular/0-255.ttf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Unknown glyph ranges are a 404, not a server error.
    let response = router
        .clone()
        .oneshot(get("/fonts/Noto%20Sans%20Regular/256-511.pbf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_coordinates_rejected() {
    let app = build_app(MapSource::new().with_tile(2, 6, 3, b"mvt"), None, 1024);

    let response = app
        .router
        .clone()
        .oneshot(get("/three/2/1/tile.mvt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.vector.fetch_count(), 0);
}
