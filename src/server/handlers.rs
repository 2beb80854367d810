//! Axum request handlers.
//!
//! Tile handlers derive the cache key from the request path, hand the
//! coordinate to the [`TileResolver`], and translate the outcome to the wire:
//! payload plus `etag`/`x-tile-cache` headers on success, an empty 404 body
//! for a tile that exists under neither row convention, and an empty 500
//! body for a data-source failure.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{error, warn};

use crate::cache::{ByteCache, CacheStatus};
use crate::error::SourceError;
use crate::tile::{TileCoordinate, TileDataSource, TileResolver};

use super::metrics::{Metrics, MetricsSnapshot};

/// Vector tiles are protobuf-encoded MVT, stored gzip-compressed.
const VECTOR_CONTENT_TYPE: &str = "application/x-protobuf";

/// Hillshade tiles are raster PNGs.
const HILLSHADE_CONTENT_TYPE: &str = "image/png";

const FONT_CONTENT_TYPE: &str = "application/x-protobuf";

// =============================================================================
// Application State
// =============================================================================

/// Shared state handed to every handler.
///
/// Both resolvers sit in front of the same [`ByteCache`], so the configured
/// byte capacity bounds the whole process.
pub struct AppState<S: TileDataSource> {
    /// Resolver over the vector tile package
    pub vector: Arc<TileResolver<S>>,

    /// Resolver over the hillshade package, when one is configured
    pub hillshade: Option<Arc<TileResolver<S>>>,

    /// The shared cache, for the status endpoint
    pub cache: Arc<ByteCache>,

    /// Request counters, recorded by middleware
    pub metrics: Arc<Metrics>,
}

impl<S: TileDataSource> AppState<S> {
    pub fn new(
        vector: TileResolver<S>,
        hillshade: Option<TileResolver<S>>,
        cache: Arc<ByteCache>,
    ) -> Self {
        Self {
            vector: Arc::new(vector),
            hillshade: hillshade.map(Arc::new),
            cache,
            metrics: Arc::new(Metrics::new()),
        }
    }
}

impl<S: TileDataSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            vector: Arc::clone(&self.vector),
            hillshade: self.hillshade.as_ref().map(Arc::clone),
            cache: Arc::clone(&self.cache),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Wire form of a data-source failure: log it, answer an empty 500.
///
/// Not-found never reaches this type; it is handled as a regular outcome in
/// the tile handlers.
pub struct HandlerError(SourceError);

impl From<SourceError> for HandlerError {
    fn from(err: SourceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "failed to fetch tile from data source");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

// =============================================================================
// Tile Handlers
// =============================================================================

/// `GET /{z}/{x}/{y}/tile.mvt`
pub async fn vector_tile_handler<S: TileDataSource>(
    State(state): State<AppState<S>>,
    Path((z, x, y)): Path<(u8, u32, u32)>,
    uri: Uri,
) -> Result<Response, HandlerError> {
    serve_tile(&state.vector, &uri, z, x, y, VECTOR_CONTENT_TYPE, true).await
}

/// `GET /{name}/{z}/{x}/{y}/tile.mvt`
///
/// The layer name only distinguishes cache keys (it is part of the request
/// path); all named variants read the same package.
pub async fn named_vector_tile_handler<S: TileDataSource>(
    State(state): State<AppState<S>>,
    Path((_name, z, x, y)): Path<(String, u8, u32, u32)>,
    uri: Uri,
) -> Result<Response, HandlerError> {
    serve_tile(&state.vector, &uri, z, x, y, VECTOR_CONTENT_TYPE, true).await
}

/// `GET /{z}/{x}/{y}/hs.png`
pub async fn hillshade_tile_handler<S: TileDataSource>(
    State(state): State<AppState<S>>,
    Path((z, x, y)): Path<(u8, u32, u32)>,
    uri: Uri,
) -> Result<Response, HandlerError> {
    let Some(resolver) = &state.hillshade else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    serve_tile(resolver, &uri, z, x, y, HILLSHADE_CONTENT_TYPE, false).await
}

/// `GET /{name}/{z}/{x}/{y}/hs.png`
pub async fn named_hillshade_tile_handler<S: TileDataSource>(
    State(state): State<AppState<S>>,
    Path((_name, z, x, y)): Path<(String, u8, u32, u32)>,
    uri: Uri,
) -> Result<Response, HandlerError> {
    let Some(resolver) = &state.hillshade else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };
    serve_tile(resolver, &uri, z, x, y, HILLSHADE_CONTENT_TYPE, false).await
}

async fn serve_tile<S: TileDataSource>(
    resolver: &TileResolver<S>,
    uri: &Uri,
    zoom: u8,
    column: u32,
    row: u32,
    content_type: &'static str,
    gzip_encoded: bool,
) -> Result<Response, HandlerError> {
    let coord = TileCoordinate::new(zoom, column, row);

    // The request path is the cache key: distinct tiles never collide and
    // repeated requests for the same URL hit after first population.
    let Some(tile) = resolver.resolve(uri.path(), coord).await? else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ETAG, tile.fingerprint.as_str())
        .header("x-tile-cache", if tile.cache_hit() { "hit" } else { "miss" });
    if gzip_encoded {
        builder = builder.header(header::CONTENT_ENCODING, "gzip");
    }

    Ok(builder.body(Body::from(tile.data)).unwrap())
}

// =============================================================================
// Status Handler
// =============================================================================

/// Body of `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub cache: CacheStatus,
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
}

/// `GET /status`: cache occupancy plus request counters.
pub async fn status_handler<S: TileDataSource>(
    State(state): State<AppState<S>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        cache: state.cache.status().await,
        metrics: state.metrics.snapshot().await,
    })
}

// =============================================================================
// Font Handler
// =============================================================================

/// `GET /fonts/{stack}/{file}`: serve PBF glyph files from disk.
///
/// Font stacks may be requested as a comma-separated list; glyphs are served
/// from the first stack named. Only `.pbf` files resolve, and path-shaped
/// names are rejected outright.
pub async fn font_handler(base: PathBuf, Path((stack, file)): Path<(String, String)>) -> Response {
    if !file.ends_with(".pbf") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let stack = stack.split(',').next().unwrap_or_default();
    if has_path_shape(stack) || has_path_shape(&file) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match tokio::fs::read(base.join(stack).join(&file)).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, FONT_CONTENT_TYPE)],
            bytes,
        )
            .into_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(stack, file = %file, "requested font file does not exist");
            StatusCode::NOT_FOUND.into_response()
        }
        Err(e) => {
            error!(stack, file = %file, error = %e, "failed to read font file");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn has_path_shape(segment: &str) -> bool {
    segment.is_empty()
        || segment == "."
        || segment.contains("..")
        || segment.contains('/')
        || segment.contains('\\')
}
