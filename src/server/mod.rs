//! HTTP layer for the tile server.
//!
//! Routes:
//!
//! ```text
//! /status                           cache status + request metrics (JSON)
//! /{z}/{x}/{y}/tile.mvt             vector tile
//! /{name}/{z}/{x}/{y}/tile.mvt      vector tile, named layer variant
//! /{z}/{x}/{y}/hs.png               hillshade tile (when configured)
//! /{name}/{z}/{x}/{y}/hs.png        hillshade tile, named layer variant
//! /fonts/{stack}/{file}             PBF glyph files
//! /*                                static web content fallback
//! ```
//!
//! Tile endpoints answer with the payload bytes, a `content-type` matching
//! the tile kind, an `etag` equal to the cache fingerprint, and an
//! `x-tile-cache: hit|miss` header; absence is an empty-body 404 and a data
//! source failure an empty-body 500.

pub mod handlers;
pub mod metrics;
pub mod routes;

pub use handlers::{
    font_handler, hillshade_tile_handler, named_hillshade_tile_handler,
    named_vector_tile_handler, status_handler, vector_tile_handler, AppState, HandlerError,
    StatusResponse,
};
pub use metrics::{Metrics, MetricsSnapshot};
pub use routes::{create_router, RouterConfig};
