//! # mbtiled
//!
//! A tile server for MBTiles map packages.
//!
//! Serves pre-rendered vector tiles (gzip-compressed MVT) and raster
//! hillshade tiles over HTTP, with a single byte-bounded in-memory LRU cache
//! in front of the package reads so hot tiles never touch SQLite twice.
//!
//! ## Features
//!
//! - **Byte-bounded LRU cache**: capacity in bytes, not entries; strict
//!   recency eviction; SHA-256 content fingerprints reused as ETags
//! - **Row-convention fallback**: requests use XYZ row numbering, packages
//!   are expected in TMS; packages that deviate are still served, with a
//!   warning
//! - **Observability**: a `/status` endpoint exposing cache occupancy and
//!   request counters
//!
//! ## Architecture
//!
//! - [`cache`] - byte-bounded LRU cache with content fingerprints
//! - [`tile`] - tile coordinates and the cache-aside resolution protocol
//! - [`mbtiles`] - read-only SQLite package access
//! - [`server`] - axum handlers, routes, and request metrics
//! - [`config`] - CLI flags and cache-size parsing
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use mbtiled::cache::ByteCache;
//! use mbtiled::mbtiles::Mbtiles;
//! use mbtiled::server::{create_router, AppState, RouterConfig};
//! use mbtiled::tile::TileResolver;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = Arc::new(ByteCache::new(512 * 1024 * 1024));
//!     let package = Mbtiles::open("zoomstack.mbtiles").await.unwrap();
//!     let resolver = TileResolver::new(package, Arc::clone(&cache));
//!
//!     let state = AppState::new(resolver, None, cache);
//!     let router = create_router(state, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod mbtiles;
pub mod server;
pub mod tile;

// Re-export commonly used types
pub use cache::{ByteCache, CacheStatus};
pub use config::{parse_cache_size, Config};
pub use error::SourceError;
pub use mbtiles::{Mbtiles, Metadata};
pub use server::{create_router, AppState, Metrics, RouterConfig};
pub use tile::{ResolvedTile, TileCoordinate, TileDataSource, TileOrigin, TileResolver};
