//! Test utilities for integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::response::Response;
use bytes::Bytes;
use http_body_util::BodyExt;
use sha2::{Digest, Sha256};

use mbtiled::cache::ByteCache;
use mbtiled::error::SourceError;
use mbtiled::server::{create_router, AppState, RouterConfig};
use mbtiled::tile::{TileDataSource, TileResolver};

// =============================================================================
// Mock Tile Source with Fetch Tracking
// =============================================================================

/// An in-memory tile source that counts every fetch it serves.
///
/// Useful for verifying that the cache actually absorbs repeat requests and
/// that the fallback probe runs exactly when it should.
pub struct MapSource {
    tiles: HashMap<(u32, u32, u8), Bytes>,
    fail: bool,
    fetches: AtomicUsize,
}

impl MapSource {
    pub fn new() -> Self {
        Self {
            tiles: HashMap::new(),
            fail: false,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Source whose every query fails, for exercising the 500 path.
    pub fn failing() -> Self {
        Self {
            tiles: HashMap::new(),
            fail: true,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_tile(mut self, column: u32, row: u32, zoom: u8, data: &[u8]) -> Self {
        self.tiles
            .insert((column, row, zoom), Bytes::copy_from_slice(data));
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TileDataSource for MapSource {
    async fn fetch_tile(
        &self,
        column: u32,
        row: u32,
        zoom: u8,
    ) -> Result<Option<Bytes>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SourceError::Query("mock query failure".to_string()));
        }
        Ok(self.tiles.get(&(column, row, zoom)).cloned())
    }
}

// =============================================================================
// App Assembly
// =============================================================================

/// A router plus handles onto its collaborators for assertions.
pub struct TestApp {
    pub router: axum::Router,
    pub vector: Arc<MapSource>,
    pub cache: Arc<ByteCache>,
}

/// Build an app over mock sources with the given cache capacity.
pub fn build_app(vector: MapSource, hillshade: Option<MapSource>, cache_size: u64) -> TestApp {
    let cache = Arc::new(ByteCache::new(cache_size));
    let vector = Arc::new(vector);

    let state = AppState::new(
        TileResolver::with_shared_source(Arc::clone(&vector), Arc::clone(&cache)),
        hillshade.map(|source| TileResolver::new(source, Arc::clone(&cache))),
        Arc::clone(&cache),
    );

    TestApp {
        router: create_router(state, RouterConfig::new().without_tracing()),
        vector,
        cache,
    }
}

// =============================================================================
// Helpers
// =============================================================================

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

pub fn get(uri: &str) -> http::Request<Body> {
    http::Request::builder().uri(uri).body(Body::empty()).unwrap()
}
