//! Cache-aside tile resolution with row-convention fallback.
//!
//! The resolver is the single entry point the HTTP handlers call for tile
//! bytes. Per request it runs:
//!
//! ```text
//! cache lookup ── hit ──────────────────────────────▶ done
//!      │ miss
//!      ▼
//! fetch (column, 2^zoom - row - 1, zoom)  TMS-corrected
//!      │ none                 │ error ──────────────▶ done (error)
//!      ▼                      ▼ found
//! fetch (column, row, zoom)   populate cache ───────▶ done
//!      │ none    │ found: warn (convention mismatch),
//!      ▼         ▼          populate cache ─────────▶ done
//! done (absent)
//! ```
//!
//! Only a clean no-rows result triggers the raw-row fallback; a genuine
//! source error short-circuits. The cache lock is never held across a
//! source fetch, so concurrent misses do not serialize behind one another.
//! Duplicate fetches for the same key are accepted and the last write wins,
//! which is harmless because tile payloads are immutable per coordinate.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::warn;

use crate::cache::ByteCache;
use crate::error::SourceError;

use super::coord::TileCoordinate;

/// Read-only query interface over a tile package.
///
/// `Ok(None)` means the query was valid but matched no stored tile, an
/// expected and common outcome for sparse coverage. An `Err` always means a
/// genuine I/O or query failure.
#[async_trait]
pub trait TileDataSource: Send + Sync + 'static {
    async fn fetch_tile(
        &self,
        column: u32,
        row: u32,
        zoom: u8,
    ) -> Result<Option<Bytes>, SourceError>;
}

/// Where a resolved payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileOrigin {
    /// Served from the cache; the data source was not touched
    Cache,

    /// Fetched under the TMS-corrected row (the expected convention)
    Tms,

    /// Fetched under the raw row: the package does not follow the TMS
    /// convention, which is worth surfacing but not an error
    Xyz,
}

/// A successfully resolved tile.
#[derive(Debug, Clone)]
pub struct ResolvedTile {
    /// The tile payload, exactly as stored in the package
    pub data: Bytes,

    /// SHA-256 fingerprint of `data`, suitable as an entity tag
    pub fingerprint: String,

    pub origin: TileOrigin,
}

impl ResolvedTile {
    /// Whether this response was served without touching the data source.
    pub fn cache_hit(&self) -> bool {
        self.origin == TileOrigin::Cache
    }
}

/// Resolves tile requests against a data source through the shared cache.
///
/// One resolver wraps one package; all resolvers in a process share the same
/// [`ByteCache`] so the configured byte capacity bounds the process as a
/// whole, not each package separately.
pub struct TileResolver<S: TileDataSource> {
    source: Arc<S>,
    cache: Arc<ByteCache>,
}

impl<S: TileDataSource> TileResolver<S> {
    pub fn new(source: S, cache: Arc<ByteCache>) -> Self {
        Self {
            source: Arc::new(source),
            cache,
        }
    }

    /// Create a resolver around an already-shared source.
    pub fn with_shared_source(source: Arc<S>, cache: Arc<ByteCache>) -> Self {
        Self { source, cache }
    }

    /// Resolve one tile request.
    ///
    /// `request_key` must uniquely identify the requested resource (the
    /// handlers pass the normalized request path) so distinct tiles never
    /// collide and identical requests hit the cache after first population.
    ///
    /// Returns `Ok(None)` when the tile exists under neither row convention,
    /// and an error only for a genuine data-source failure.
    pub async fn resolve(
        &self,
        request_key: &str,
        coord: TileCoordinate,
    ) -> Result<Option<ResolvedTile>, SourceError> {
        if let Some((data, fingerprint)) = self.cache.get(request_key).await {
            return Ok(Some(ResolvedTile {
                data,
                fingerprint,
                origin: TileOrigin::Cache,
            }));
        }

        let mut origin = TileOrigin::Tms;
        let mut tile = match coord.flipped_row() {
            Some(tms_row) => {
                self.source
                    .fetch_tile(coord.column, tms_row, coord.zoom)
                    .await?
            }
            // A row outside the pyramid has no TMS counterpart to probe.
            None => None,
        };

        if tile.is_none() {
            tile = self
                .source
                .fetch_tile(coord.column, coord.row, coord.zoom)
                .await?;

            if tile.is_some() {
                origin = TileOrigin::Xyz;
                warn!(
                    zoom = coord.zoom,
                    column = coord.column,
                    row = coord.row,
                    "tile found under raw row numbering, not TMS; package row convention mismatch"
                );
            }
        }

        let Some(data) = tile else {
            return Ok(None);
        };

        let fingerprint = self.cache.set(request_key, data.clone()).await;

        Ok(Some(ResolvedTile {
            data,
            fingerprint,
            origin,
        }))
    }
}

// =============================================================================
// Tests
// =============================================================================
