//! Read-only access to an MBTiles SQLite package.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, OpenFlags, OptionalExtension};
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::error::SourceError;
use crate::tile::TileDataSource;

use super::metadata::Metadata;

/// One open MBTiles package.
///
/// The underlying connection is opened read-only and driven from a dedicated
/// blocking thread by `tokio_rusqlite`; the handle is cheap to clone and safe
/// to share across request tasks.
#[derive(Clone)]
pub struct Mbtiles {
    conn: Connection,
    path: String,
}

impl Mbtiles {
    /// Open the package at `path` read-only.
    ///
    /// Fails with [`SourceError::Open`] when the file is missing or is not a
    /// readable SQLite database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let conn = Connection::open_with_flags(
            path.to_path_buf(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .await
        .map_err(|e| SourceError::Open {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        debug!(path = %path_str, "opened MBTiles package");

        Ok(Self {
            conn,
            path: path_str,
        })
    }

    /// Path this package was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Read and parse the package's `metadata` table.
    ///
    /// Also serves as the startup liveness probe: a package without a
    /// readable metadata table fails here before the server starts taking
    /// requests.
    pub async fn metadata(&self) -> Result<Metadata, SourceError> {
        let pairs = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("select name, value from metadata")?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(|e| SourceError::Query(e.to_string()))?;

        Metadata::from_pairs(pairs)
    }
}

#[async_trait]
impl TileDataSource for Mbtiles {
    /// Query the package for one tile.
    ///
    /// A query matching no row is `Ok(None)`; only genuine query failures
    /// become errors.
    async fn fetch_tile(
        &self,
        column: u32,
        row: u32,
        zoom: u8,
    ) -> Result<Option<Bytes>, SourceError> {
        let data = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare_cached(
                    "select tile_data from tiles \
                     where zoom_level = ?1 and tile_column = ?2 and tile_row = ?3",
                )?;
                let data = stmt
                    .query_row(params![zoom, column, row], |row| row.get::<_, Vec<u8>>(0))
                    .optional()?;
                Ok(data)
            })
            .await
            .map_err(|e| SourceError::Query(e.to_string()))?;

        Ok(data.map(Bytes::from))
    }
}

// =============================================================================
// Tests
// =============================================================================
