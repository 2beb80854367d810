//! MBTiles package access.
//!
//! An MBTiles package is a read-only SQLite database with a `tiles` table
//! (zoom/column/row to blob) and a key/value `metadata` table. This module
//! provides [`Mbtiles`], the crate's [`TileDataSource`](crate::tile::TileDataSource)
//! implementation, plus the typed [`Metadata`] read at startup.
//!
//! All database access goes through `tokio_rusqlite`, so queries never block
//! the async runtime.

mod metadata;
mod reader;

pub use metadata::{BBox, Metadata, Position};
pub use reader::Mbtiles;
