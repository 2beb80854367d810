//! Tile resolution layer.
//!
//! This module turns a tile coordinate into a byte payload plus caching
//! metadata, hiding two sources of ambiguity behind one call:
//!
//! - **cache population**: the shared [`ByteCache`](crate::cache::ByteCache)
//!   is checked first and written back on a successful fetch (cache-aside);
//! - **row numbering**: MBTiles packages store rows in TMS order (row 0 at
//!   the bottom) while requests arrive in XYZ order (row 0 at the top), but
//!   not every package honors the convention, so a miss under the corrected
//!   row falls back to the raw row.
//!
//! # Components
//!
//! - [`TileCoordinate`]: zoom/column/row triple with TMS row conversion
//! - [`TileDataSource`]: the seam to the package reader
//! - [`TileResolver`]: the cache-aside resolution protocol
//! - [`ResolvedTile`] / [`TileOrigin`]: payload plus where it came from

mod coord;
mod resolver;

pub use coord::TileCoordinate;
pub use resolver::{ResolvedTile, TileDataSource, TileOrigin, TileResolver};
