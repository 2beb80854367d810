//! Tile addressing in the quad-tree pyramid.

/// One tile position at a given zoom level.
///
/// `row` is interpreted under the XYZ convention (row 0 is the northernmost
/// row); [`TileCoordinate::flipped_row`] converts to the TMS convention used
/// inside MBTiles packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoordinate {
    pub zoom: u8,
    pub column: u32,
    pub row: u32,
}

impl TileCoordinate {
    pub fn new(zoom: u8, column: u32, row: u32) -> Self {
        Self { zoom, column, row }
    }

    /// Row index under the opposite numbering convention: `2^zoom - row - 1`.
    ///
    /// Returns `None` when `row` does not fit the pyramid at this zoom
    /// level (or the zoom exceeds the shiftable range); such a row cannot
    /// match a tile under the flipped convention.
    pub fn flipped_row(&self) -> Option<u32> {
        1u32.checked_shl(u32::from(self.zoom))?
            .checked_sub(self.row)?
            .checked_sub(1)
    }
}
