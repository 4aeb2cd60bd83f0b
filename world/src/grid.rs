//! Terrain storage and pixel/tile conversion.

use dungeon_core::{PixelRect, TileCoord};

/// Rectangular grid of terrain symbols, stored row-major.
///
/// Width and height derive from the row count and the first row's length. The
/// loader upstream pads rows to a rectangle; lookups on a ragged grid still
/// never panic, they simply miss.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TerrainGrid {
    rows: Vec<Vec<char>>,
    width: u32,
    height: u32,
}

impl TerrainGrid {
    /// Builds a grid from textual rows, one terrain symbol per character.
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows: Vec<Vec<char>> = rows
            .into_iter()
            .map(|row| row.as_ref().chars().collect())
            .collect();
        let height = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let width = rows
            .first()
            .map_or(0, |row| u32::try_from(row.len()).unwrap_or(u32::MAX));
        Self {
            rows,
            width,
            height,
        }
    }

    /// Builds a grid of the given size filled with a single symbol.
    #[must_use]
    pub fn filled(width: u32, height: u32, symbol: char) -> Self {
        let row: String = std::iter::repeat(symbol)
            .take(usize::try_from(width).unwrap_or(0))
            .collect();
        Self::from_rows(std::iter::repeat(row).take(usize::try_from(height).unwrap_or(0)))
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Terrain symbol stored at the provided tile, if it lies inside the grid.
    #[must_use]
    pub fn symbol_at(&self, tile: TileCoord) -> Option<char> {
        if !tile.in_bounds(self.width, self.height) {
            return None;
        }
        let row = usize::try_from(tile.row()).ok()?;
        let column = usize::try_from(tile.column()).ok()?;
        self.rows.get(row)?.get(column).copied()
    }

    /// Overwrites the terrain symbol at a tile, returning the previous symbol.
    pub(crate) fn set_symbol(&mut self, tile: TileCoord, symbol: char) -> Option<char> {
        if !tile.in_bounds(self.width, self.height) {
            return None;
        }
        let row = usize::try_from(tile.row()).ok()?;
        let column = usize::try_from(tile.column()).ok()?;
        let slot = self.rows.get_mut(row)?.get_mut(column)?;
        Some(std::mem::replace(slot, symbol))
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (TileCoord, char)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, symbols)| {
            symbols.iter().enumerate().map(move |(column, symbol)| {
                (TileCoord::new(column as i32, row as i32), *symbol)
            })
        })
    }
}

/// Pixel/tile conversion for a grid of square tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridIndex {
    width: u32,
    height: u32,
    tile_size: i32,
}

impl GridIndex {
    /// Creates a grid index for the provided dimensions and tile edge length.
    #[must_use]
    pub const fn new(width: u32, height: u32, tile_size: i32) -> Self {
        Self {
            width,
            height,
            tile_size,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Length of a tile edge in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Tile containing the given pixel. Bounds are the caller's concern.
    #[must_use]
    pub const fn tile_of(&self, pixel_x: i32, pixel_y: i32) -> TileCoord {
        TileCoord::from_pixel(pixel_x, pixel_y, self.tile_size)
    }

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        tile.in_bounds(self.width, self.height)
    }

    /// Pixel rectangle covered by a tile.
    #[must_use]
    pub const fn tile_rect(&self, tile: TileCoord) -> PixelRect {
        PixelRect::of_tile(tile, self.tile_size)
    }

    /// Inclusive tile range overlapped by a rectangle, clamped to the grid.
    ///
    /// Returns `None` when the grid is empty or the clamped range is empty.
    #[must_use]
    pub fn tile_span(&self, rect: PixelRect) -> Option<(TileCoord, TileCoord)> {
        if self.width == 0 || self.height == 0 || self.tile_size <= 0 {
            return None;
        }
        let max_column = i32::try_from(self.width).unwrap_or(i32::MAX) - 1;
        let max_row = i32::try_from(self.height).unwrap_or(i32::MAX) - 1;

        let left = rect.left().div_euclid(self.tile_size).max(0);
        let right = (rect.right() - 1).div_euclid(self.tile_size).min(max_column);
        let top = rect.top().div_euclid(self.tile_size).max(0);
        let bottom = (rect.bottom() - 1).div_euclid(self.tile_size).min(max_row);

        if left > right || top > bottom {
            return None;
        }
        Some((TileCoord::new(left, top), TileCoord::new(right, bottom)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_follow_first_row() {
        let grid = TerrainGrid::from_rows(["..#", "...", "#.."]);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.symbol_at(TileCoord::new(2, 0)), Some('#'));
        assert_eq!(grid.symbol_at(TileCoord::new(3, 0)), None);
        assert_eq!(grid.symbol_at(TileCoord::new(0, -1)), None);
    }

    #[test]
    fn empty_grid_has_no_cells() {
        let grid = TerrainGrid::from_rows(Vec::<String>::new());
        assert_eq!(grid.width(), 0);
        assert_eq!(grid.height(), 0);
        assert_eq!(grid.cells().count(), 0);
    }

    #[test]
    fn tile_of_uses_integer_division() {
        let index = GridIndex::new(10, 10, 16);
        assert_eq!(index.tile_of(0, 0), TileCoord::new(0, 0));
        assert_eq!(index.tile_of(15, 16), TileCoord::new(0, 1));
        assert_eq!(index.tile_of(159, 40), TileCoord::new(9, 2));
    }

    #[test]
    fn tile_span_clamps_to_grid() {
        let index = GridIndex::new(4, 4, 16);
        let span = index.tile_span(PixelRect::new(-20, 10, 30, 40));
        assert_eq!(span, Some((TileCoord::new(0, 0), TileCoord::new(0, 3))));

        let outside = index.tile_span(PixelRect::new(100, 100, 8, 8));
        assert_eq!(outside, None);
    }

    #[test]
    fn tile_span_excludes_touching_neighbour() {
        let index = GridIndex::new(4, 4, 16);
        let span = index.tile_span(PixelRect::new(16, 16, 16, 16));
        assert_eq!(span, Some((TileCoord::new(1, 1), TileCoord::new(1, 1))));
    }
}
