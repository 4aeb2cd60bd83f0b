//! Blocked-tile derivation and wall-margin inflation.

use std::collections::{BTreeSet, HashSet};

use dungeon_core::{ObjectKind, TileCoord};

use crate::{ObjectLayer, TerrainGrid};

/// Set of impassable tiles.
pub type BlockedSet = HashSet<TileCoord>;

/// Terrain symbols that stop movement outright.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolidTerrain {
    symbols: BTreeSet<char>,
}

impl SolidTerrain {
    /// Creates a solid-terrain set from the provided symbols.
    pub fn from_symbols<I: IntoIterator<Item = char>>(symbols: I) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }

    /// Reports whether the terrain symbol is solid.
    #[must_use]
    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }
}

impl Default for SolidTerrain {
    /// Walls, water (including shore pieces), void and trees.
    fn default() -> Self {
        Self::from_symbols("#~VT12345678IJKL".chars())
    }
}

/// Object kinds that occupy their tile completely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockingObjects {
    kinds: BTreeSet<ObjectKind>,
}

impl BlockingObjects {
    /// Creates a blocking-object set from the provided kinds.
    pub fn from_kinds<I: IntoIterator<Item = ObjectKind>>(kinds: I) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Reports whether the object blocks its tile.
    #[must_use]
    pub fn contains(&self, kind: ObjectKind) -> bool {
        self.kinds.contains(&kind)
    }
}

impl Default for BlockingObjects {
    fn default() -> Self {
        Self::from_kinds([
            ObjectKind::House,
            ObjectKind::Table,
            ObjectKind::Door,
            ObjectKind::ChestClosed,
            ObjectKind::ChestOpen,
        ])
    }
}

/// Collects every grid tile whose terrain is solid or whose object blocks.
///
/// Objects stored outside the grid are ignored. An empty grid yields an empty
/// set.
#[must_use]
pub fn compute_blocked(
    grid: &TerrainGrid,
    solid: &SolidTerrain,
    objects: &ObjectLayer,
    blocking: &BlockingObjects,
) -> BlockedSet {
    grid.cells()
        .filter(|(tile, symbol)| {
            solid.contains(*symbol) || objects.get(*tile).is_some_and(|kind| blocking.contains(kind))
        })
        .map(|(tile, _)| tile)
        .collect()
}

/// Expands a blocked set by `margin` tiles of Chebyshev distance.
///
/// Every blocked tile shadows the `(2 * margin + 1)^2` square around it,
/// clipped to `[0, width) x [0, height)`. A zero margin returns a copy of the
/// input, so the result is always a superset of `blocked`.
#[must_use]
pub fn inflate(blocked: &BlockedSet, width: u32, height: u32, margin: u32) -> BlockedSet {
    let mut inflated = blocked.clone();
    if margin == 0 {
        return inflated;
    }

    let margin = i32::try_from(margin).unwrap_or(i32::MAX);
    for tile in blocked {
        for row_offset in -margin..=margin {
            for column_offset in -margin..=margin {
                let neighbor = TileCoord::new(
                    tile.column().saturating_add(column_offset),
                    tile.row().saturating_add(row_offset),
                );
                if neighbor.in_bounds(width, height) {
                    let _ = inflated.insert(neighbor);
                }
            }
        }
    }
    inflated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(tile: TileCoord) -> BlockedSet {
        std::iter::once(tile).collect()
    }

    #[test]
    fn zero_margin_returns_input_unchanged() {
        let blocked: BlockedSet = [TileCoord::new(1, 1), TileCoord::new(4, 7)]
            .into_iter()
            .collect();
        assert_eq!(inflate(&blocked, 10, 10, 0), blocked);
    }

    #[test]
    fn single_tile_inflates_to_three_by_three() {
        let inflated = inflate(&single(TileCoord::new(5, 5)), 10, 10, 1);
        assert_eq!(inflated.len(), 9);
        for row in 4..=6 {
            for column in 4..=6 {
                assert!(inflated.contains(&TileCoord::new(column, row)));
            }
        }
    }

    #[test]
    fn inflation_clamps_at_grid_edges() {
        assert_eq!(inflate(&single(TileCoord::new(0, 0)), 10, 10, 1).len(), 4);
        assert_eq!(inflate(&single(TileCoord::new(9, 5)), 10, 10, 1).len(), 6);
        assert_eq!(inflate(&single(TileCoord::new(5, 5)), 10, 10, 2).len(), 25);
    }

    #[test]
    fn inflation_is_superset_of_input() {
        let blocked: BlockedSet = [
            TileCoord::new(0, 0),
            TileCoord::new(3, 2),
            TileCoord::new(3, 3),
        ]
        .into_iter()
        .collect();
        let inflated = inflate(&blocked, 5, 5, 1);
        assert!(blocked.is_subset(&inflated));
    }

    #[test]
    fn compute_blocked_unions_terrain_and_objects() {
        let grid = TerrainGrid::from_rows(["#..", "...", "..~"]);
        let mut objects = ObjectLayer::new();
        let _ = objects.insert(TileCoord::new(1, 1), ObjectKind::Door);
        let _ = objects.insert(TileCoord::new(2, 0), ObjectKind::Coin);
        let _ = objects.insert(TileCoord::new(7, 7), ObjectKind::Table);

        let blocked = compute_blocked(
            &grid,
            &SolidTerrain::default(),
            &objects,
            &BlockingObjects::default(),
        );

        let expected: BlockedSet = [
            TileCoord::new(0, 0),
            TileCoord::new(1, 1),
            TileCoord::new(2, 2),
        ]
        .into_iter()
        .collect();
        assert_eq!(blocked, expected);
    }

    #[test]
    fn empty_grid_blocks_nothing() {
        let blocked = compute_blocked(
            &TerrainGrid::default(),
            &SolidTerrain::default(),
            &ObjectLayer::new(),
            &BlockingObjects::default(),
        );
        assert!(blocked.is_empty());
    }
}
