//! Object layer storage.

use std::collections::BTreeMap;

use dungeon_core::{ObjectKind, TileCoord};

/// Sparse mapping from tile to the object occupying it.
///
/// Ordered by tile so iteration is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectLayer {
    entries: BTreeMap<TileCoord, ObjectKind>,
}

impl ObjectLayer {
    /// Creates an empty object layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Object occupying the tile, if any.
    #[must_use]
    pub fn get(&self, tile: TileCoord) -> Option<ObjectKind> {
        self.entries.get(&tile).copied()
    }

    /// Stores an object at the tile, returning whatever was there before.
    pub fn insert(&mut self, tile: TileCoord, kind: ObjectKind) -> Option<ObjectKind> {
        self.entries.insert(tile, kind)
    }

    /// Removes the object at the tile, returning it.
    pub fn remove(&mut self, tile: TileCoord) -> Option<ObjectKind> {
        self.entries.remove(&tile)
    }

    /// Iterates objects in tile order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, ObjectKind)> + '_ {
        self.entries.iter().map(|(tile, kind)| (*tile, *kind))
    }

    /// Number of occupied tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no tile holds an object.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(TileCoord, ObjectKind)> for ObjectLayer {
    fn from_iter<T: IntoIterator<Item = (TileCoord, ObjectKind)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
