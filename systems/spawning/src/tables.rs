use dungeon_core::{ObjectKind, Species, TileCoord};

/// Player spawn used when a table names none inside the loaded grid.
pub const DEFAULT_PLAYER_SPAWN: TileCoord = TileCoord::new(3, 3);

/// Maps with a fixed spawn table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapKind {
    /// Outdoor starting area.
    Overworld,
    /// Interior of the house on the overworld.
    House,
    /// Cave holding the blue heart.
    Cave,
}

impl MapKind {
    /// Fixed spawn table for the map.
    #[must_use]
    pub fn spawn_table(self) -> SpawnTable {
        match self {
            Self::Overworld => SpawnTable {
                player: Some(TileCoord::new(1, 1)),
                objects: vec![(TileCoord::new(5, 3), ObjectKind::House)],
                monsters: vec![
                    (TileCoord::new(10, 9), Species::Bat),
                    (TileCoord::new(18, 14), Species::GreenSlime),
                    (TileCoord::new(28, 10), Species::Orc),
                ],
            },
            Self::House => SpawnTable {
                player: Some(TileCoord::new(6, 3)),
                objects: vec![
                    (TileCoord::new(8, 2), ObjectKind::Table),
                    (TileCoord::new(13, 6), ObjectKind::Door),
                    (TileCoord::new(3, 3), ObjectKind::ChestClosed),
                ],
                monsters: Vec::new(),
            },
            Self::Cave => SpawnTable {
                player: Some(TileCoord::new(1, 1)),
                objects: vec![
                    (TileCoord::new(8, 5), ObjectKind::BlueHeart),
                    (TileCoord::new(4, 5), ObjectKind::Door),
                    (TileCoord::new(12, 3), ObjectKind::ChestClosed),
                ],
                monsters: vec![
                    (TileCoord::new(4, 1), Species::Bat),
                    (TileCoord::new(6, 1), Species::Bat),
                    (TileCoord::new(9, 3), Species::Bat),
                    (TileCoord::new(11, 4), Species::Bat),
                    (TileCoord::new(12, 8), Species::Bat),
                    (TileCoord::new(7, 7), Species::Orc),
                    (TileCoord::new(10, 6), Species::Orc),
                    (TileCoord::new(14, 9), Species::Orc),
                ],
            },
        }
    }
}

/// Initial placement of the player, objects and monsters on a map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpawnTable {
    player: Option<TileCoord>,
    objects: Vec<(TileCoord, ObjectKind)>,
    monsters: Vec<(TileCoord, Species)>,
}

impl SpawnTable {
    /// Creates a spawn table from explicit entries.
    #[must_use]
    pub fn new(
        player: Option<TileCoord>,
        objects: Vec<(TileCoord, ObjectKind)>,
        monsters: Vec<(TileCoord, Species)>,
    ) -> Self {
        Self {
            player,
            objects,
            monsters,
        }
    }

    /// Player spawn tile, falling back to [`DEFAULT_PLAYER_SPAWN`] when the
    /// table names none inside a `width x height` grid.
    #[must_use]
    pub fn player_spawn(&self, width: u32, height: u32) -> TileCoord {
        self.player
            .filter(|tile| tile.in_bounds(width, height))
            .unwrap_or(DEFAULT_PLAYER_SPAWN)
    }

    /// Object entries that fit inside a `width x height` grid.
    pub fn objects_within(
        &self,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = (TileCoord, ObjectKind)> + '_ {
        self.objects
            .iter()
            .copied()
            .filter(move |(tile, _)| tile.in_bounds(width, height))
    }

    /// Monster entries that fit inside a `width x height` grid.
    pub fn monsters_within(
        &self,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = (TileCoord, Species)> + '_ {
        self.monsters
            .iter()
            .copied()
            .filter(move |(tile, _)| tile.in_bounds(width, height))
    }
}
