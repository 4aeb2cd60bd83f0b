#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Endless Dungeons.
//!
//! [`WorldMap`] owns the terrain grid and the object layer and keeps two
//! derived sets current: the exact blocked set used for rectangle collision and
//! the inflated blocked set used for path planning. Every mutation of terrain
//! or objects rebuilds both before returning, so readers later in the same tick
//! never observe stale geometry.

mod blocked;
mod grid;
mod objects;

use dungeon_core::{Command, Event, ObjectKind, ObjectRejection, PixelRect, TileCoord, WELCOME_BANNER};
use tracing::debug;

pub use blocked::{compute_blocked, inflate, BlockedSet, BlockingObjects, SolidTerrain};
pub use grid::{GridIndex, TerrainGrid};
pub use objects::ObjectLayer;

/// Default tile edge length in pixels before display scaling.
pub const DEFAULT_TILE_SIZE: i32 = 16;

/// Default Chebyshev margin applied around blocked tiles for path planning.
pub const DEFAULT_INFLATE_MARGIN: u32 = 1;

/// Static configuration supplied when a world is loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Length of a tile edge in pixels (already multiplied by the display scale).
    pub tile_size: i32,
    /// Chebyshev margin used to build the inflated blocked set.
    pub inflate_margin: u32,
    /// Terrain symbols that block movement.
    pub solid_terrain: SolidTerrain,
    /// Object kinds that block movement.
    pub blocking_objects: BlockingObjects,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            inflate_margin: DEFAULT_INFLATE_MARGIN,
            solid_terrain: SolidTerrain::default(),
            blocking_objects: BlockingObjects::default(),
        }
    }
}

/// Represents the authoritative state of the currently loaded map.
#[derive(Clone, Debug)]
pub struct WorldMap {
    banner: &'static str,
    terrain: TerrainGrid,
    objects: ObjectLayer,
    config: WorldConfig,
    index: GridIndex,
    blocked: BlockedSet,
    inflated: BlockedSet,
}

impl WorldMap {
    /// Loads a world from a terrain grid and an initial object layer.
    #[must_use]
    pub fn new(terrain: TerrainGrid, objects: ObjectLayer, config: WorldConfig) -> Self {
        let index = GridIndex::new(terrain.width(), terrain.height(), config.tile_size);
        let mut world = Self {
            banner: WELCOME_BANNER,
            terrain,
            objects,
            config,
            index,
            blocked: BlockedSet::new(),
            inflated: BlockedSet::new(),
        };
        world.rebuild_blocked();
        world
    }

    /// Recomputes the exact and inflated blocked sets from terrain and objects.
    ///
    /// Mutations made through [`apply`] and [`WorldMap::set_terrain`] call this
    /// already; it is public for collaborators that reload state wholesale.
    pub fn rebuild_blocked(&mut self) {
        self.blocked = compute_blocked(
            &self.terrain,
            &self.config.solid_terrain,
            &self.objects,
            &self.config.blocking_objects,
        );
        self.inflated = inflate(
            &self.blocked,
            self.width(),
            self.height(),
            self.config.inflate_margin,
        );
        debug!(
            blocked = self.blocked.len(),
            inflated = self.inflated.len(),
            "rebuilt blocked tiles"
        );
    }

    /// Welcome banner adapters may display.
    #[must_use]
    pub fn banner(&self) -> &'static str {
        self.banner
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.index.width()
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.index.height()
    }

    /// Tile edge length in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> i32 {
        self.index.tile_size()
    }

    /// Pixel/tile conversion helper for this map.
    #[must_use]
    pub const fn grid(&self) -> GridIndex {
        self.index
    }

    /// Read-only access to the terrain grid.
    #[must_use]
    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    /// Read-only access to the object layer.
    #[must_use]
    pub fn objects(&self) -> &ObjectLayer {
        &self.objects
    }

    /// Object occupying the tile, if any.
    #[must_use]
    pub fn object_at(&self, tile: TileCoord) -> Option<ObjectKind> {
        self.objects.get(tile)
    }

    /// Tile containing the given pixel.
    #[must_use]
    pub const fn tile_of(&self, pixel_x: i32, pixel_y: i32) -> TileCoord {
        self.index.tile_of(pixel_x, pixel_y)
    }

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        self.index.contains(tile)
    }

    /// Planning query: whether the tile is in the inflated blocked set.
    ///
    /// Tiles outside the grid are reported as blocked.
    #[must_use]
    pub fn is_blocked_tile(&self, tile: TileCoord) -> bool {
        !self.contains(tile) || self.inflated.contains(&tile)
    }

    /// Collision query: whether the tile itself is solid or holds a blocking object.
    #[must_use]
    pub fn is_solid_tile(&self, tile: TileCoord) -> bool {
        self.blocked.contains(&tile)
    }

    /// Exact blocked set (terrain + blocking objects).
    #[must_use]
    pub fn blocked(&self) -> &BlockedSet {
        &self.blocked
    }

    /// Blocked set inflated by the configured margin.
    #[must_use]
    pub fn inflated(&self) -> &BlockedSet {
        &self.inflated
    }

    /// Tile rectangles that a hitbox at `rect` may collide with.
    ///
    /// Scans the tiles overlapped by the rectangle's bounding range and yields
    /// one rectangle per solid terrain tile and one per blocking object. A tile
    /// that is both solid and holds a blocking object contributes two identical
    /// rectangles; resolution is idempotent so the duplicate is harmless.
    #[must_use]
    pub fn colliders_for_rect(&self, rect: PixelRect) -> Vec<PixelRect> {
        let Some((first, last)) = self.index.tile_span(rect) else {
            return Vec::new();
        };

        let mut colliders = Vec::new();
        for row in first.row()..=last.row() {
            for column in first.column()..=last.column() {
                let tile = TileCoord::new(column, row);
                let tile_rect = self.index.tile_rect(tile);
                if self
                    .terrain
                    .symbol_at(tile)
                    .is_some_and(|symbol| self.config.solid_terrain.contains(symbol))
                {
                    colliders.push(tile_rect);
                }
                if self
                    .objects
                    .get(tile)
                    .is_some_and(|kind| self.config.blocking_objects.contains(kind))
                {
                    colliders.push(tile_rect);
                }
            }
        }
        colliders
    }

    /// Overwrites a terrain symbol and rebuilds the blocked sets.
    ///
    /// Returns the previous symbol, or `None` when the tile is outside the grid.
    pub fn set_terrain(&mut self, tile: TileCoord, symbol: char) -> Option<char> {
        let previous = self.terrain.set_symbol(tile, symbol)?;
        if previous != symbol {
            self.rebuild_blocked();
        }
        Some(previous)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Accepted commands rebuild the blocked sets before returning.
pub fn apply(world: &mut WorldMap, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceObject { tile, kind } => {
            if !world.contains(tile) {
                out_events.push(Event::ObjectRejected {
                    tile,
                    reason: ObjectRejection::OutOfBounds,
                });
                return;
            }
            if world.objects.get(tile).is_some() {
                out_events.push(Event::ObjectRejected {
                    tile,
                    reason: ObjectRejection::Occupied,
                });
                return;
            }
            let _ = world.objects.insert(tile, kind);
            world.rebuild_blocked();
            out_events.push(Event::ObjectPlaced { tile, kind });
        }
        Command::ReplaceObject { tile, kind } => {
            if !world.contains(tile) {
                out_events.push(Event::ObjectRejected {
                    tile,
                    reason: ObjectRejection::OutOfBounds,
                });
                return;
            }
            let Some(previous) = world.objects.get(tile) else {
                out_events.push(Event::ObjectRejected {
                    tile,
                    reason: ObjectRejection::Missing,
                });
                return;
            };
            let _ = world.objects.insert(tile, kind);
            world.rebuild_blocked();
            out_events.push(Event::ObjectReplaced {
                tile,
                previous,
                kind,
            });
        }
        Command::RemoveObject { tile } => {
            let Some(kind) = world.objects.remove(tile) else {
                let reason = if world.contains(tile) {
                    ObjectRejection::Missing
                } else {
                    ObjectRejection::OutOfBounds
                };
                out_events.push(Event::ObjectRejected { tile, reason });
                return;
            };
            world.rebuild_blocked();
            out_events.push(Event::ObjectRemoved { tile, kind });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn house_world() -> WorldMap {
        let terrain = TerrainGrid::from_rows([
            "#######", //
            "#.....#", //
            "#.....#", //
            "#.....#", //
            "#######",
        ]);
        let objects: ObjectLayer = [(TileCoord::new(3, 2), ObjectKind::Door)]
            .into_iter()
            .collect();
        WorldMap::new(terrain, objects, WorldConfig::default())
    }

    #[test]
    fn construction_derives_blocked_sets() {
        let world = house_world();
        assert_eq!(world.width(), 7);
        assert_eq!(world.height(), 5);
        assert!(world.is_solid_tile(TileCoord::new(0, 0)));
        assert!(world.is_solid_tile(TileCoord::new(3, 2)));
        assert!(!world.is_solid_tile(TileCoord::new(1, 1)));
        assert!(world.is_blocked_tile(TileCoord::new(1, 1)));
        assert!(world.blocked().is_subset(world.inflated()));
    }

    #[test]
    fn out_of_bounds_tiles_are_blocked_for_planning() {
        let world = house_world();
        assert!(world.is_blocked_tile(TileCoord::new(-1, 2)));
        assert!(world.is_blocked_tile(TileCoord::new(7, 0)));
        assert!(!world.is_solid_tile(TileCoord::new(-1, 2)));
    }

    #[test]
    fn removing_door_rebuilds_blocking_immediately() {
        let mut world = house_world();
        let door = TileCoord::new(3, 2);
        let mut events = Vec::new();

        apply(&mut world, Command::RemoveObject { tile: door }, &mut events);

        assert_eq!(
            events,
            vec![Event::ObjectRemoved {
                tile: door,
                kind: ObjectKind::Door,
            }]
        );
        assert!(!world.is_solid_tile(door));
        assert!(world.colliders_for_rect(PixelRect::new(50, 34, 8, 8)).is_empty());
    }

    #[test]
    fn placing_blocking_object_closes_tile() {
        let mut world = house_world();
        let tile = TileCoord::new(2, 2);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceObject {
                tile,
                kind: ObjectKind::ChestClosed,
            },
            &mut events,
        );

        assert!(world.is_solid_tile(tile));
        assert_eq!(
            events,
            vec![Event::ObjectPlaced {
                tile,
                kind: ObjectKind::ChestClosed,
            }]
        );
    }

    #[test]
    fn placement_rejects_occupied_and_out_of_bounds_tiles() {
        let mut world = house_world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceObject {
                tile: TileCoord::new(3, 2),
                kind: ObjectKind::Coin,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlaceObject {
                tile: TileCoord::new(30, 2),
                kind: ObjectKind::Coin,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::ObjectRejected {
                    tile: TileCoord::new(3, 2),
                    reason: ObjectRejection::Occupied,
                },
                Event::ObjectRejected {
                    tile: TileCoord::new(30, 2),
                    reason: ObjectRejection::OutOfBounds,
                },
            ]
        );
        assert_eq!(world.object_at(TileCoord::new(3, 2)), Some(ObjectKind::Door));
    }

    #[test]
    fn replacing_requires_existing_object() {
        let mut world = house_world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ReplaceObject {
                tile: TileCoord::new(1, 1),
                kind: ObjectKind::ChestOpen,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ReplaceObject {
                tile: TileCoord::new(3, 2),
                kind: ObjectKind::ChestOpen,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::ObjectRejected {
                    tile: TileCoord::new(1, 1),
                    reason: ObjectRejection::Missing,
                },
                Event::ObjectReplaced {
                    tile: TileCoord::new(3, 2),
                    previous: ObjectKind::Door,
                    kind: ObjectKind::ChestOpen,
                },
            ]
        );
    }

    #[test]
    fn colliders_cover_solid_terrain_and_blocking_objects() {
        let world = house_world();
        let colliders = world.colliders_for_rect(PixelRect::new(10, 10, 12, 8));
        assert_eq!(
            colliders,
            vec![
                PixelRect::new(0, 0, 16, 16),
                PixelRect::new(16, 0, 16, 16),
                PixelRect::new(0, 16, 16, 16),
            ]
        );

        let near_door = world.colliders_for_rect(PixelRect::new(40, 34, 12, 8));
        assert_eq!(near_door, vec![PixelRect::new(48, 32, 16, 16)]);
    }

    #[test]
    fn colliders_ignore_rects_outside_grid() {
        let world = house_world();
        assert!(world
            .colliders_for_rect(PixelRect::new(500, 500, 8, 8))
            .is_empty());
    }

    #[test]
    fn set_terrain_reopens_wall() {
        let mut world = house_world();
        let tile = TileCoord::new(6, 2);
        assert!(world.is_solid_tile(tile));
        assert_eq!(world.set_terrain(tile, '.'), Some('#'));
        assert!(!world.is_solid_tile(tile));
        assert_eq!(world.set_terrain(TileCoord::new(9, 9), '.'), None);
    }
}
