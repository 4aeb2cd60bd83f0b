#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Endless Dungeons simulation.
//!
//! This crate defines the value types and the message surface that connect the
//! authoritative world map, the pure systems (pathfinding, movement, monster
//! AI, spawning, combat) and adapters.
//! Systems that want to mutate the object layer submit [`Command`] values; the
//! world applies them, rebuilds its derived blocking geometry and reports the
//! outcome as [`Event`] values.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Endless Dungeons.";

/// Commands that express all permissible object-layer mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Places a new object on an empty tile (monster drops, scripted spawns).
    PlaceObject {
        /// Tile that receives the object.
        tile: TileCoord,
        /// Object to place.
        kind: ObjectKind,
    },
    /// Swaps the object occupying a tile for another one (a chest being opened).
    ReplaceObject {
        /// Tile whose object is replaced.
        tile: TileCoord,
        /// Object that takes its place.
        kind: ObjectKind,
    },
    /// Removes the object occupying a tile (a door unlocked, a pickup collected).
    RemoveObject {
        /// Tile whose object is removed.
        tile: TileCoord,
    },
}

/// Events broadcast by the world and the roster after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that an object was placed onto an empty tile.
    ObjectPlaced {
        /// Tile that received the object.
        tile: TileCoord,
        /// Object that was placed.
        kind: ObjectKind,
    },
    /// Confirms that an object was swapped for another.
    ObjectReplaced {
        /// Tile whose object changed.
        tile: TileCoord,
        /// Object that occupied the tile before the command.
        previous: ObjectKind,
        /// Object that occupies the tile now.
        kind: ObjectKind,
    },
    /// Confirms that an object was removed from the world.
    ObjectRemoved {
        /// Tile that was cleared.
        tile: TileCoord,
        /// Object that used to occupy the tile.
        kind: ObjectKind,
    },
    /// Reports that an object command was rejected.
    ObjectRejected {
        /// Tile named by the rejected command.
        tile: TileCoord,
        /// Specific reason the command failed.
        reason: ObjectRejection,
    },
    /// Announces that a monster finished its dying animation.
    MonsterDied {
        /// Identifier of the monster that died.
        monster: MonsterId,
        /// Tile under the monster's hitbox centre at the moment of death.
        tile: TileCoord,
    },
    /// Announces that a dead monster was removed from the live roster.
    MonsterRemoved {
        /// Identifier of the monster that was removed.
        monster: MonsterId,
    },
}

/// Reasons an object command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectRejection {
    /// The tile lies outside the configured grid.
    OutOfBounds,
    /// The tile already holds an object.
    Occupied,
    /// The tile holds no object to replace or remove.
    Missing,
}

/// Cardinal facing directions shared by the player and monsters.
///
/// Rows of a directional sprite sheet are selected with this value, so the
/// mapping to screen space is fixed: `North` is up, `South` is down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Facing toward decreasing row indices (up on screen).
    North,
    /// Facing toward increasing column indices (right on screen).
    East,
    /// Facing toward increasing row indices (down on screen).
    #[default]
    South,
    /// Facing toward decreasing column indices (left on screen).
    West,
}

impl Direction {
    /// Derives a facing from the dominant component of a steering vector.
    ///
    /// A horizontal component strictly larger in magnitude than the vertical one
    /// selects `East`/`West`; everything else selects `South`/`North`. A zero
    /// vector has no facing.
    #[must_use]
    pub fn from_dominant_axis(vector: Vec2) -> Option<Self> {
        if vector.length_squared() <= 0.0 {
            return None;
        }

        if vector.x.abs() > vector.y.abs() {
            if vector.x > 0.0 {
                Some(Self::East)
            } else {
                Some(Self::West)
            }
        } else if vector.y > 0.0 {
            Some(Self::South)
        } else {
            Some(Self::North)
        }
    }
}

/// Unique identifier assigned to a monster at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single tile expressed as column and row indices.
///
/// Coordinates are signed so that pixel positions left of or above the grid
/// map to representable (negative) tiles; every consumer that indexes the grid
/// bounds-checks through [`TileCoord::in_bounds`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: i32,
    row: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Tile containing the provided pixel, using floor division.
    ///
    /// A non-positive `tile_size` collapses every pixel onto the origin tile.
    #[must_use]
    pub const fn from_pixel(x: i32, y: i32, tile_size: i32) -> Self {
        if tile_size <= 0 {
            return Self::new(0, 0);
        }
        Self::new(x.div_euclid(tile_size), y.div_euclid(tile_size))
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Reports whether the tile lies inside `[0, width) x [0, height)`.
    #[must_use]
    pub const fn in_bounds(&self, width: u32, height: u32) -> bool {
        self.column >= 0
            && self.row >= 0
            && (self.column as u32) < width
            && (self.row as u32) < height
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Centre of the tile expressed in pixels.
    #[must_use]
    pub fn center_px(self, tile_size: i32) -> Vec2 {
        let size = tile_size as f32;
        Vec2::new(
            (self.column as f32 + 0.5) * size,
            (self.row as f32 + 0.5) * size,
        )
    }
}

/// Axis-aligned rectangle with integer pixel coordinates.
///
/// Edges follow the half-open convention: `right()` and `bottom()` are the
/// first pixel outside the rectangle, so rectangles that merely touch do not
/// overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl PixelRect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle whose bottom edge is centred on the provided point.
    #[must_use]
    pub const fn from_mid_bottom(center_x: i32, bottom: i32, width: i32, height: i32) -> Self {
        Self::new(center_x - width / 2, bottom - height, width, height)
    }

    /// Rectangle covering a whole tile.
    #[must_use]
    pub const fn of_tile(tile: TileCoord, tile_size: i32) -> Self {
        Self::new(
            tile.column() * tile_size,
            tile.row() * tile_size,
            tile_size,
            tile_size,
        )
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// First column to the right of the rectangle.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// First row below the rectangle.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Integer horizontal centre, rounded toward the left edge.
    #[must_use]
    pub const fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// Integer vertical centre, rounded toward the top edge.
    #[must_use]
    pub const fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// Integer centre promoted to floating point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x() as f32, self.center_y() as f32)
    }

    /// Tile containing the rectangle's integer centre.
    #[must_use]
    pub const fn center_tile(&self, tile_size: i32) -> TileCoord {
        TileCoord::from_pixel(self.center_x(), self.center_y(), tile_size)
    }

    /// Returns a copy moved so its top-left corner sits at the given position.
    #[must_use]
    pub const fn with_position(self, x: i32, y: i32) -> Self {
        Self::new(x, y, self.width, self.height)
    }

    /// Returns a copy moved horizontally to the given left edge.
    #[must_use]
    pub const fn with_left(self, x: i32) -> Self {
        Self::new(x, self.y, self.width, self.height)
    }

    /// Returns a copy moved vertically to the given top edge.
    #[must_use]
    pub const fn with_top(self, y: i32) -> Self {
        Self::new(self.x, y, self.width, self.height)
    }

    /// Reports whether two rectangles share any interior pixel.
    ///
    /// Empty rectangles never overlap anything.
    #[must_use]
    pub const fn overlaps(&self, other: &PixelRect) -> bool {
        if self.width <= 0 || self.height <= 0 || other.width <= 0 || other.height <= 0 {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Objects that may occupy a tile of the object layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Locked door, opened with a key.
    Door,
    /// Closed treasure chest.
    ChestClosed,
    /// Opened treasure chest.
    ChestOpen,
    /// Interior table.
    Table,
    /// House entrance marker on the overworld.
    House,
    /// Coin pickup.
    Coin,
    /// Key pickup.
    Key,
    /// Healing potion pickup.
    Potion,
    /// Blue heart, the final treasure.
    BlueHeart,
}

impl ObjectKind {
    /// Every object kind, in declaration order.
    pub const ALL: [ObjectKind; 9] = [
        Self::Door,
        Self::ChestClosed,
        Self::ChestOpen,
        Self::Table,
        Self::House,
        Self::Coin,
        Self::Key,
        Self::Potion,
        Self::BlueHeart,
    ];

    /// Map symbol used for the object in spawn tables and debug dumps.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Door => '|',
            Self::ChestClosed => 'c',
            Self::ChestOpen => 'C',
            Self::Table => 't',
            Self::House => 'h',
            Self::Coin => '$',
            Self::Key => 'k',
            Self::Potion => 'p',
            Self::BlueHeart => 'b',
        }
    }

    /// Looks up the object represented by a map symbol.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.symbol() == symbol)
    }

    /// Reports whether the player collects the object by walking over it.
    #[must_use]
    pub const fn is_pickup(self) -> bool {
        matches!(self, Self::Coin | Self::Key | Self::Potion | Self::BlueHeart)
    }
}

/// Monster species available to spawn tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    /// Fast, fragile flyer.
    Bat,
    /// Slow blob.
    GreenSlime,
    /// Sturdy brute with a long aggro radius.
    Orc,
}

impl Species {
    /// Immutable tunables that distinguish the species.
    #[must_use]
    pub const fn config(self) -> SpeciesConfig {
        match self {
            Self::Bat => SpeciesConfig::new(2, 80.0, 6, "bat"),
            Self::GreenSlime => SpeciesConfig::new(3, 45.0, 7, "greenslime"),
            Self::Orc => SpeciesConfig::new(5, 55.0, 9, "orc"),
        }
    }
}

/// Per-species tunables; behaviour is otherwise identical across species.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeciesConfig {
    /// Hit points at spawn.
    pub max_hp: u32,
    /// Movement speed in pixels per second before display scaling.
    pub speed: f32,
    /// Aggro radius measured in tiles.
    pub aggro_tiles: u32,
    /// Sprite set prefix used by renderers (`<prefix>_<dir>_<frame>.png`).
    pub sprite_set: &'static str,
}

impl SpeciesConfig {
    /// Creates a species configuration.
    #[must_use]
    pub const fn new(max_hp: u32, speed: f32, aggro_tiles: u32, sprite_set: &'static str) -> Self {
        Self {
            max_hp,
            speed,
            aggro_tiles,
            sprite_set,
        }
    }
}
