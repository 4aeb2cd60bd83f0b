use dungeon_core::{Command, ObjectKind, TileCoord};
use dungeon_world::WorldMap;
use tracing::debug;

use crate::Player;

/// Hit points restored by one potion.
pub const POTION_HEAL: u32 = 2;

/// Items carried by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    coins: u32,
    keys: u32,
    potions: u32,
    coins_collected: u32,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Coins currently held.
    #[must_use]
    pub const fn coins(&self) -> u32 {
        self.coins
    }

    /// Keys currently held.
    #[must_use]
    pub const fn keys(&self) -> u32 {
        self.keys
    }

    /// Potions currently held.
    #[must_use]
    pub const fn potions(&self) -> u32 {
        self.potions
    }

    /// Coins picked up over the whole session.
    #[must_use]
    pub const fn coins_collected(&self) -> u32 {
        self.coins_collected
    }

    /// Adds a collected item. Objects that are not carried are ignored.
    pub fn add(&mut self, kind: ObjectKind) {
        match kind {
            ObjectKind::Coin => {
                self.coins += 1;
                self.coins_collected += 1;
            }
            ObjectKind::Key => self.keys += 1,
            ObjectKind::Potion => self.potions += 1,
            _ => {}
        }
    }

    /// Spends a key, returning whether one was available.
    pub fn use_key(&mut self) -> bool {
        if self.keys == 0 {
            return false;
        }
        self.keys -= 1;
        true
    }

    /// Drinks a potion, healing the player by [`POTION_HEAL`].
    ///
    /// No-op returning `false` when no potion is held or the player is dead.
    pub fn drink_potion(&mut self, player: &mut Player) -> bool {
        if self.potions == 0 || !player.is_alive() {
            return false;
        }
        self.potions -= 1;
        player.heal(POTION_HEAL);
        true
    }
}

/// Outcome of walking onto a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pickup {
    /// An item was added to the inventory.
    Item(ObjectKind),
    /// The blue heart was collected.
    Victory,
}

/// Collects the pickup under the player's centre tile, if any.
///
/// The object is removed from the world through a [`Command::RemoveObject`]
/// pushed onto `out`; the inventory is updated immediately.
pub fn collect_pickup(
    world: &WorldMap,
    player: &Player,
    inventory: &mut Inventory,
    out: &mut Vec<Command>,
) -> Option<Pickup> {
    let tile = player.tile();
    let kind = world.object_at(tile).filter(|kind| kind.is_pickup())?;
    out.push(Command::RemoveObject { tile });
    debug!(?tile, ?kind, "collected pickup");

    if kind == ObjectKind::BlueHeart {
        return Some(Pickup::Victory);
    }
    inventory.add(kind);
    Some(Pickup::Item(kind))
}

/// Outcome of interacting with the objects around the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    /// A closed chest was opened and its key taken.
    ChestOpened(TileCoord),
    /// A door was unlocked with a key and removed.
    DoorUnlocked(TileCoord),
    /// A door was found but no key was held.
    DoorLocked(TileCoord),
}

/// Interacts with a chest or door on or next to the player's centre tile.
///
/// Tiles are searched in the order own, east, west, south, north; chests take
/// priority over doors. Opening a chest pushes a [`Command::ReplaceObject`]
/// and adds a key; unlocking a door spends a key and pushes a
/// [`Command::RemoveObject`].
pub fn interact(
    world: &WorldMap,
    player: &Player,
    inventory: &mut Inventory,
    out: &mut Vec<Command>,
) -> Option<Interaction> {
    let origin = player.tile();
    let find = |wanted: ObjectKind| {
        let (column, row) = (origin.column(), origin.row());
        [
            origin,
            TileCoord::new(column + 1, row),
            TileCoord::new(column - 1, row),
            TileCoord::new(column, row + 1),
            TileCoord::new(column, row - 1),
        ]
        .into_iter()
        .find(|tile| world.object_at(*tile) == Some(wanted))
    };

    if let Some(tile) = find(ObjectKind::ChestClosed) {
        out.push(Command::ReplaceObject {
            tile,
            kind: ObjectKind::ChestOpen,
        });
        inventory.add(ObjectKind::Key);
        debug!(?tile, "opened chest");
        return Some(Interaction::ChestOpened(tile));
    }

    let tile = find(ObjectKind::Door)?;
    if !inventory.use_key() {
        return Some(Interaction::DoorLocked(tile));
    }
    out.push(Command::RemoveObject { tile });
    debug!(?tile, keys = inventory.keys(), "unlocked door");
    Some(Interaction::DoorUnlocked(tile))
}
