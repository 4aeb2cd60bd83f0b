#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Monster spawning, the live roster and the one-shot drop policy.
//!
//! The [`Roster`] owns every live monster in spawn order, updates them
//! sequentially against the shared world and turns finished deaths into drop
//! commands. Drops never mutate the world directly; they are submitted as
//! [`Command::PlaceObject`] for the world to apply.

mod tables;

use std::collections::BTreeSet;

use dungeon_core::{Command, Event, MonsterId, ObjectKind, PixelRect, Species, TileCoord};
use dungeon_system_monster_ai::{AiTuning, Monster};
use dungeon_world::WorldMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

pub use tables::{MapKind, SpawnTable, DEFAULT_PLAYER_SPAWN};

/// Probability that a drop is a coin rather than a potion.
pub const DEFAULT_COIN_CHANCE: f64 = 0.70;

/// Configuration parameters required to construct a roster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    tile_size: i32,
    display_scale: u32,
    tuning: AiTuning,
    coin_chance: f64,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration with the default tuning and coin chance.
    #[must_use]
    pub fn new(tile_size: i32, display_scale: u32, rng_seed: u64) -> Self {
        Self {
            tile_size,
            display_scale,
            tuning: AiTuning::default(),
            coin_chance: DEFAULT_COIN_CHANCE,
            rng_seed,
        }
    }

    /// Replaces the monster tuning.
    #[must_use]
    pub fn with_tuning(mut self, tuning: AiTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Replaces the coin probability, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_coin_chance(mut self, coin_chance: f64) -> Self {
        self.coin_chance = coin_chance.clamp(0.0, 1.0);
        self
    }
}

/// Live monsters of the current map, in spawn order.
#[derive(Debug)]
pub struct Roster {
    config: Config,
    monsters: Vec<Monster>,
    next_id: u32,
    drops_attempted: BTreeSet<MonsterId>,
    rng: ChaCha8Rng,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            monsters: Vec::new(),
            next_id: 0,
            drops_attempted: BTreeSet::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Spawns every monster of `table` that fits inside the world.
    pub fn populate(&mut self, table: &SpawnTable, world: &WorldMap) {
        for (tile, species) in table.monsters_within(world.width(), world.height()) {
            let _ = self.spawn(species, tile);
        }
        debug!(monsters = self.monsters.len(), "populated roster");
    }

    /// Spawns a monster of the given species on `tile`, returning its identifier.
    pub fn spawn(&mut self, species: Species, tile: TileCoord) -> MonsterId {
        let id = MonsterId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let config = species.config();
        debug!(monster = id.get(), sprite_set = config.sprite_set, ?tile, "spawned monster");
        self.monsters.push(Monster::new(
            id,
            config,
            tile,
            self.config.tile_size,
            self.config.display_scale,
            self.config.tuning,
        ));
        id
    }

    /// Updates every monster in spawn order.
    ///
    /// Later monsters observe the already-updated positions of earlier ones.
    pub fn update_all(&mut self, dt: f32, player_rect: PixelRect, world: &WorldMap) {
        for monster in &mut self.monsters {
            let _ = monster.update(
                dt,
                player_rect,
                |rect| world.colliders_for_rect(rect),
                world.width(),
                world.height(),
                |tile| world.is_blocked_tile(tile),
            );
        }
    }

    /// Attempts the one-shot drop for every monster that just finished dying.
    ///
    /// Each monster is considered at most once over its lifetime. A drop lands
    /// on the monster's tile only when that tile is inside the grid and holds
    /// no object; it is a coin with the configured probability and otherwise a
    /// potion.
    pub fn collect_drops(
        &mut self,
        world: &WorldMap,
        out_commands: &mut Vec<Command>,
        out_events: &mut Vec<Event>,
    ) {
        for monster in &self.monsters {
            if !monster.is_dead() || self.drops_attempted.contains(&monster.id()) {
                continue;
            }
            let _ = self.drops_attempted.insert(monster.id());

            let tile = monster.tile();
            out_events.push(Event::MonsterDied {
                monster: monster.id(),
                tile,
            });

            if !world.contains(tile) || world.object_at(tile).is_some() {
                debug!(monster = monster.id().get(), ?tile, "drop skipped");
                continue;
            }

            let kind = if self.rng.gen::<f64>() < self.config.coin_chance {
                ObjectKind::Coin
            } else {
                ObjectKind::Potion
            };
            debug!(monster = monster.id().get(), ?tile, ?kind, "monster drop");
            out_commands.push(Command::PlaceObject { tile, kind });
        }
    }

    /// Removes dead monsters, returning how many were removed.
    pub fn remove_dead(&mut self, out_events: &mut Vec<Event>) -> usize {
        let before = self.monsters.len();
        self.monsters.retain(|monster| {
            if monster.is_dead() {
                out_events.push(Event::MonsterRemoved {
                    monster: monster.id(),
                });
                false
            } else {
                true
            }
        });
        before - self.monsters.len()
    }

    /// Live monsters in spawn order.
    #[must_use]
    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    /// Mutable access for combat resolution.
    pub fn monsters_mut(&mut self) -> &mut [Monster] {
        &mut self.monsters
    }

    /// Looks up a live monster by identifier.
    #[must_use]
    pub fn get(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.iter().find(|monster| monster.id() == id)
    }

    /// Mutable lookup of a live monster by identifier.
    pub fn get_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|monster| monster.id() == id)
    }

    /// Number of live monsters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    /// Reports whether no monster is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}
