use clap::ValueEnum;
use dungeon_core::{Command, Direction, Event, MonsterId, ObjectKind, Species, TileCoord};
use dungeon_system_combat::{apply_contact_damage, resolve_attack, separate_player};
use dungeon_system_player::{collect_pickup, interact, Inventory, MoveIntent, Pickup, Player};
use dungeon_system_spawning::{Config as RosterConfig, MapKind, Roster, SpawnTable};
use dungeon_world::{self as world, ObjectLayer, TerrainGrid, WorldConfig, WorldMap};
use tracing::{debug, info};

use crate::config::SimulationConfig;

/// Distance, in tiles, at which the headless player starts a swing.
const ENGAGE_RANGE_TILES: f32 = 1.5;

/// Prebuilt maps the headless session can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Scenario {
    /// Walled room split by a long wall with a gap at its far end.
    Corridor,
    /// Open field with the overworld spawn table.
    Overworld,
    /// Cave with the blue heart behind a door.
    Cave,
}

impl Scenario {
    fn terrain(self) -> TerrainGrid {
        match self {
            Self::Corridor => paint(24, 20, |tile| {
                tile.row() == 10 && (1..=15).contains(&tile.column())
            }),
            Self::Overworld => paint_with(32, 20, |tile| {
                let (column, row) = (tile.column(), tile.row());
                if (20..=23).contains(&column) && (4..=6).contains(&row) {
                    '~'
                } else if matches!((column, row), (8, 14) | (9, 14) | (14, 5)) {
                    'T'
                } else {
                    '.'
                }
            }),
            Self::Cave => paint(20, 12, |tile| {
                tile.column() == 4 && (3..=8).contains(&tile.row()) && tile.row() != 5
            }),
        }
    }

    fn spawn_table(self) -> SpawnTable {
        match self {
            Self::Corridor => SpawnTable::new(
                Some(TileCoord::new(18, 16)),
                vec![(TileCoord::new(2, 17), ObjectKind::ChestClosed)],
                vec![
                    (TileCoord::new(3, 3), Species::Orc),
                    (TileCoord::new(8, 5), Species::Bat),
                    (TileCoord::new(12, 2), Species::GreenSlime),
                ],
            ),
            Self::Overworld => MapKind::Overworld.spawn_table(),
            Self::Cave => MapKind::Cave.spawn_table(),
        }
    }
}

/// Builds a bordered grid whose interior is floor except where `wall` holds.
fn paint(width: i32, height: i32, wall: impl Fn(TileCoord) -> bool) -> TerrainGrid {
    paint_with(width, height, |tile| if wall(tile) { '#' } else { '.' })
}

fn paint_with(width: i32, height: i32, interior: impl Fn(TileCoord) -> char) -> TerrainGrid {
    let rows = (0..height).map(|row| {
        (0..width)
            .map(|column| {
                let border = column == 0 || row == 0 || column == width - 1 || row == height - 1;
                if border {
                    '#'
                } else {
                    interior(TileCoord::new(column, row))
                }
            })
            .collect::<String>()
    });
    TerrainGrid::from_rows(rows)
}

/// Why a session stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The tick limit was reached.
    TicksElapsed,
    /// The player ran out of hit points.
    PlayerDied,
    /// The blue heart was collected.
    Victory,
}

/// Totals reported when a session stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) outcome: Outcome,
    pub(crate) ticks: u64,
    pub(crate) kills: usize,
    pub(crate) coins: u32,
    pub(crate) potions: u32,
    pub(crate) player_hp: u32,
}

/// Fixed-step loop wiring the world, the player and the roster together.
#[derive(Debug)]
pub(crate) struct Session {
    world: WorldMap,
    player: Player,
    inventory: Inventory,
    roster: Roster,
    dt: f32,
    ticks: u64,
    kills: usize,
    commands: Vec<Command>,
    events: Vec<Event>,
    hits: Vec<MonsterId>,
}

impl Session {
    /// Loads `scenario` with the given settings.
    pub(crate) fn new(scenario: Scenario, config: &SimulationConfig) -> Self {
        Self::from_parts(scenario.terrain(), &scenario.spawn_table(), config)
    }

    fn from_parts(terrain: TerrainGrid, table: &SpawnTable, config: &SimulationConfig) -> Self {
        let tile_size = config.scaled_tile_size();
        let objects: ObjectLayer = table
            .objects_within(terrain.width(), terrain.height())
            .collect();
        let world = WorldMap::new(
            terrain,
            objects,
            WorldConfig {
                tile_size,
                inflate_margin: config.inflate_margin,
                ..WorldConfig::default()
            },
        );

        let spawn = table.player_spawn(world.width(), world.height());
        let player = Player::new(spawn, tile_size, config.display_scale, config.player);

        let mut roster = Roster::new(
            RosterConfig::new(tile_size, config.display_scale, config.seed)
                .with_tuning(config.ai)
                .with_coin_chance(config.coin_chance),
        );
        roster.populate(table, &world);
        info!(
            width = world.width(),
            height = world.height(),
            monsters = roster.len(),
            ?spawn,
            "session loaded"
        );

        Self {
            world,
            player,
            inventory: Inventory::new(),
            roster,
            dt: config.step_seconds(),
            ticks: 0,
            kills: 0,
            commands: Vec::new(),
            events: Vec::new(),
            hits: Vec::new(),
        }
    }

    /// Banner of the loaded world.
    pub(crate) fn banner(&self) -> &'static str {
        self.world.banner()
    }

    /// Steps until `max_ticks` have elapsed, the player dies or wins.
    pub(crate) fn run(&mut self, max_ticks: u64) -> Summary {
        let outcome = loop {
            if self.ticks >= max_ticks {
                break Outcome::TicksElapsed;
            }
            if let Some(outcome) = self.step() {
                break outcome;
            }
        };
        self.summary(outcome)
    }

    fn step(&mut self) -> Option<Outcome> {
        self.ticks += 1;
        let dt = self.dt;

        let world = &self.world;
        self.player
            .update(dt, MoveIntent::IDLE, |rect| world.colliders_for_rect(rect));
        let pickup = collect_pickup(
            &self.world,
            &self.player,
            &mut self.inventory,
            &mut self.commands,
        );
        let _ = interact(
            &self.world,
            &self.player,
            &mut self.inventory,
            &mut self.commands,
        );
        self.flush_commands();

        self.roster.update_all(dt, self.player.hitbox(), &self.world);
        let _ = apply_contact_damage(
            &mut self.player,
            self.roster.monsters(),
            self.world.tile_size(),
        );
        let world = &self.world;
        separate_player(&mut self.player, self.roster.monsters(), dt, |rect| {
            world.colliders_for_rect(rect)
        });

        self.roster
            .collect_drops(&self.world, &mut self.commands, &mut self.events);
        self.flush_commands();

        self.engage();
        resolve_attack(&mut self.player, self.roster.monsters_mut(), &mut self.hits);
        for monster in self.hits.drain(..) {
            debug!(tick = self.ticks, monster = monster.get(), "player hit monster");
        }
        self.kills += self.roster.remove_dead(&mut self.events);
        self.drink_if_hurt();

        for event in self.events.drain(..) {
            debug!(tick = self.ticks, ?event, "world event");
        }

        if pickup == Some(Pickup::Victory) {
            return Some(Outcome::Victory);
        }
        if !self.player.is_alive() {
            return Some(Outcome::PlayerDied);
        }
        None
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Faces the nearest live monster and swings once it is in reach.
    fn engage(&mut self) {
        if self.player.is_attacking() {
            return;
        }
        let origin = self.player.center();
        let nearest = self
            .roster
            .monsters()
            .iter()
            .filter(|monster| !monster.is_dying())
            .map(|monster| monster.center() - origin)
            .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()));
        let Some(offset) = nearest else {
            return;
        };

        if let Some(direction) = Direction::from_dominant_axis(offset) {
            self.player.face(direction);
        }
        let reach = self.world.tile_size() as f32 * ENGAGE_RANGE_TILES;
        if offset.length() <= reach {
            let _ = self.player.start_attack();
        }
    }

    fn drink_if_hurt(&mut self) {
        if self.player.hp() * 2 < self.player.max_hp() && self.inventory.drink_potion(&mut self.player) {
            debug!(tick = self.ticks, hp = self.player.hp(), "drank potion");
        }
    }

    fn summary(&self, outcome: Outcome) -> Summary {
        Summary {
            outcome,
            ticks: self.ticks,
            kills: self.kills,
            coins: self.inventory.coins_collected(),
            potions: self.inventory.potions(),
            player_hp: self.player.hp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> SimulationConfig {
        SimulationConfig {
            seed: 7,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn zero_ticks_stops_immediately() {
        let mut session = Session::new(Scenario::Corridor, &quick_config());
        let summary = session.run(0);
        assert_eq!(summary.outcome, Outcome::TicksElapsed);
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.player_hp, 6);
    }

    #[test]
    fn scenarios_load_their_spawn_tables() {
        let config = quick_config();
        let overworld = Session::new(Scenario::Overworld, &config);
        assert_eq!(overworld.roster.len(), 3);
        assert_eq!(overworld.player.tile(), TileCoord::new(1, 1));
        assert_eq!(
            overworld.world.object_at(TileCoord::new(5, 3)),
            Some(ObjectKind::House)
        );

        let cave = Session::new(Scenario::Cave, &config);
        assert_eq!(cave.roster.len(), 8);
        assert!(cave.world.is_solid_tile(TileCoord::new(4, 5)));
        assert!(!cave.world.is_solid_tile(TileCoord::new(4, 2)));
    }

    #[test]
    fn corridor_wall_leaves_a_gap() {
        let session = Session::new(Scenario::Corridor, &quick_config());
        assert!(session.world.is_solid_tile(TileCoord::new(15, 10)));
        assert!(!session.world.is_solid_tile(TileCoord::new(18, 10)));
        assert!(session.world.is_solid_tile(TileCoord::new(0, 5)));
    }

    #[test]
    fn same_seed_replays_identically() {
        let config = quick_config();
        let first = Session::new(Scenario::Corridor, &config).run(600);
        let second = Session::new(Scenario::Corridor, &config).run(600);
        assert_eq!(first, second);
    }

    #[test]
    fn standing_on_the_heart_wins() {
        let terrain = paint(6, 5, |_| false);
        let heart = TileCoord::new(2, 2);
        let table = SpawnTable::new(Some(heart), vec![(heart, ObjectKind::BlueHeart)], Vec::new());
        let mut session = Session::from_parts(terrain, &table, &quick_config());

        let summary = session.run(100);

        assert_eq!(summary.outcome, Outcome::Victory);
        assert_eq!(summary.ticks, 1);
        assert_eq!(session.world.object_at(heart), None);
    }

    #[test]
    fn chest_key_opens_the_neighbouring_door() {
        let chest = TileCoord::new(3, 2);
        let door = TileCoord::new(2, 3);
        let table = SpawnTable::new(
            Some(TileCoord::new(2, 2)),
            vec![(chest, ObjectKind::ChestClosed), (door, ObjectKind::Door)],
            Vec::new(),
        );
        let mut session = Session::from_parts(paint(8, 6, |_| false), &table, &quick_config());

        let summary = session.run(2);

        assert_eq!(summary.outcome, Outcome::TicksElapsed);
        assert_eq!(session.world.object_at(chest), Some(ObjectKind::ChestOpen));
        assert_eq!(session.world.object_at(door), None);
        assert_eq!(session.inventory.keys(), 0);
    }

    #[test]
    fn adjacent_monster_draws_a_swing() {
        let terrain = paint(8, 6, |_| false);
        let table = SpawnTable::new(
            Some(TileCoord::new(2, 2)),
            Vec::new(),
            vec![(TileCoord::new(3, 2), Species::Bat)],
        );
        let mut session = Session::from_parts(terrain, &table, &quick_config());

        assert_eq!(session.step(), None);

        assert!(session.player.is_attacking());
        assert_eq!(session.player.facing(), Direction::East);
    }

    #[test]
    fn distant_monster_is_only_watched() {
        let terrain = paint(12, 6, |_| false);
        let table = SpawnTable::new(
            Some(TileCoord::new(2, 2)),
            Vec::new(),
            vec![(TileCoord::new(9, 4), Species::GreenSlime)],
        );
        let mut session = Session::from_parts(terrain, &table, &quick_config());

        assert_eq!(session.step(), None);

        assert!(!session.player.is_attacking());
        assert_eq!(session.player.facing(), Direction::East);
    }
}
