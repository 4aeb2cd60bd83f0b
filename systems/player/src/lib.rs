#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player agent: movement intent, sword swings, health and the inventory.

mod inventory;

use dungeon_core::{Direction, PixelRect, TileCoord};
use dungeon_system_movement::Body;
use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use inventory::{collect_pickup, interact, Interaction, Inventory, Pickup, POTION_HEAL};

/// Player tunables; distances are fractions of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Walking speed in pixels per second before display scaling.
    pub speed: f32,
    /// Speed multiplier while running.
    pub run_multiplier: f32,
    /// Hit points at spawn.
    pub max_hp: u32,
    /// Seconds of invulnerability after taking damage.
    pub invulnerability: f32,
    /// Seconds per attack animation frame.
    pub attack_frame_time: f32,
    /// Seconds before another swing may start.
    pub attack_cooldown: f32,
    /// Attack rectangle width.
    pub attack_width: f32,
    /// Attack rectangle height.
    pub attack_height: f32,
    /// Gap between the hitbox and the attack rectangle.
    pub attack_reach: f32,
    /// Hitbox width.
    pub hitbox_width: f32,
    /// Hitbox height.
    pub hitbox_height: f32,
    /// Seconds per walking animation frame.
    pub walk_frame_time: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 96.0,
            run_multiplier: 1.5,
            max_hp: 6,
            invulnerability: 0.8,
            attack_frame_time: 0.09,
            attack_cooldown: 0.25,
            attack_width: 0.90,
            attack_height: 0.70,
            attack_reach: 0.35,
            hitbox_width: 0.45,
            hitbox_height: 0.30,
            walk_frame_time: 0.12,
        }
    }
}

const ATTACK_FRAMES: u8 = 3;
const WALK_FRAMES: u8 = 3;

/// Movement requested for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveIntent {
    /// Desired direction; any length, zero means standing still.
    pub direction: Vec2,
    /// Whether the run multiplier applies.
    pub run: bool,
}

impl MoveIntent {
    /// Intent to stand still.
    pub const IDLE: Self = Self {
        direction: Vec2::ZERO,
        run: false,
    };

    /// Intent to walk along `direction`.
    #[must_use]
    pub const fn walk(direction: Vec2) -> Self {
        Self {
            direction,
            run: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Swing {
    direction: Direction,
    elapsed: f32,
    damage_applied: bool,
}

/// Player-controlled agent.
#[derive(Clone, Debug)]
pub struct Player {
    tuning: PlayerTuning,
    tile_size: i32,
    speed: f32,
    hp: u32,
    body: Body,
    facing: Direction,
    invulnerable_timer: f32,
    walk_timer: f32,
    walk_frame: u8,
    swing: Option<Swing>,
    cooldown_timer: f32,
}

impl Player {
    /// Spawns the player standing on `spawn_tile`.
    #[must_use]
    pub fn new(spawn_tile: TileCoord, tile_size: i32, display_scale: u32, tuning: PlayerTuning) -> Self {
        let body = Body::anchored(
            spawn_tile.column() * tile_size,
            spawn_tile.row() * tile_size,
            tile_size,
            tuning.hitbox_width,
            tuning.hitbox_height,
        );
        Self {
            tuning,
            tile_size,
            speed: tuning.speed * display_scale.max(1) as f32,
            hp: tuning.max_hp,
            body,
            facing: Direction::South,
            invulnerable_timer: 0.0,
            walk_timer: 0.0,
            walk_frame: 0,
            swing: None,
            cooldown_timer: 0.0,
        }
    }

    /// Advances timers and applies the movement intent.
    ///
    /// Movement is locked while a swing plays out.
    pub fn update<F, I>(&mut self, dt: f32, intent: MoveIntent, colliders_for_rect: F)
    where
        F: Fn(PixelRect) -> I,
        I: IntoIterator<Item = PixelRect>,
    {
        self.invulnerable_timer = (self.invulnerable_timer - dt).max(0.0);
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);

        if let Some(swing) = self.swing.as_mut() {
            swing.elapsed += dt;
            if swing.elapsed >= self.tuning.attack_frame_time * f32::from(ATTACK_FRAMES) {
                self.swing = None;
                self.cooldown_timer = self.tuning.attack_cooldown;
            }
            return;
        }

        let direction = intent.direction;
        if direction.length_squared() <= 0.0 {
            self.walk_timer = 0.0;
            self.walk_frame = 0;
            return;
        }

        self.facing = if direction.x < 0.0 {
            Direction::West
        } else if direction.x > 0.0 {
            Direction::East
        } else if direction.y < 0.0 {
            Direction::North
        } else {
            Direction::South
        };

        let speed = if intent.run {
            self.speed * self.tuning.run_multiplier
        } else {
            self.speed
        };
        self.body
            .move_and_collide(direction.normalize() * speed * dt, colliders_for_rect);

        self.walk_timer += dt;
        if self.walk_timer >= self.tuning.walk_frame_time {
            self.walk_timer = 0.0;
            self.walk_frame = (self.walk_frame + 1) % WALK_FRAMES;
        }
    }

    /// Starts a swing in the current facing direction.
    ///
    /// Returns `false` while a swing is playing or the cooldown is running.
    pub fn start_attack(&mut self) -> bool {
        if self.swing.is_some() || self.cooldown_timer > 0.0 {
            return false;
        }
        self.swing = Some(Swing {
            direction: self.facing,
            elapsed: 0.0,
            damage_applied: false,
        });
        true
    }

    /// Reports whether a swing is playing.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.swing.is_some()
    }

    /// Reports whether the swing is in its damaging window (second frame).
    #[must_use]
    pub fn attack_hitbox_active(&self) -> bool {
        let frame_time = self.tuning.attack_frame_time;
        self.swing
            .is_some_and(|swing| swing.elapsed >= frame_time && swing.elapsed <= frame_time * 2.0)
    }

    /// Reports whether the current swing has already dealt its damage.
    #[must_use]
    pub fn attack_damage_applied(&self) -> bool {
        self.swing.is_some_and(|swing| swing.damage_applied)
    }

    /// Records that the current swing has dealt its damage.
    pub fn mark_attack_damage_applied(&mut self) {
        if let Some(swing) = self.swing.as_mut() {
            swing.damage_applied = true;
        }
    }

    /// Rectangle in front of the hitbox along the swing (or facing) direction.
    #[must_use]
    pub fn attack_hitbox(&self) -> PixelRect {
        let tile = self.tile_size as f32;
        let width = (tile * self.tuning.attack_width) as i32;
        let height = (tile * self.tuning.attack_height) as i32;
        let reach = (tile * self.tuning.attack_reach) as i32;
        let rect = self.body.hitbox();
        let direction = self.swing.map_or(self.facing, |swing| swing.direction);

        match direction {
            Direction::East => PixelRect::new(
                rect.right() + reach,
                rect.center_y() - height / 2,
                width,
                height,
            ),
            Direction::West => PixelRect::new(
                rect.left() - width - reach,
                rect.center_y() - height / 2,
                width,
                height,
            ),
            Direction::North => PixelRect::new(
                rect.center_x() - width / 2,
                rect.top() - height - reach,
                width,
                height,
            ),
            Direction::South => PixelRect::new(
                rect.center_x() - width / 2,
                rect.bottom() + reach,
                width,
                height,
            ),
        }
    }

    /// Applies damage unless invulnerable or already dead.
    ///
    /// Accepted damage starts the invulnerability window.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.invulnerable_timer > 0.0 || self.hp == 0 {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);
        self.invulnerable_timer = self.tuning.invulnerability;
        true
    }

    /// Restores hit points up to the maximum.
    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.tuning.max_hp);
    }

    /// Turns the player without moving.
    pub fn face(&mut self, direction: Direction) {
        self.facing = direction;
    }

    /// Reports whether the player has hit points left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// Hit points at spawn.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        self.tuning.max_hp
    }

    /// Effective walking speed in pixels per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Reports whether damage is currently ignored.
    #[must_use]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0.0
    }

    /// Current facing direction.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Animation frame: the swing frame while attacking, else the walk frame.
    #[must_use]
    pub fn animation_frame(&self) -> u8 {
        match self.swing {
            Some(swing) => {
                let frame = (swing.elapsed / self.tuning.attack_frame_time) as u8;
                frame.min(ATTACK_FRAMES - 1)
            }
            None => self.walk_frame,
        }
    }

    /// Collision body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Mutable collision body, for separation pushes.
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Collision rectangle.
    #[must_use]
    pub const fn hitbox(&self) -> PixelRect {
        self.body.hitbox()
    }

    /// Integer centre of the hitbox.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Tile under the hitbox centre.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        self.body.center_tile(self.tile_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn player() -> Player {
        Player::new(TileCoord::new(4, 4), 16, 1, PlayerTuning::default())
    }

    fn no_walls(_: PixelRect) -> Vec<PixelRect> {
        Vec::new()
    }

    #[test]
    fn spawn_hitbox_sits_at_tile_feet() {
        let player = player();
        assert_eq!(player.hitbox(), PixelRect::new(69, 76, 7, 4));
        assert_eq!(player.tile(), TileCoord::new(4, 4));
    }

    #[test]
    fn facing_prefers_horizontal_input() {
        let mut player = player();
        player.update(DT, MoveIntent::walk(Vec2::new(-1.0, 1.0)), no_walls);
        assert_eq!(player.facing(), Direction::West);
        player.update(DT, MoveIntent::walk(Vec2::new(0.0, -1.0)), no_walls);
        assert_eq!(player.facing(), Direction::North);
    }

    #[test]
    fn running_covers_more_ground() {
        let mut walker = player();
        let mut runner = player();
        for _ in 0..30 {
            walker.update(DT, MoveIntent::walk(Vec2::X), no_walls);
            runner.update(
                DT,
                MoveIntent {
                    direction: Vec2::X,
                    run: true,
                },
                no_walls,
            );
        }
        assert!(runner.body().position().x > walker.body().position().x + 20.0);
    }

    #[test]
    fn swing_window_and_cooldown() {
        let mut player = player();
        assert!(player.start_attack());
        assert!(!player.start_attack());
        assert!(!player.attack_hitbox_active());

        player.update(0.1, MoveIntent::IDLE, no_walls);
        assert!(player.attack_hitbox_active());
        assert_eq!(player.animation_frame(), 1);

        player.update(0.1, MoveIntent::IDLE, no_walls);
        assert!(!player.attack_hitbox_active());

        player.update(0.1, MoveIntent::IDLE, no_walls);
        assert!(!player.is_attacking());
        assert!(!player.start_attack());

        player.update(0.3, MoveIntent::IDLE, no_walls);
        assert!(player.start_attack());
    }

    #[test]
    fn movement_is_locked_during_swing() {
        let mut player = player();
        assert!(player.start_attack());
        let before = player.hitbox();
        player.update(DT, MoveIntent::walk(Vec2::X), no_walls);
        assert_eq!(player.hitbox(), before);
    }

    #[test]
    fn attack_rect_extends_in_swing_direction() {
        let mut player = player();
        player.face(Direction::East);
        let hitbox = player.hitbox();
        let attack = player.attack_hitbox();
        assert_eq!(attack.left(), hitbox.right() + 5);
        assert_eq!(attack.width(), 14);
        assert_eq!(attack.height(), 11);

        player.face(Direction::North);
        assert_eq!(player.attack_hitbox().bottom(), hitbox.top() - 5);
    }

    #[test]
    fn invulnerability_gates_repeat_damage() {
        let mut player = player();
        assert!(player.take_damage(1));
        assert!(!player.take_damage(1));
        assert_eq!(player.hp(), 5);

        player.update(0.81, MoveIntent::IDLE, no_walls);
        assert!(player.take_damage(2));
        assert_eq!(player.hp(), 3);
    }

    #[test]
    fn heal_is_clamped_to_maximum() {
        let mut player = player();
        assert!(player.take_damage(1));
        player.heal(5);
        assert_eq!(player.hp(), player.max_hp());
    }
}
