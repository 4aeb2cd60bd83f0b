#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Monster behaviour: aggro detection, periodic re-planning, waypoint
//! steering, knockback and the dying countdown.
//!
//! A [`Monster`] owns its cached path and timers; everything it needs to know
//! about the map arrives through the closures passed to [`Monster::update`],
//! so the same state machine runs against a live world or a test fixture.

mod tuning;

use std::collections::VecDeque;

use dungeon_core::{Direction, MonsterId, PixelRect, SpeciesConfig, TileCoord};
use dungeon_system_movement::Body;
use dungeon_system_pathfinding::find_path_bounded;
use glam::Vec2;
use tracing::{debug, trace};

pub use tuning::AiTuning;

/// Observable behaviour state of a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MonsterState {
    /// Player out of range; the monster stands and animates.
    Idle,
    /// Player within the aggro radius; following a path or a straight line.
    Chasing,
    /// Being pushed by a hit; chase logic is suspended.
    Knockback,
    /// Playing the death animation; ignores damage and knockback.
    Dying,
    /// Death animation finished; ready to be removed.
    Dead,
}

/// Single monster instance parameterised by its species tunables.
#[derive(Clone, Debug)]
pub struct Monster {
    id: MonsterId,
    config: SpeciesConfig,
    tuning: AiTuning,
    tile_size: i32,
    speed: f32,
    aggro_radius: f32,
    hp: u32,
    body: Body,
    facing: Direction,
    chasing: bool,
    anim_timer: f32,
    anim_frame: u8,
    hit_timer: f32,
    hp_bar_timer: f32,
    dying: bool,
    dying_timer: f32,
    path: VecDeque<TileCoord>,
    repath_timer: f32,
    last_goal: Option<TileCoord>,
    knockback_velocity: Vec2,
    knockback_timer: f32,
}

impl Monster {
    /// Spawns a monster standing on `spawn_tile`.
    ///
    /// The hitbox is anchored to the bottom centre of the tile. Speed scales
    /// with `display_scale` (at least 1); the aggro radius is measured in
    /// whole tiles of `tile_size` pixels.
    #[must_use]
    pub fn new(
        id: MonsterId,
        config: SpeciesConfig,
        spawn_tile: TileCoord,
        tile_size: i32,
        display_scale: u32,
        tuning: AiTuning,
    ) -> Self {
        let body = Body::anchored(
            spawn_tile.column() * tile_size,
            spawn_tile.row() * tile_size,
            tile_size,
            tuning.hitbox_width,
            tuning.hitbox_height,
        );
        Self {
            id,
            config,
            tuning,
            tile_size,
            speed: config.speed * display_scale.max(1) as f32,
            aggro_radius: config.aggro_tiles as f32 * tile_size as f32,
            hp: config.max_hp,
            body,
            facing: Direction::South,
            chasing: false,
            anim_timer: 0.0,
            anim_frame: 0,
            hit_timer: 0.0,
            hp_bar_timer: 0.0,
            dying: false,
            dying_timer: 0.0,
            path: VecDeque::new(),
            repath_timer: 0.0,
            last_goal: None,
            knockback_velocity: Vec2::ZERO,
            knockback_timer: 0.0,
        }
    }

    /// Advances the monster by `dt` seconds against the current player hitbox.
    ///
    /// `colliders_for_rect` answers collision queries and `is_blocked_tile`
    /// answers planning queries over a `grid_width x grid_height` grid. Returns
    /// the state the monster is in after the update.
    pub fn update<C, I, B>(
        &mut self,
        dt: f32,
        player_rect: PixelRect,
        colliders_for_rect: C,
        grid_width: u32,
        grid_height: u32,
        is_blocked_tile: B,
    ) -> MonsterState
    where
        C: Fn(PixelRect) -> I,
        I: IntoIterator<Item = PixelRect>,
        B: Fn(TileCoord) -> bool,
    {
        self.advance_animation(dt);
        self.hit_timer = (self.hit_timer - dt).max(0.0);
        self.hp_bar_timer = (self.hp_bar_timer - dt).max(0.0);

        if self.dying {
            let was_dead = self.is_dead();
            self.dying_timer += dt;
            if !was_dead && self.is_dead() {
                debug!(monster = self.id.get(), "monster finished dying");
            }
            return self.state();
        }

        if self.knockback_timer > 0.0 {
            self.knockback_timer = (self.knockback_timer - dt).max(0.0);
            self.body
                .move_and_collide(self.knockback_velocity * dt, &colliders_for_rect);
            if self.knockback_timer > 0.0 {
                return self.state();
            }
            // Recovered this tick: drop the stale plan and chase right away.
            self.path.clear();
        }

        let center = self.body.center();
        let to_player = player_rect.center() - center;
        let distance = to_player.length();
        self.chasing = distance <= self.aggro_radius;

        let mut steer = Vec2::ZERO;
        if self.chasing {
            self.repath_timer = (self.repath_timer - dt).max(0.0);
            let goal = player_rect.center_tile(self.tile_size);
            if self.repath_timer <= 0.0 || self.last_goal != Some(goal) || self.path.is_empty() {
                self.replan(goal, grid_width, grid_height, &is_blocked_tile);
            }

            match self.path.front().copied() {
                Some(waypoint) => {
                    let to_waypoint = waypoint.center_px(self.tile_size) - center;
                    let tolerance = self.tile_size as f32 * self.tuning.waypoint_tolerance;
                    if to_waypoint.length_squared() <= tolerance * tolerance {
                        let _ = self.path.pop_front();
                    } else {
                        steer = to_waypoint.normalize();
                    }
                }
                None if distance > 0.0 => steer = to_player / distance,
                None => {}
            }
        }

        if let Some(facing) = Direction::from_dominant_axis(steer) {
            self.facing = facing;
        }

        self.body
            .move_and_collide(steer * self.speed * dt, &colliders_for_rect);

        if self.body.hitbox().overlaps(&player_rect) {
            self.body
                .push_away(player_rect.center(), self.speed * dt, &colliders_for_rect);
        }

        self.state()
    }

    fn replan<B>(&mut self, goal: TileCoord, grid_width: u32, grid_height: u32, is_blocked_tile: &B)
    where
        B: Fn(TileCoord) -> bool,
    {
        let start = self.body.center_tile(self.tile_size);
        self.repath_timer = self.tuning.repath_interval;
        self.last_goal = Some(goal);
        self.path = find_path_bounded(
            start,
            goal,
            grid_width,
            grid_height,
            is_blocked_tile,
            self.tuning.max_expansions,
        )
        .into();
        trace!(
            monster = self.id.get(),
            ?start,
            ?goal,
            steps = self.path.len(),
            "re-planned path"
        );
    }

    fn advance_animation(&mut self, dt: f32) {
        self.anim_timer += dt;
        if self.anim_timer >= self.tuning.anim_frame_time {
            self.anim_timer = 0.0;
            self.anim_frame = 1 - self.anim_frame;
        }
    }

    /// Applies damage unless the monster is already dying.
    ///
    /// Returns `false` without touching any state when the monster is dying.
    /// Otherwise hit points drop (floored at zero), the hit flash and health bar
    /// restart, and reaching zero starts the dying countdown.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.dying {
            return false;
        }

        self.hp = self.hp.saturating_sub(amount);
        self.hit_timer = self.tuning.hit_flash;
        self.hp_bar_timer = self.tuning.hp_bar_visible;
        if self.hp == 0 {
            self.dying = true;
            self.dying_timer = 0.0;
            self.hit_timer = 0.0;
            self.hp_bar_timer = 0.0;
            self.knockback_timer = 0.0;
            debug!(monster = self.id.get(), "monster started dying");
        }
        true
    }

    /// Starts a knockback with the default strength and duration.
    pub fn apply_knockback(&mut self, direction: Vec2) {
        self.apply_knockback_with(
            direction,
            self.tuning.knockback_strength,
            self.tuning.knockback_time,
        );
    }

    /// Starts or extends a knockback along `direction`.
    ///
    /// Ignored while dying or when `direction` has zero length. The velocity is
    /// replaced; the timer only ever grows.
    pub fn apply_knockback_with(&mut self, direction: Vec2, strength: f32, duration: f32) {
        if self.dying || direction.length_squared() <= 0.0 {
            return;
        }
        self.knockback_velocity = direction.normalize() * strength;
        self.knockback_timer = self.knockback_timer.max(duration);
    }

    /// Reports whether the death animation has finished.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dying && self.dying_timer >= self.tuning.dying_duration
    }

    /// Reports whether the monster has reached zero hit points.
    #[must_use]
    pub const fn is_dying(&self) -> bool {
        self.dying
    }

    /// Current behaviour state.
    #[must_use]
    pub fn state(&self) -> MonsterState {
        if self.is_dead() {
            MonsterState::Dead
        } else if self.dying {
            MonsterState::Dying
        } else if self.knockback_timer > 0.0 {
            MonsterState::Knockback
        } else if self.chasing {
            MonsterState::Chasing
        } else {
            MonsterState::Idle
        }
    }

    /// Identifier assigned at spawn time.
    #[must_use]
    pub const fn id(&self) -> MonsterId {
        self.id
    }

    /// Species tunables.
    #[must_use]
    pub const fn config(&self) -> SpeciesConfig {
        self.config
    }

    /// Effective speed in pixels per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Aggro radius in pixels.
    #[must_use]
    pub const fn aggro_radius(&self) -> f32 {
        self.aggro_radius
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// Hit points at spawn.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        self.config.max_hp
    }

    /// Collision body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
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

    /// Direction used to pick the sprite row.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Index of the current animation frame (0 or 1).
    #[must_use]
    pub const fn animation_frame(&self) -> u8 {
        self.anim_frame
    }

    /// Remaining waypoints of the cached path, nearest first.
    pub fn path(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.path.iter().copied()
    }

    /// Goal tile the cached path was planned toward.
    #[must_use]
    pub const fn last_goal(&self) -> Option<TileCoord> {
        self.last_goal
    }

    /// Reports whether the hit flash should be drawn.
    #[must_use]
    pub fn is_flashing(&self) -> bool {
        self.hit_timer > 0.0
    }

    /// Opacity of the health bar in `[0, 1]`; fades out at the end of its window.
    #[must_use]
    pub fn hp_bar_opacity(&self) -> f32 {
        if self.hp_bar_timer <= 0.0 {
            return 0.0;
        }
        if self.tuning.hp_bar_fade <= 0.0 {
            return 1.0;
        }
        (self.hp_bar_timer / self.tuning.hp_bar_fade).min(1.0)
    }

    /// Fraction of the death animation already played, in `[0, 1]`.
    #[must_use]
    pub fn dying_progress(&self) -> f32 {
        if !self.dying {
            return 0.0;
        }
        if self.tuning.dying_duration <= 0.0 {
            return 1.0;
        }
        (self.dying_timer / self.tuning.dying_duration).min(1.0)
    }
}
