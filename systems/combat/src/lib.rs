#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player/monster interactions resolved once per tick: sword hits, contact
//! damage and body separation.

use dungeon_core::{MonsterId, PixelRect};
use dungeon_system_monster_ai::Monster;
use dungeon_system_player::Player;
use tracing::debug;

/// Damage dealt by one sword hit.
pub const SWORD_DAMAGE: u32 = 1;

/// Damage dealt to the player by touching a monster.
pub const CONTACT_DAMAGE: u32 = 1;

/// Centre distance, in tiles, within which a monster hurts the player.
pub const CONTACT_RANGE_TILES: f32 = 0.75;

/// Applies the current swing to every monster under the attack rectangle.
///
/// Does nothing outside the damaging window or when this swing has already
/// landed. Monsters that accept the damage are knocked back away from the
/// player and their identifiers are pushed onto `out_hits`. The swing is
/// marked as spent even when it hits nothing.
pub fn resolve_attack(player: &mut Player, monsters: &mut [Monster], out_hits: &mut Vec<MonsterId>) {
    if !player.attack_hitbox_active() || player.attack_damage_applied() {
        return;
    }

    let attack = player.attack_hitbox();
    let origin = player.center();
    for monster in monsters.iter_mut() {
        if !attack.overlaps(&monster.hitbox()) {
            continue;
        }
        if monster.take_damage(SWORD_DAMAGE) {
            monster.apply_knockback(monster.center() - origin);
            debug!(monster = monster.id().get(), hp = monster.hp(), "sword hit");
            out_hits.push(monster.id());
        }
    }
    player.mark_attack_damage_applied();
}

/// Damages the player for each live monster close enough to touch.
///
/// Invulnerability after the first accepted hit absorbs the rest. Returns the
/// number of hits the player accepted.
pub fn apply_contact_damage(player: &mut Player, monsters: &[Monster], tile_size: i32) -> u32 {
    let range = tile_size as f32 * CONTACT_RANGE_TILES;
    let mut accepted = 0;
    for monster in monsters.iter().filter(|monster| !monster.is_dying()) {
        if monster.center().distance(player.center()) <= range && player.take_damage(CONTACT_DAMAGE) {
            debug!(monster = monster.id().get(), hp = player.hp(), "player hit");
            accepted += 1;
        }
    }
    accepted
}

/// Pushes the player out of every live monster it overlaps.
///
/// Each push moves the player `player.speed() * dt` pixels away from the
/// monster's centre and is undone if it would land inside a collider.
pub fn separate_player<F, I>(player: &mut Player, monsters: &[Monster], dt: f32, colliders_for_rect: F)
where
    F: Fn(PixelRect) -> I,
    I: IntoIterator<Item = PixelRect>,
{
    for monster in monsters.iter().filter(|monster| !monster.is_dying()) {
        if !player.hitbox().overlaps(&monster.hitbox()) {
            continue;
        }
        let away = player.center() - monster.center();
        if away.length_squared() <= 0.0 {
            continue;
        }
        let offset = away.normalize() * player.speed() * dt;
        let _ = player.body_mut().try_shift(offset, &colliders_for_rect);
    }
}
