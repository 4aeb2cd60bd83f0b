#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Axis-separated movement and collision resolution shared by every agent.
//!
//! Agents keep a floating-point position for smooth sub-pixel motion and an
//! integer hitbox whose top-left corner is the floored position. Movement is
//! resolved X first, then Y: after each axis step the hitbox is snapped out of
//! every collider it overlaps along that axis only.

use dungeon_core::{PixelRect, TileCoord};
use glam::Vec2;

/// Moves a hitbox by `delta`, resolving collisions one axis at a time.
///
/// `colliders_for_rect` is queried with the hitbox after each axis step and
/// must return every solid rectangle that may overlap it. Overlaps are
/// corrected by snapping the leading edge onto the collider's facing edge;
/// there is no bounce. Returns the corrected float position and hitbox.
pub fn move_and_collide<F, I>(
    position: Vec2,
    hitbox: PixelRect,
    delta: Vec2,
    colliders_for_rect: F,
) -> (Vec2, PixelRect)
where
    F: Fn(PixelRect) -> I,
    I: IntoIterator<Item = PixelRect>,
{
    let mut position = position;

    position.x += delta.x;
    let mut rect = hitbox.with_left(floor_px(position.x));
    for collider in colliders_for_rect(rect) {
        if !rect.overlaps(&collider) {
            continue;
        }
        if delta.x > 0.0 {
            rect = rect.with_left(collider.left() - rect.width());
        } else if delta.x < 0.0 {
            rect = rect.with_left(collider.right());
        }
        position.x = rect.left() as f32;
    }

    position.y += delta.y;
    rect = rect.with_top(floor_px(position.y));
    for collider in colliders_for_rect(rect) {
        if !rect.overlaps(&collider) {
            continue;
        }
        if delta.y > 0.0 {
            rect = rect.with_top(collider.top() - rect.height());
        } else if delta.y < 0.0 {
            rect = rect.with_top(collider.bottom());
        }
        position.y = rect.top() as f32;
    }

    (position, rect)
}

/// Float position paired with the integer hitbox it drives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    position: Vec2,
    hitbox: PixelRect,
}

impl Body {
    /// Creates a body whose position is the top-left corner of `hitbox`.
    #[must_use]
    pub fn from_hitbox(hitbox: PixelRect) -> Self {
        Self {
            position: Vec2::new(hitbox.left() as f32, hitbox.top() as f32),
            hitbox,
        }
    }

    /// Creates a body whose hitbox sits at the feet of a one-tile sprite.
    ///
    /// The hitbox measures `width_ratio x height_ratio` of a tile (truncated to
    /// whole pixels) and its bottom edge is centred on the bottom edge of the
    /// sprite cell whose top-left pixel is `(sprite_x, sprite_y)`.
    #[must_use]
    pub fn anchored(
        sprite_x: i32,
        sprite_y: i32,
        tile_size: i32,
        width_ratio: f32,
        height_ratio: f32,
    ) -> Self {
        let width = (tile_size as f32 * width_ratio) as i32;
        let height = (tile_size as f32 * height_ratio) as i32;
        Self::from_hitbox(PixelRect::from_mid_bottom(
            sprite_x + tile_size / 2,
            sprite_y + tile_size,
            width,
            height,
        ))
    }

    /// Sub-pixel position of the hitbox's top-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Integer collision rectangle.
    #[must_use]
    pub const fn hitbox(&self) -> PixelRect {
        self.hitbox
    }

    /// Integer centre of the hitbox.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.hitbox.center()
    }

    /// Tile under the hitbox centre.
    #[must_use]
    pub const fn center_tile(&self, tile_size: i32) -> TileCoord {
        self.hitbox.center_tile(tile_size)
    }

    /// Moves the body through [`move_and_collide`].
    pub fn move_and_collide<F, I>(&mut self, delta: Vec2, colliders_for_rect: F)
    where
        F: Fn(PixelRect) -> I,
        I: IntoIterator<Item = PixelRect>,
    {
        let (position, hitbox) =
            move_and_collide(self.position, self.hitbox, delta, colliders_for_rect);
        self.position = position;
        self.hitbox = hitbox;
    }

    /// Pushes the body `distance` pixels directly away from `origin`.
    ///
    /// The push is swept through [`move_and_collide`], so it never ends inside
    /// a collider. Coincident centres give no separation direction and leave
    /// the body untouched.
    pub fn push_away<F, I>(&mut self, origin: Vec2, distance: f32, colliders_for_rect: F)
    where
        F: Fn(PixelRect) -> I,
        I: IntoIterator<Item = PixelRect>,
    {
        let away = self.center() - origin;
        if away.length_squared() <= 0.0 {
            return;
        }
        self.move_and_collide(away.normalize() * distance, colliders_for_rect);
    }

    /// Displaces the body by `offset` without sweeping.
    ///
    /// The displacement is undone when the new hitbox overlaps any collider.
    /// Returns whether the body kept its new position.
    pub fn try_shift<F, I>(&mut self, offset: Vec2, colliders_for_rect: F) -> bool
    where
        F: Fn(PixelRect) -> I,
        I: IntoIterator<Item = PixelRect>,
    {
        let position = self.position + offset;
        let hitbox = self
            .hitbox
            .with_position(floor_px(position.x), floor_px(position.y));
        if colliders_for_rect(hitbox)
            .into_iter()
            .any(|collider| hitbox.overlaps(&collider))
        {
            return false;
        }
        self.position = position;
        self.hitbox = hitbox;
        true
    }
}

fn floor_px(value: f32) -> i32 {
    value.floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_at(rect: PixelRect) -> impl Fn(PixelRect) -> Vec<PixelRect> {
        move |_| vec![rect]
    }

    #[test]
    fn free_motion_tracks_sub_pixel_position() {
        let body = Body::from_hitbox(PixelRect::new(10, 10, 4, 4));
        let (position, hitbox) =
            move_and_collide(body.position(), body.hitbox(), Vec2::new(0.6, 1.4), |_| {
                Vec::<PixelRect>::new()
            });
        assert!((position - Vec2::new(10.6, 11.4)).length() < 1e-4);
        assert_eq!(hitbox, PixelRect::new(10, 11, 4, 4));
    }

    #[test]
    fn positive_x_snaps_to_collider_left_edge() {
        let wall = PixelRect::new(16, 0, 16, 16);
        let (position, hitbox) = move_and_collide(
            Vec2::new(8.0, 4.0),
            PixelRect::new(8, 4, 6, 6),
            Vec2::new(5.0, 0.0),
            wall_at(wall),
        );
        assert_eq!(hitbox.right(), wall.left());
        assert!((position.x - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn negative_y_snaps_to_collider_bottom_edge() {
        let wall = PixelRect::new(0, 0, 16, 16);
        let (position, hitbox) = move_and_collide(
            Vec2::new(4.0, 18.0),
            PixelRect::new(4, 18, 6, 6),
            Vec2::new(0.0, -5.0),
            wall_at(wall),
        );
        assert_eq!(hitbox.top(), wall.bottom());
        assert!((position.y - 16.0).abs() < f32::EPSILON);
    }

    #[test]
    fn anchored_hitbox_sits_at_sprite_feet() {
        let body = Body::anchored(32, 48, 16, 0.75, 0.5);
        assert_eq!(body.hitbox(), PixelRect::new(34, 56, 12, 8));
        assert_eq!(body.position(), Vec2::new(34.0, 56.0));
        assert_eq!(body.center_tile(16), TileCoord::new(2, 3));
    }

    #[test]
    fn push_away_with_coincident_centres_is_noop() {
        let mut body = Body::from_hitbox(PixelRect::new(10, 10, 4, 4));
        let before = body;
        body.push_away(body.center(), 3.0, |_| Vec::<PixelRect>::new());
        assert_eq!(body, before);
    }

    #[test]
    fn try_shift_reverts_into_collider() {
        let wall = PixelRect::new(16, 0, 16, 16);
        let mut body = Body::from_hitbox(PixelRect::new(8, 4, 6, 6));
        let before = body;
        assert!(!body.try_shift(Vec2::new(4.0, 0.0), wall_at(wall)));
        assert_eq!(body, before);
        assert!(body.try_shift(Vec2::new(-2.0, 0.0), wall_at(wall)));
        assert_eq!(body.hitbox().left(), 6);
    }
}
