use serde::{Deserialize, Serialize};

/// Timing and steering constants shared by every monster, independent of species.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Seconds between forced path re-plans while chasing.
    pub repath_interval: f32,
    /// Heap pops allowed per path search.
    pub max_expansions: usize,
    /// Radius, as a fraction of a tile, within which a waypoint counts as reached.
    pub waypoint_tolerance: f32,
    /// Seconds the dying animation plays before the monster is dead.
    pub dying_duration: f32,
    /// Seconds the hit flash stays visible after taking damage.
    pub hit_flash: f32,
    /// Seconds the health bar stays visible after taking damage.
    pub hp_bar_visible: f32,
    /// Seconds over which the health bar fades out at the end of its visibility.
    pub hp_bar_fade: f32,
    /// Seconds per frame of the two-frame idle/walk loop.
    pub anim_frame_time: f32,
    /// Default knockback speed in pixels per second.
    pub knockback_strength: f32,
    /// Default knockback duration in seconds.
    pub knockback_time: f32,
    /// Hitbox width as a fraction of a tile.
    pub hitbox_width: f32,
    /// Hitbox height as a fraction of a tile.
    pub hitbox_height: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            repath_interval: 0.40,
            max_expansions: dungeon_system_pathfinding::DEFAULT_MAX_EXPANSIONS,
            waypoint_tolerance: 0.15,
            dying_duration: 0.60,
            hit_flash: 0.25,
            hp_bar_visible: 2.5,
            hp_bar_fade: 0.5,
            anim_frame_time: 0.20,
            knockback_strength: 220.0,
            knockback_time: 0.12,
            hitbox_width: 0.75,
            hitbox_height: 0.50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let tuning: AiTuning = toml::from_str("repath_interval = 0.8\nmax_expansions = 50\n")
            .expect("valid tuning");
        assert!((tuning.repath_interval - 0.8).abs() < f32::EPSILON);
        assert_eq!(tuning.max_expansions, 50);
        assert_eq!(tuning.dying_duration, AiTuning::default().dying_duration);
        assert_eq!(tuning.knockback_time, AiTuning::default().knockback_time);
    }

    #[test]
    fn empty_table_is_default() {
        let tuning: AiTuning = toml::from_str("").expect("empty table");
        assert_eq!(tuning, AiTuning::default());
    }
}
