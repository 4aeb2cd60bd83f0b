use std::{fs, io, path::Path};

use dungeon_system_monster_ai::AiTuning;
use dungeon_system_player::PlayerTuning;
use dungeon_system_spawning::DEFAULT_COIN_CHANCE;
use dungeon_world::{DEFAULT_INFLATE_MARGIN, DEFAULT_TILE_SIZE};
use serde::Deserialize;
use thiserror::Error;

/// Settings for a headless session, read from an optional TOML file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct SimulationConfig {
    /// Unscaled tile edge in pixels.
    pub(crate) tile_size: i32,
    /// Integer display scale applied to tiles and speeds.
    pub(crate) display_scale: u32,
    /// Chebyshev margin around blocked tiles used for planning.
    pub(crate) inflate_margin: u32,
    /// Ticks to simulate before the session stops on its own.
    pub(crate) ticks: u64,
    /// Fixed steps per simulated second.
    pub(crate) frame_rate: u32,
    /// Seed for the drop generator.
    pub(crate) seed: u64,
    /// Probability that a drop is a coin.
    pub(crate) coin_chance: f64,
    /// Monster tuning (`[ai]` table).
    pub(crate) ai: AiTuning,
    /// Player tuning (`[player]` table).
    pub(crate) player: PlayerTuning,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            display_scale: 1,
            inflate_margin: DEFAULT_INFLATE_MARGIN,
            ticks: 1800,
            frame_rate: 60,
            seed: 1,
            coin_chance: DEFAULT_COIN_CHANCE,
            ai: AiTuning::default(),
            player: PlayerTuning::default(),
        }
    }
}

impl SimulationConfig {
    /// Reads and validates a configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parses and validates a configuration document.
    pub(crate) fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()
    }

    /// Tile edge after display scaling.
    pub(crate) fn scaled_tile_size(&self) -> i32 {
        self.checked_tile_size().unwrap_or(self.tile_size)
    }

    fn checked_tile_size(&self) -> Option<i32> {
        let scale = i32::try_from(self.display_scale).ok()?;
        self.tile_size.checked_mul(scale)
    }

    /// Seconds per fixed step.
    pub(crate) fn step_seconds(&self) -> f32 {
        1.0 / self.frame_rate as f32
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.tile_size <= 0 {
            return Err(ConfigError::Invalid {
                field: "tile_size",
                reason: format!("must be positive, got {}", self.tile_size),
            });
        }
        if self.display_scale == 0 {
            return Err(ConfigError::Invalid {
                field: "display_scale",
                reason: "must be positive".to_owned(),
            });
        }
        if self.checked_tile_size().is_none() {
            return Err(ConfigError::Invalid {
                field: "display_scale",
                reason: format!(
                    "scaling tile_size {} by {} overflows",
                    self.tile_size, self.display_scale
                ),
            });
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "frame_rate",
                reason: "must be positive".to_owned(),
            });
        }
        if !(0.0..=1.0).contains(&self.coin_chance) {
            return Err(ConfigError::Invalid {
                field: "coin_chance",
                reason: format!("must lie in [0, 1], got {}", self.coin_chance),
            });
        }
        Ok(self)
    }
}

/// Failures while loading a [`SimulationConfig`].
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[from] io::Error),
    /// The document is not valid TOML for the expected shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but is outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
