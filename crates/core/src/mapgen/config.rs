//! Engine configuration, defaults, and fail-fast validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("fill ratio must be in (0, 1], got {0}")]
    FillRatioOutOfRange(f64),

    #[error("direction change probability must be in [0, 1], got {0}")]
    ProbabilityOutOfRange(f64),

    #[error("walker count must be at least 1")]
    NoWalkers,

    #[error("max iterations must be at least 1")]
    NoIterations,

    #[error("border margin must be at least 1, got {0}")]
    BorderMarginTooSmall(usize),

    #[error("{width}x{height} grid leaves no carvable cell inside a border margin of {margin}")]
    GridTooSmall { width: usize, height: usize, margin: usize },

    #[error("minimum room size must be non-zero, got {min_width}x{min_height}")]
    ZeroRoomSize { min_width: usize, min_height: usize },

    #[error(
        "minimum room {min_width}x{min_height} does not fit in the {width}x{height} partition area"
    )]
    RoomLargerThanArea { min_width: usize, min_height: usize, width: usize, height: usize },

    #[error("room inset {inset} leaves no floor in a minimum {min_width}x{min_height} room")]
    InsetSwallowsRoom { inset: usize, min_width: usize, min_height: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    DrunkardWalk,
    HuntAndKill,
    Bsp,
}

/// Hunt-phase relocation policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HuntMode {
    /// First Empty cell in row-major order, with no adjacency check. Can leave
    /// a second region with no corridor to the first.
    #[default]
    FirstEmpty,
    /// First Empty cell with a carved 4-neighbor; the relocated cell is carved
    /// immediately so the maze stays connected.
    AdjacentToCarved,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrunkardWalkConfig {
    pub width: usize,
    pub height: usize,
    pub fill_ratio: f64,
    pub direction_change_probability: f64,
    pub max_iterations: usize,
    pub border_margin: usize,
    pub walker_count: usize,
}

impl Default for DrunkardWalkConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            fill_ratio: 0.2,
            direction_change_probability: 0.5,
            max_iterations: 100_000,
            border_margin: 1,
            walker_count: 1,
        }
    }
}

impl DrunkardWalkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_walk(
            self.width,
            self.height,
            self.fill_ratio,
            self.max_iterations,
            self.border_margin,
        )?;
        if !(0.0..=1.0).contains(&self.direction_change_probability) {
            return Err(ConfigError::ProbabilityOutOfRange(self.direction_change_probability));
        }
        if self.walker_count == 0 {
            return Err(ConfigError::NoWalkers);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuntAndKillConfig {
    pub width: usize,
    pub height: usize,
    pub fill_ratio: f64,
    pub max_iterations: usize,
    pub border_margin: usize,
    pub hunt_mode: HuntMode,
}

impl Default for HuntAndKillConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            fill_ratio: 0.2,
            max_iterations: 100_000,
            border_margin: 1,
            hunt_mode: HuntMode::FirstEmpty,
        }
    }
}

impl HuntAndKillConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_walk(
            self.width,
            self.height,
            self.fill_ratio,
            self.max_iterations,
            self.border_margin,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BspConfig {
    pub width: usize,
    pub height: usize,
    pub min_room_width: usize,
    pub min_room_height: usize,
    pub room_inset: usize,
    pub max_depth: usize,
}

impl Default for BspConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            min_room_width: 4,
            min_room_height: 4,
            room_inset: 1,
            max_depth: 16,
        }
    }
}

impl BspConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_room_width == 0 || self.min_room_height == 0 {
            return Err(ConfigError::ZeroRoomSize {
                min_width: self.min_room_width,
                min_height: self.min_room_height,
            });
        }
        if self.min_room_width > self.width || self.min_room_height > self.height {
            return Err(ConfigError::RoomLargerThanArea {
                min_width: self.min_room_width,
                min_height: self.min_room_height,
                width: self.width,
                height: self.height,
            });
        }
        if self.room_inset * 2 >= self.min_room_width.min(self.min_room_height) {
            return Err(ConfigError::InsetSwallowsRoom {
                inset: self.room_inset,
                min_width: self.min_room_width,
                min_height: self.min_room_height,
            });
        }
        Ok(())
    }
}

/// One level's worth of configuration, tagged by algorithm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "kebab-case")]
pub enum LevelConfig {
    DrunkardWalk(DrunkardWalkConfig),
    HuntAndKill(HuntAndKillConfig),
    Bsp(BspConfig),
}

impl LevelConfig {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::DrunkardWalk(_) => Algorithm::DrunkardWalk,
            Self::HuntAndKill(_) => Algorithm::HuntAndKill,
            Self::Bsp(_) => Algorithm::Bsp,
        }
    }

    pub fn default_for(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::DrunkardWalk => Self::DrunkardWalk(DrunkardWalkConfig::default()),
            Algorithm::HuntAndKill => Self::HuntAndKill(HuntAndKillConfig::default()),
            Algorithm::Bsp => Self::Bsp(BspConfig::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::DrunkardWalk(config) => config.validate(),
            Self::HuntAndKill(config) => config.validate(),
            Self::Bsp(config) => config.validate(),
        }
    }
}

fn validate_walk(
    width: usize,
    height: usize,
    fill_ratio: f64,
    max_iterations: usize,
    border_margin: usize,
) -> Result<(), ConfigError> {
    if !(fill_ratio > 0.0 && fill_ratio <= 1.0) {
        return Err(ConfigError::FillRatioOutOfRange(fill_ratio));
    }
    if max_iterations == 0 {
        return Err(ConfigError::NoIterations);
    }
    if border_margin == 0 {
        return Err(ConfigError::BorderMarginTooSmall(border_margin));
    }
    if width <= border_margin * 2 || height <= border_margin * 2 {
        return Err(ConfigError::GridTooSmall { width, height, margin: border_margin });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        for algorithm in [Algorithm::DrunkardWalk, Algorithm::HuntAndKill, Algorithm::Bsp] {
            assert_eq!(LevelConfig::default_for(algorithm).validate(), Ok(()));
        }
    }

    #[test]
    fn fill_ratio_outside_unit_interval_is_rejected() {
        for ratio in [0.0, -0.1, 1.01, f64::NAN] {
            let config = DrunkardWalkConfig { fill_ratio: ratio, ..Default::default() };
            assert!(matches!(config.validate(), Err(ConfigError::FillRatioOutOfRange(_))));
        }
        let full = HuntAndKillConfig { fill_ratio: 1.0, ..Default::default() };
        assert_eq!(full.validate(), Ok(()));
    }

    #[test]
    fn walker_settings_are_checked() {
        let no_walkers = DrunkardWalkConfig { walker_count: 0, ..Default::default() };
        assert_eq!(no_walkers.validate(), Err(ConfigError::NoWalkers));

        let bad_probability =
            DrunkardWalkConfig { direction_change_probability: 1.5, ..Default::default() };
        assert_eq!(bad_probability.validate(), Err(ConfigError::ProbabilityOutOfRange(1.5)));

        let no_iterations = HuntAndKillConfig { max_iterations: 0, ..Default::default() };
        assert_eq!(no_iterations.validate(), Err(ConfigError::NoIterations));
    }

    #[test]
    fn border_margin_must_leave_room_to_carve() {
        let zero = HuntAndKillConfig { border_margin: 0, ..Default::default() };
        assert_eq!(zero.validate(), Err(ConfigError::BorderMarginTooSmall(0)));

        let cramped = DrunkardWalkConfig { width: 4, border_margin: 2, ..Default::default() };
        assert_eq!(
            cramped.validate(),
            Err(ConfigError::GridTooSmall { width: 4, height: 30, margin: 2 })
        );
    }

    #[test]
    fn bsp_rejects_structurally_impossible_partitions() {
        let oversized = BspConfig { min_room_width: 25, ..Default::default() };
        assert!(matches!(oversized.validate(), Err(ConfigError::RoomLargerThanArea { .. })));

        let zero = BspConfig { min_room_height: 0, ..Default::default() };
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroRoomSize { .. })));

        let swallowed = BspConfig { room_inset: 2, ..Default::default() };
        assert!(matches!(swallowed.validate(), Err(ConfigError::InsetSwallowsRoom { .. })));
    }

    #[test]
    fn level_config_reads_from_toml_with_defaults() {
        let config: LevelConfig = toml::from_str(
            r#"
            algorithm = "hunt-and-kill"
            fill_ratio = 0.4
            hunt_mode = "adjacent-to-carved"
            "#,
        )
        .expect("parse level config");

        let LevelConfig::HuntAndKill(hunt) = config else {
            panic!("expected hunt-and-kill config, got {config:?}");
        };
        assert_eq!(hunt.fill_ratio, 0.4);
        assert_eq!(hunt.hunt_mode, HuntMode::AdjacentToCarved);
        assert_eq!(hunt.width, HuntAndKillConfig::default().width);
    }
}
