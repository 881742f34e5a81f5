//! Procedural level generation split into one module per engine plus the
//! shared grid, wall dressing, configuration and seeding pieces.

pub mod bsp;
pub mod config;
pub mod drunkard;
pub mod grid;
pub mod hunt_kill;
pub mod model;
pub mod random;
pub mod walls;

mod seed;
mod walk;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

pub use bsp::{BspRoomEngine, CorridorChain, PartitionTree, RoomRect, connect_rooms, partition};
pub use config::{
    Algorithm, BspConfig, ConfigError, DrunkardWalkConfig, HuntAndKillConfig, HuntMode,
    LevelConfig,
};
pub use drunkard::DrunkardWalkEngine;
pub use grid::Grid;
pub use hunt_kill::{HuntAndKillEngine, MiningOutcome};
pub use model::{GeneratedLevel, GenerationReport};
pub use random::{RandomSource, ScriptedSource};
pub use seed::derive_level_seed;

/// Validates `config` and runs the matching engine once.
pub fn generate_level(
    config: &LevelConfig,
    rng: &mut impl RandomSource,
) -> Result<GeneratedLevel, ConfigError> {
    let level = match config {
        LevelConfig::DrunkardWalk(walk) => DrunkardWalkEngine::new(walk.clone())?.generate(rng),
        LevelConfig::HuntAndKill(maze) => HuntAndKillEngine::new(maze.clone())?.generate(rng),
        LevelConfig::Bsp(rooms) => BspRoomEngine::new(rooms.clone())?.generate(rng),
    };
    Ok(level)
}

/// Generates level `level_index` of a run from a ChaCha stream seeded by
/// [`derive_level_seed`].
pub fn generate_seeded(
    config: &LevelConfig,
    run_seed: u64,
    level_index: u32,
) -> Result<GeneratedLevel, ConfigError> {
    let seed = derive_level_seed(run_seed, level_index, config.algorithm());
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_level(config, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_seeded_matches_the_engine_run_directly() {
        let config = LevelConfig::default_for(Algorithm::HuntAndKill);
        let from_helper = generate_seeded(&config, 123, 2).expect("default config is valid");

        let mut rng = ChaCha8Rng::seed_from_u64(derive_level_seed(123, 2, Algorithm::HuntAndKill));
        let engine = HuntAndKillEngine::new(HuntAndKillConfig::default()).expect("valid config");
        assert_eq!(from_helper, engine.generate(&mut rng));
    }

    #[test]
    fn consecutive_levels_of_a_run_differ() {
        let config = LevelConfig::default_for(Algorithm::DrunkardWalk);
        let first = generate_seeded(&config, 7, 0).expect("valid");
        let second = generate_seeded(&config, 7, 1).expect("valid");
        assert_ne!(first.grid, second.grid);
    }

    #[test]
    fn invalid_config_is_rejected_before_generation() {
        let config = LevelConfig::Bsp(BspConfig { min_room_width: 0, ..Default::default() });
        assert!(matches!(generate_seeded(&config, 1, 0), Err(ConfigError::ZeroRoomSize { .. })));
    }
}
