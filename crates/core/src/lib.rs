pub mod mapgen;
pub mod types;

pub use mapgen::{GeneratedLevel, Grid, LevelConfig, generate_level, generate_seeded};
pub use types::*;
