mod level_file;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use dungen::mapgen::{
    Algorithm, GeneratedLevel, HuntAndKillConfig, HuntAndKillEngine, LevelConfig, MiningOutcome,
    derive_level_seed, generate_seeded,
};
use dungen::Pos;
use log::info;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

use crate::level_file::LevelFile;

const DEFAULT_SEED: u64 = 42;

#[derive(Parser)]
#[command(author, version, about = "Procedural dungeon layout generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one level and print its map and report
    Generate {
        /// Engine to run; defaults to the algorithm named in --config, else bsp
        #[arg(short, long, value_enum)]
        algorithm: Option<AlgorithmArg>,

        /// TOML level file with a `[level]` table
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Run seed; overrides the seed stored in the level file
        #[arg(short, long)]
        seed: Option<u64>,

        /// Level index within the run
        #[arg(short, long, default_value_t = 0)]
        level: u32,

        /// Print the generated level as JSON instead of ASCII
        #[arg(long)]
        json: bool,

        /// Save the effective configuration and seed to a level file
        #[arg(long)]
        write_config: Option<PathBuf>,
    },
    /// Generate a Hunt-and-Kill level, then mine the given walls in order
    Mine {
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Cell to mine as `x,y`; repeatable
        #[arg(long = "at", value_parser = parse_pos)]
        at: Vec<Pos>,

        /// TOML level file whose `[level]` table is a hunt-and-kill config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    Drunkard,
    HuntKill,
    Bsp,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Drunkard => Self::DrunkardWalk,
            AlgorithmArg::HuntKill => Self::HuntAndKill,
            AlgorithmArg::Bsp => Self::Bsp,
        }
    }
}

fn parse_pos(value: &str) -> Result<Pos, String> {
    let (x, y) = value.split_once(',').ok_or_else(|| format!("expected x,y, got `{value}`"))?;
    let parse = |part: &str| {
        part.trim().parse::<i32>().map_err(|e| format!("invalid coordinate `{part}`: {e}"))
    };
    Ok(Pos::new(parse(x)?, parse(y)?))
}

fn resolve_level(
    algorithm: Option<AlgorithmArg>,
    config: Option<&Path>,
    seed: Option<u64>,
) -> Result<LevelFile> {
    let Some(path) = config else {
        let algorithm = algorithm.map_or(Algorithm::Bsp, Algorithm::from);
        return Ok(LevelFile {
            seed: seed.or(Some(DEFAULT_SEED)),
            level: LevelConfig::default_for(algorithm),
        });
    };

    let mut file = LevelFile::load(path)?;
    if let Some(requested) = algorithm.map(Algorithm::from)
        && requested != file.level.algorithm()
    {
        bail!(
            "--algorithm {requested:?} conflicts with {:?} in {}",
            file.level.algorithm(),
            path.display()
        );
    }
    file.seed = seed.or(file.seed).or(Some(DEFAULT_SEED));
    Ok(file)
}

fn print_level(level: &GeneratedLevel, json: bool) -> Result<()> {
    if json {
        let encoded =
            serde_json::to_string_pretty(level).context("Failed to encode level as JSON")?;
        println!("{encoded}");
        return Ok(());
    }

    print!("{}", level.grid);
    println!("Algorithm: {:?}", level.algorithm);
    println!(
        "Spawn: ({}, {})  Exit: ({}, {})",
        level.spawn.x, level.spawn.y, level.exit.x, level.exit.y
    );
    println!(
        "Iterations: {}  Floor cells: {}  Fill reached: {}",
        level.report.iterations, level.report.floor_count, level.report.fill_reached
    );
    if level.report.hunts > 0 {
        println!("Hunts: {}", level.report.hunts);
    }
    if !level.room_centers.is_empty() {
        println!("Rooms: {}  Corridor cells: {}", level.room_centers.len(), level.corridors.len());
    }
    Ok(())
}

fn run_generate(
    algorithm: Option<AlgorithmArg>,
    config: Option<PathBuf>,
    seed: Option<u64>,
    level_index: u32,
    json: bool,
    write_config: Option<PathBuf>,
) -> Result<()> {
    let file = resolve_level(algorithm, config.as_deref(), seed)?;
    let run_seed = file.seed.unwrap_or(DEFAULT_SEED);
    let level = generate_seeded(&file.level, run_seed, level_index)
        .context("Level configuration rejected")?;
    info!(
        "generated {:?} level {level_index} for seed {run_seed}",
        file.level.algorithm()
    );

    if let Some(path) = write_config {
        file.write_atomic(&path)?;
        info!("wrote level file {}", path.display());
    }
    print_level(&level, json)
}

fn run_mine(seed: u64, targets: &[Pos], config: Option<PathBuf>) -> Result<()> {
    let maze = match config {
        Some(path) => match LevelFile::load(&path)?.level {
            LevelConfig::HuntAndKill(maze) => maze,
            other => bail!(
                "mining needs a hunt-and-kill level, {} has {:?}",
                path.display(),
                other.algorithm()
            ),
        },
        None => HuntAndKillConfig::default(),
    };

    let engine = HuntAndKillEngine::new(maze).context("Level configuration rejected")?;
    let mut rng = ChaCha8Rng::seed_from_u64(derive_level_seed(seed, 0, Algorithm::HuntAndKill));
    let mut level = engine.generate(&mut rng);

    for &target in targets {
        if !level.grid.in_bounds(target) {
            bail!(
                "({}, {}) is outside the {}x{} grid",
                target.x,
                target.y,
                level.grid.width(),
                level.grid.height()
            );
        }
        match engine.mine_wall(&mut level.grid, target) {
            MiningOutcome::Mined { pos, new_walls } => {
                println!("Mined ({}, {}): {} new walls", pos.x, pos.y, new_walls.len());
            }
            MiningOutcome::NotAWall(tile) => {
                println!("Skipped ({}, {}): {tile:?} is not a wall", target.x, target.y);
            }
        }
    }
    print_level(&level, false)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate { algorithm, config, seed, level, json, write_config } => {
            run_generate(algorithm, config, seed, level, json, write_config)
        }
        Commands::Mine { seed, at, config } => run_mine(seed, &at, config),
    }
}
