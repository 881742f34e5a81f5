use std::collections::{BTreeSet, VecDeque};

use anyhow::{Result, ensure};
use clap::Parser;
use dungen::mapgen::{
    Algorithm, GeneratedLevel, Grid, HuntAndKillConfig, HuntAndKillEngine, LevelConfig,
    MiningOutcome, derive_level_seed, generate_seeded,
};
use dungen::{Direction, Pos, TileKind};
use log::{debug, info};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Levels generated per algorithm
    #[arg(short, long, default_value_t = 200)]
    levels: u32,
    /// Walls mined on every Hunt-and-Kill level
    #[arg(short, long, default_value_t = 25)]
    mines: u32,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn reachable_from(grid: &Grid, start: Pos) -> BTreeSet<Pos> {
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        for direction in Direction::ALL {
            let next = pos.step(direction);
            if grid.in_bounds(next) && grid.get(next).is_walkable() && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn on_edge(grid: &Grid, pos: Pos) -> bool {
    let (last_x, last_y) = (grid.width() as i32 - 1, grid.height() as i32 - 1);
    pos.x == 0 || pos.y == 0 || pos.x == last_x || pos.y == last_y
}

fn check_level(level: &GeneratedLevel) -> Result<()> {
    let grid = &level.grid;

    ensure!(grid.count(TileKind::Start) == 1, "expected exactly one Start tile");
    ensure!(grid.get(level.spawn) == TileKind::Start, "spawn {:?} is not Start", level.spawn);
    ensure!(grid.get(level.exit).is_walkable(), "exit {:?} is not walkable", level.exit);

    for pos in grid.positions() {
        let tile = grid.get(pos);
        ensure!(!(on_edge(grid, pos) && tile.is_walkable()), "walkable border cell at {pos:?}");
        if tile.is_walkable() {
            ensure!(
                grid.neighbors8(pos).all(|n| grid.get(n) != TileKind::Empty),
                "{tile:?} at {pos:?} touches Empty"
            );
        }
    }

    if level.algorithm == Algorithm::Bsp {
        let reachable = reachable_from(grid, level.spawn);
        let walkable = grid.positions().filter(|&pos| grid.get(pos).is_walkable()).count();
        ensure!(reachable.len() == walkable, "BSP level has unreachable floor");
        ensure!(
            level.room_centers.first() == Some(&level.spawn)
                && level.room_centers.last() == Some(&level.exit),
            "BSP anchors do not match the room order"
        );
    }
    Ok(())
}

fn check_mining(
    engine: &HuntAndKillEngine,
    level: &mut GeneratedLevel,
    rng: &mut ChaCha8Rng,
    mines: u32,
) -> Result<()> {
    for _ in 0..mines {
        let walls: Vec<Pos> =
            level.grid.positions().filter(|&pos| level.grid.get(pos).is_wall()).collect();
        if walls.is_empty() {
            break;
        }
        let target = choose(rng, &walls);
        let before = level.grid.clone();

        let (mined, new_walls) = match engine.mine_wall(&mut level.grid, target) {
            MiningOutcome::Mined { pos, new_walls } => (pos, new_walls),
            MiningOutcome::NotAWall(_) => {
                ensure!(on_edge(&before, target), "interior wall at {target:?} was not mined");
                ensure!(level.grid == before, "skipped mine at {target:?} changed the grid");
                continue;
            }
        };
        ensure!(!on_edge(&before, mined), "mining {target:?} opened edge cell {mined:?}");
        ensure!(on_edge(&before, target) || mined == target, "mined {mined:?} for {target:?}");
        ensure!(level.grid.get(mined) == TileKind::Floor, "mined cell {mined:?} is not Floor");

        let neighborhood: BTreeSet<Pos> = before.neighbors8(mined).collect();
        ensure!(
            new_walls.iter().all(|cell| neighborhood.contains(cell)),
            "mining {mined:?} walled cells outside its neighborhood"
        );
        for cell in level.grid.positions() {
            let changed = before.get(cell) != level.grid.get(cell);
            ensure!(
                !changed || cell == mined || neighborhood.contains(&cell),
                "mining {mined:?} changed {cell:?}"
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Starting map fuzz on seed {} for {} levels per algorithm...", args.seed, args.levels);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let algorithms = [Algorithm::DrunkardWalk, Algorithm::HuntAndKill, Algorithm::Bsp];

    for level_index in 0..args.levels {
        for algorithm in algorithms {
            let config = LevelConfig::default_for(algorithm);
            let level = generate_seeded(&config, args.seed, level_index)?;
            check_level(&level)?;
            debug!("{algorithm:?} level {level_index} ok: {:?}", level.report);
        }

        let engine = HuntAndKillEngine::new(HuntAndKillConfig::default())?;
        let seed = derive_level_seed(args.seed, level_index, Algorithm::HuntAndKill);
        let mut level = engine.generate(&mut ChaCha8Rng::seed_from_u64(seed));
        check_mining(&engine, &mut level, &mut rng, args.mines)?;
    }

    info!("checked {} levels", args.levels * algorithms.len() as u32);
    println!("Fuzzing completed successfully.");
    Ok(())
}
