use std::collections::{BTreeSet, VecDeque};

use dungen::mapgen::{
    BspConfig, BspRoomEngine, DrunkardWalkConfig, DrunkardWalkEngine, GeneratedLevel, Grid,
    HuntAndKillConfig, HuntAndKillEngine, MiningOutcome, RoomRect, partition,
};
use dungen::{Pos, TileKind};
use proptest::prelude::*;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

fn walkable_from(grid: &Grid, start: Pos) -> BTreeSet<Pos> {
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        for next in [
            Pos { y: pos.y + 1, x: pos.x },
            Pos { y: pos.y - 1, x: pos.x },
            Pos { y: pos.y, x: pos.x + 1 },
            Pos { y: pos.y, x: pos.x - 1 },
        ] {
            if grid.in_bounds(next) && grid.get(next).is_walkable() && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn border_is_never_walkable(grid: &Grid, margin: usize) -> bool {
    let margin = margin as i32;
    let (width, height) = (grid.width() as i32, grid.height() as i32);
    grid.positions().all(|pos| {
        let inside = pos.x >= margin
            && pos.y >= margin
            && pos.x < width - margin
            && pos.y < height - margin;
        inside || !grid.get(pos).is_walkable()
    })
}

fn is_interior(grid: &Grid, pos: Pos) -> bool {
    pos.x > 0 && pos.y > 0 && pos.x < grid.width() as i32 - 1 && pos.y < grid.height() as i32 - 1
}

fn walls_are_dressed(level: &GeneratedLevel) -> Result<(), String> {
    let grid = &level.grid;
    for pos in grid.positions() {
        let tile = grid.get(pos);
        if tile.is_walkable()
            && let Some(empty) = grid.neighbors8(pos).find(|&n| grid.get(n) == TileKind::Empty)
        {
            return Err(format!("{tile:?} at {pos:?} touches Empty at {empty:?}"));
        }
        let below = Pos { y: pos.y - 1, x: pos.x };
        if tile == TileKind::Wall && grid.in_bounds(below) && grid.get(below).is_walkable() {
            return Err(format!("Wall at {pos:?} sits on floor and should be BottomWall"));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn drunkard_walk_terminates_inside_the_margin(
        seed in any::<u64>(),
        width in 8_usize..48,
        height in 8_usize..48,
        margin in 1_usize..3,
        walker_count in 1_usize..5,
        fill_percent in 5_u32..60,
    ) {
        let config = DrunkardWalkConfig {
            width,
            height,
            border_margin: margin,
            walker_count,
            fill_ratio: f64::from(fill_percent) / 100.0,
            max_iterations: 20_000,
            ..Default::default()
        };
        let engine = DrunkardWalkEngine::new(config.clone()).expect("valid config");
        let level = engine.generate(&mut ChaCha8Rng::seed_from_u64(seed));

        prop_assert!(level.report.iterations <= config.max_iterations);
        prop_assert!(
            level.report.fill_reached || level.report.iterations == config.max_iterations
        );
        prop_assert!(border_is_never_walkable(&level.grid, margin));
        prop_assert_eq!(level.grid.count(TileKind::Start), 1);
        prop_assert_eq!(walls_are_dressed(&level), Ok(()));
    }

    #[test]
    fn hunt_and_kill_respects_the_margin_and_dresses_walls(
        seed in any::<u64>(),
        width in 6_usize..40,
        height in 6_usize..40,
        fill_percent in 5_u32..=100,
    ) {
        let engine = HuntAndKillEngine::new(HuntAndKillConfig {
            width,
            height,
            fill_ratio: f64::from(fill_percent) / 100.0,
            ..Default::default()
        })
        .expect("valid config");
        let level = engine.generate(&mut ChaCha8Rng::seed_from_u64(seed));

        prop_assert!(border_is_never_walkable(&level.grid, 1));
        prop_assert_eq!(level.grid.get(level.spawn), TileKind::Start);
        prop_assert_eq!(walls_are_dressed(&level), Ok(()));
    }

    #[test]
    fn bsp_leaves_keep_minimums_and_never_overlap(
        seed in any::<u64>(),
        width in 8_usize..80,
        height in 8_usize..80,
        min_width in 2_usize..8,
        min_height in 2_usize..8,
    ) {
        let area = RoomRect::new(0, 0, width, height);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let tree = partition(area, min_width, min_height, 16, &mut rng).expect("valid minimums");
        let leaves = tree.leaves();

        for (index, leaf) in leaves.iter().enumerate() {
            prop_assert!(leaf.width >= min_width && leaf.height >= min_height);
            for other in &leaves[index + 1..] {
                prop_assert!(!leaf.intersects(other), "{:?} overlaps {:?}", leaf, other);
            }
        }
        prop_assert_eq!(leaves.iter().map(|leaf| leaf.area()).sum::<usize>(), width * height);
    }

    #[test]
    fn bsp_levels_are_connected_from_spawn(
        seed in any::<u64>(),
        width in 10_usize..70,
        height in 10_usize..70,
    ) {
        let engine = BspRoomEngine::new(BspConfig { width, height, ..Default::default() })
            .expect("valid config");
        let level = engine.generate(&mut ChaCha8Rng::seed_from_u64(seed));

        let reachable = walkable_from(&level.grid, level.spawn);
        let walkable = level.grid.positions().filter(|&pos| level.grid.get(pos).is_walkable());
        for pos in walkable {
            prop_assert!(reachable.contains(&pos), "{:?} unreachable from spawn", pos);
        }
        prop_assert!(reachable.contains(&level.exit));
        prop_assert!(border_is_never_walkable(&level.grid, 1));
        prop_assert_eq!(walls_are_dressed(&level), Ok(()));
    }

    #[test]
    fn mining_only_touches_the_target_neighborhood(
        seed in any::<u64>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let engine = HuntAndKillEngine::new(HuntAndKillConfig::default()).expect("valid config");
        let mut level = engine.generate(&mut ChaCha8Rng::seed_from_u64(seed));
        let walls: Vec<Pos> = level
            .grid
            .positions()
            .filter(|&pos| is_interior(&level.grid, pos) && level.grid.get(pos).is_wall())
            .collect();
        prop_assume!(!walls.is_empty());
        let target = walls[pick.index(walls.len())];

        let before = level.grid.clone();
        let outcome = engine.mine_wall(&mut level.grid, target);
        let MiningOutcome::Mined { pos, new_walls } = outcome else {
            return Err(TestCaseError::fail("a wall target must be mined"));
        };
        prop_assert_eq!(pos, target);
        prop_assert_eq!(level.grid.get(target), TileKind::Floor);

        let neighborhood: BTreeSet<Pos> = before.neighbors8(target).collect();
        for cell in &new_walls {
            prop_assert!(neighborhood.contains(cell));
            prop_assert_eq!(before.get(*cell), TileKind::Empty);
            prop_assert!(level.grid.get(*cell).is_wall());
        }
        for cell in level.grid.positions() {
            if cell != target && before.get(cell) != level.grid.get(cell) {
                prop_assert!(neighborhood.contains(&cell), "{:?} changed outside", cell);
            }
        }
    }

    #[test]
    fn mining_never_opens_the_grid_edge(
        seed in any::<u64>(),
        targets in prop::collection::vec((-2_i32..32, -2_i32..32), 1..40),
    ) {
        let engine = HuntAndKillEngine::new(HuntAndKillConfig::default()).expect("valid config");
        let mut level = engine.generate(&mut ChaCha8Rng::seed_from_u64(seed));
        for (x, y) in targets {
            let outcome = engine.mine_wall(&mut level.grid, Pos::new(x, y));
            if let MiningOutcome::Mined { pos, .. } = outcome {
                prop_assert!(is_interior(&level.grid, pos), "mined edge cell {:?}", pos);
            }
        }
        prop_assert!(border_is_never_walkable(&level.grid, 1));
    }
}

#[test]
fn mining_a_floor_changes_nothing() {
    let engine = HuntAndKillEngine::new(HuntAndKillConfig::default()).expect("valid config");
    let mut level = engine.generate(&mut ChaCha8Rng::seed_from_u64(5));
    let before = level.grid.clone();
    let floor = level.exit;

    assert_eq!(engine.mine_wall(&mut level.grid, floor), MiningOutcome::NotAWall(TileKind::Floor));
    assert_eq!(level.grid, before);
}
