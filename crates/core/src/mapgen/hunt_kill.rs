//! Hunt-and-Kill maze carving and the runtime wall-mining entrypoint.
//!
//! The kill phase is a random walk that only steps onto Empty cells. A draw
//! picks one of four directions and tests only that candidate, so the walker
//! may idle for a few iterations before it draws a usable direction. When no
//! cardinal neighbor is Empty the walker is stuck and the hunt phase scans the
//! carve area column by column (x outer, y inner) for a new origin.
//!
//! With [`HuntMode::FirstEmpty`] the hunt takes the first Empty cell without
//! checking that it touches the carved region, so a run can end with several
//! disconnected regions. [`HuntMode::AdjacentToCarved`] restricts the hunt to
//! cells next to existing floor and carves the relocated cell as the link.

use log::{debug, trace};

use super::config::{Algorithm, ConfigError, HuntAndKillConfig, HuntMode};
use super::grid::Grid;
use super::model::{GeneratedLevel, GenerationReport};
use super::random::RandomSource;
use super::walk::{CarveArea, carve_floor, fill_reached, finish_walk_level};
use super::walls;
use crate::types::{Direction, Pos, TileKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MiningOutcome {
    /// `pos` became Floor; `new_walls` were Empty neighbors that are now walls.
    Mined { pos: Pos, new_walls: Vec<Pos> },
    /// The target was not a wall, nothing changed.
    NotAWall(TileKind),
}

#[derive(Clone, Debug)]
pub struct HuntAndKillEngine {
    config: HuntAndKillConfig,
}

impl HuntAndKillEngine {
    pub fn new(config: HuntAndKillConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HuntAndKillConfig {
        &self.config
    }

    pub fn generate(&self, rng: &mut impl RandomSource) -> GeneratedLevel {
        let mut grid = Grid::new(self.config.width, self.config.height);
        let (spawn, report) = self.carve(&mut grid, rng);
        finish_walk_level(Algorithm::HuntAndKill, grid, spawn, report)
    }

    /// Runs the maze carve on `grid` without dressing walls. Returns the first
    /// carve origin and the run report.
    pub fn carve(&self, grid: &mut Grid, rng: &mut impl RandomSource) -> (Pos, GenerationReport) {
        let config = &self.config;
        let area = CarveArea::new(grid.width(), grid.height(), config.border_margin);
        let origin = Pos {
            x: rng.range(area.min().x, area.max().x + 1),
            y: rng.range(area.min().y, area.max().y + 1),
        };
        grid.set(origin, TileKind::Start);

        let mut pos = origin;
        let mut report =
            GenerationReport { floor_count: grid.count(TileKind::Floor), ..Default::default() };
        while report.iterations < config.max_iterations {
            if carve_floor(grid, pos) {
                report.floor_count += 1;
            }

            let mut exhausted = false;
            if is_stuck(grid, area, pos) {
                match hunt(grid, area, config.hunt_mode) {
                    Some(next) => {
                        trace!(
                            target: "dungen::hunt_kill",
                            "iteration={} stuck at {pos:?}, hunted {next:?}",
                            report.iterations
                        );
                        if config.hunt_mode == HuntMode::AdjacentToCarved
                            && carve_floor(grid, next)
                        {
                            report.floor_count += 1;
                        }
                        report.hunts += 1;
                        pos = next;
                    }
                    None => exhausted = true,
                }
            } else {
                let candidate = pos.step(rng.direction());
                if area.contains(candidate) && grid.get(candidate) == TileKind::Empty {
                    pos = candidate;
                }
            }

            report.iterations += 1;
            if fill_reached(report.floor_count, grid, config.fill_ratio) {
                report.fill_reached = true;
                break;
            }
            if exhausted {
                debug!(target: "dungen::hunt_kill", "hunt found no cell to carve, stopping");
                break;
            }
        }

        debug!(
            target: "dungen::hunt_kill",
            "carve finished after {} iterations and {} hunts with {} floor cells",
            report.iterations,
            report.hunts,
            report.floor_count
        );
        (origin, report)
    }

    /// Mines the wall at `pos` into floor and re-dresses its surroundings.
    ///
    /// `pos` is first clamped one cell inside the grid edge, so the outermost
    /// rows and columns are never opened. Only Wall and BottomWall targets
    /// change; any other tile is left alone and reported back. Empty cells
    /// around the new floor become walls, then the bottom-wall classification
    /// is swept over the whole grid. The exclusive borrow keeps each call
    /// atomic with respect to other grid writers.
    ///
    /// Panics when the grid is narrower or shorter than three cells.
    pub fn mine_wall(&self, grid: &mut Grid, pos: Pos) -> MiningOutcome {
        let pos = CarveArea::new(grid.width(), grid.height(), 1).clamp(pos);
        let tile = grid.get(pos);
        if !tile.is_wall() {
            return MiningOutcome::NotAWall(tile);
        }

        grid.set(pos, TileKind::Floor);
        let new_walls = walls::wall_in_empty_neighbors(grid, pos);
        walls::classify_bottom_walls(grid);
        debug!(
            target: "dungen::hunt_kill",
            "mined {pos:?}, {} new walls",
            new_walls.len()
        );
        MiningOutcome::Mined { pos, new_walls }
    }
}

/// True when no cardinal neighbor is an Empty cell inside the carve area.
fn is_stuck(grid: &Grid, area: CarveArea, pos: Pos) -> bool {
    Direction::ALL.iter().all(|&direction| {
        let neighbor = pos.step(direction);
        !area.contains(neighbor) || grid.get(neighbor) != TileKind::Empty
    })
}

/// Next carve origin: the first qualifying Empty cell of the carve area,
/// scanning x ascending then y ascending like the wall-dressing pass.
fn hunt(grid: &Grid, area: CarveArea, mode: HuntMode) -> Option<Pos> {
    let (min, max) = (area.min(), area.max());
    let mut cells = (min.x..=max.x).flat_map(|x| (min.y..=max.y).map(move |y| Pos { y, x }));
    cells.find(|&pos| {
        grid.get(pos) == TileKind::Empty
            && match mode {
                HuntMode::FirstEmpty => true,
                HuntMode::AdjacentToCarved => Direction::ALL.iter().any(|&direction| {
                    let neighbor = pos.step(direction);
                    grid.in_bounds(neighbor) && grid.get(neighbor).is_walkable()
                }),
            }
    })
}
