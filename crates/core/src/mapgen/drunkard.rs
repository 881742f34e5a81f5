//! Drunkard's Walk: several walkers carve floor while drifting with direction persistence.

use log::{debug, trace};

use super::config::{Algorithm, ConfigError, DrunkardWalkConfig};
use super::grid::Grid;
use super::model::{GeneratedLevel, GenerationReport};
use super::random::RandomSource;
use super::walk::{CarveArea, Walker, carve_floor, fill_reached, finish_walk_level};
use crate::types::{Pos, TileKind};

#[derive(Clone, Debug)]
pub struct DrunkardWalkEngine {
    config: DrunkardWalkConfig,
}

impl DrunkardWalkEngine {
    pub fn new(config: DrunkardWalkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DrunkardWalkConfig {
        &self.config
    }

    pub fn generate(&self, rng: &mut impl RandomSource) -> GeneratedLevel {
        let mut grid = Grid::new(self.config.width, self.config.height);
        let (spawn, report) = self.carve(&mut grid, rng);
        finish_walk_level(Algorithm::DrunkardWalk, grid, spawn, report)
    }

    /// Runs the walk on `grid` without dressing walls. Returns the walkers'
    /// shared origin and the run report.
    ///
    /// Every iteration marks each walker's cell Floor, lets each walker re-roll
    /// its direction with `direction_change_probability`, steps every walker,
    /// and clamps it back inside the border margin. The walk ends once the
    /// Floor ratio reaches `fill_ratio` or after `max_iterations`.
    pub fn carve(&self, grid: &mut Grid, rng: &mut impl RandomSource) -> (Pos, GenerationReport) {
        let config = &self.config;
        let area = CarveArea::new(grid.width(), grid.height(), config.border_margin);
        let center = Pos { y: (grid.height() / 2) as i32, x: (grid.width() / 2) as i32 };
        let origin = area.clamp(center);
        grid.set(origin, TileKind::Start);

        let mut walkers: Vec<Walker> = (0..config.walker_count)
            .map(|_| Walker { pos: origin, dir: rng.direction() })
            .collect();

        let mut report =
            GenerationReport { floor_count: grid.count(TileKind::Floor), ..Default::default() };
        while report.iterations < config.max_iterations {
            for walker in &walkers {
                if carve_floor(grid, walker.pos) {
                    report.floor_count += 1;
                }
            }

            for (index, walker) in walkers.iter_mut().enumerate() {
                if rng.unit() < config.direction_change_probability {
                    walker.dir = rng.direction();
                    trace!(
                        target: "dungen::drunkard",
                        "iteration={} walker={index} turned {:?} at {:?}",
                        report.iterations,
                        walker.dir,
                        walker.pos
                    );
                }
            }

            for walker in &mut walkers {
                walker.pos = area.clamp(walker.pos.step(walker.dir));
            }

            report.iterations += 1;
            if fill_reached(report.floor_count, grid, config.fill_ratio) {
                report.fill_reached = true;
                break;
            }
        }

        debug!(
            target: "dungen::drunkard",
            "walk finished after {} iterations with {} floor cells (target reached: {})",
            report.iterations,
            report.floor_count,
            report.fill_reached
        );
        (origin, report)
    }
}
