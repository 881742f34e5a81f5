//! Pieces shared by the walker-based engines.

use super::config::Algorithm;
use super::grid::{Grid, farthest_floor_from};
use super::model::{GeneratedLevel, GenerationReport};
use super::walls;
use crate::types::{Direction, Pos, TileKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Walker {
    pub(super) pos: Pos,
    pub(super) dir: Direction,
}

/// Inclusive rectangle a walker may carve: the grid minus its border margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct CarveArea {
    min: Pos,
    max: Pos,
}

impl CarveArea {
    pub(super) fn new(width: usize, height: usize, margin: usize) -> Self {
        let margin = margin as i32;
        Self {
            min: Pos { y: margin, x: margin },
            max: Pos { y: height as i32 - 1 - margin, x: width as i32 - 1 - margin },
        }
    }

    pub(super) fn contains(self, pos: Pos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x) && (self.min.y..=self.max.y).contains(&pos.y)
    }

    pub(super) fn clamp(self, pos: Pos) -> Pos {
        Pos { y: pos.y.clamp(self.min.y, self.max.y), x: pos.x.clamp(self.min.x, self.max.x) }
    }

    pub(super) fn min(self) -> Pos {
        self.min
    }

    pub(super) fn max(self) -> Pos {
        self.max
    }
}

/// Marks `pos` Floor, returning whether it was not Floor before.
pub(super) fn carve_floor(grid: &mut Grid, pos: Pos) -> bool {
    if grid.get(pos) == TileKind::Floor {
        return false;
    }
    grid.set(pos, TileKind::Floor);
    true
}

pub(super) fn fill_reached(floor_count: usize, grid: &Grid, fill_ratio: f64) -> bool {
    floor_count as f64 / (grid.width() * grid.height()) as f64 >= fill_ratio
}

/// Dresses walls, places the exit on the farthest Floor, and marks the spawn Start.
pub(super) fn finish_walk_level(
    algorithm: Algorithm,
    mut grid: Grid,
    spawn: Pos,
    report: GenerationReport,
) -> GeneratedLevel {
    walls::dress(&mut grid);
    let exit = farthest_floor_from(&grid, spawn);
    grid.set(spawn, TileKind::Start);
    GeneratedLevel {
        algorithm,
        grid,
        spawn,
        exit,
        rooms: Vec::new(),
        room_centers: Vec::new(),
        corridors: Vec::new(),
        report,
    }
}
