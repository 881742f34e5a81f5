//! Wall dressing shared by every engine: walls around floor, then bottom-wall refinement.

use log::trace;

use super::grid::Grid;
use crate::types::{Pos, TileKind};

/// Runs [`dress_walls`] followed by [`classify_bottom_walls`].
pub fn dress(grid: &mut Grid) {
    dress_walls(grid);
    classify_bottom_walls(grid);
}

/// Turns every Empty 8-neighbor of a Floor cell into Wall.
///
/// Single in-place scan, x ascending then y ascending. Cells written earlier in
/// the scan are read back as Wall by later cells, so the order is part of the
/// defined output.
pub fn dress_walls(grid: &mut Grid) -> usize {
    let mut placed = 0;
    for x in 0..grid.width() as i32 {
        for y in 0..grid.height() as i32 {
            let pos = Pos { y, x };
            if grid.get(pos) != TileKind::Floor {
                continue;
            }
            placed += wall_in_empty_neighbors(grid, pos).len();
        }
    }
    trace!(target: "dungen::walls", "placed {placed} walls");
    placed
}

/// Reclassifies every Wall with Floor directly below it (`y - 1`) as BottomWall.
pub fn classify_bottom_walls(grid: &mut Grid) -> usize {
    let mut reclassified = 0;
    for x in 0..grid.width() as i32 {
        for y in 1..grid.height() as i32 {
            let pos = Pos { y, x };
            if grid.get(pos) == TileKind::Wall && grid.get(Pos { y: y - 1, x }) == TileKind::Floor
            {
                grid.set(pos, TileKind::BottomWall);
                reclassified += 1;
            }
        }
    }
    reclassified
}

/// Walls every Empty in-bounds 8-neighbor of `pos`; returns the cells changed.
pub(crate) fn wall_in_empty_neighbors(grid: &mut Grid, pos: Pos) -> Vec<Pos> {
    let empty: Vec<Pos> =
        grid.neighbors8(pos).filter(|&neighbor| grid.get(neighbor) == TileKind::Empty).collect();
    for &neighbor in &empty {
        grid.set(neighbor, TileKind::Wall);
    }
    empty
}
