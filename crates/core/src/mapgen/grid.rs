//! Dense tile grid that every generation pass reads and writes through.

use std::fmt;

use serde::Serialize;

use crate::types::{Pos, TileKind};

const NEIGHBOR_OFFSETS: [(i32, i32); 8] =
    [(0, 1), (0, -1), (1, 0), (-1, 0), (-1, -1), (-1, 1), (1, 1), (1, -1)];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl Grid {
    /// Creates a `width` x `height` grid with every cell Empty.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, tiles: vec![TileKind::Empty; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Panics when `pos` is outside the grid.
    pub fn get(&self, pos: Pos) -> TileKind {
        self.tiles[self.index(pos)]
    }

    /// Panics when `pos` is outside the grid.
    pub fn set(&mut self, pos: Pos, tile: TileKind) {
        let index = self.index(pos);
        self.tiles[index] = tile;
    }

    pub fn count(&self, tile: TileKind) -> usize {
        self.tiles.iter().filter(|&&candidate| candidate == tile).count()
    }

    /// In-bounds 8-neighborhood of `pos`: the four cardinals, then the diagonals.
    pub fn neighbors8(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |&(dx, dy)| Pos { y: pos.y + dy, x: pos.x + dx })
            .filter(|&neighbor| self.in_bounds(neighbor))
    }

    /// Row-major positions: y ascending, then x ascending.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Pos { y, x }))
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.tiles.len());
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for tile in &self.tiles {
            bytes.push(match tile {
                TileKind::Empty => 0,
                TileKind::Floor => 1,
                TileKind::Wall => 2,
                TileKind::BottomWall => 3,
                TileKind::Start => 4,
            });
        }
        bytes
    }

    /// Text rendering with the top row (`y = height - 1`) first.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                out.push(self.tiles[y * self.width + x].glyph());
            }
            out.push('\n');
        }
        out
    }

    fn index(&self, pos: Pos) -> usize {
        assert!(
            self.in_bounds(pos),
            "grid access out of bounds: {pos:?} for {}x{} grid",
            self.width,
            self.height
        );
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_ascii())
    }
}

/// Farthest Floor cell from `origin` by straight-line distance, scanning x then y.
/// Ties keep the cell found first; returns `origin` when no other Floor exists.
pub(crate) fn farthest_floor_from(grid: &Grid, origin: Pos) -> Pos {
    let mut best = origin;
    let mut best_distance = 0_i64;
    for x in 0..grid.width() as i32 {
        for y in 0..grid.height() as i32 {
            let pos = Pos { y, x };
            if grid.get(pos) != TileKind::Floor {
                continue;
            }
            let distance = origin.distance_squared(pos);
            if distance > best_distance {
                best = pos;
                best_distance = distance;
            }
        }
    }
    best
}
