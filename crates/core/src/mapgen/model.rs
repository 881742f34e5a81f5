//! Public data models handed to the spawn/render collaborator.

use serde::Serialize;

use super::bsp::RoomRect;
use super::config::Algorithm;
use super::grid::Grid;
use crate::types::Pos;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Walk iterations or partition splits performed.
    pub iterations: usize,
    pub floor_count: usize,
    /// False when a walk stopped on its iteration cap (or ran out of cells)
    /// before reaching the fill ratio. Always true for BSP.
    pub fill_reached: bool,
    /// Hunt-phase relocations (Hunt-and-Kill only).
    pub hunts: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratedLevel {
    pub algorithm: Algorithm,
    pub grid: Grid,
    pub spawn: Pos,
    pub exit: Pos,
    /// BSP leaf rectangles in partition traversal order.
    pub rooms: Vec<RoomRect>,
    /// First entry is the spawn anchor, last is the exit anchor.
    pub room_centers: Vec<Pos>,
    /// Corridor cells in the order their connections were carved.
    pub corridors: Vec<Pos>,
    pub report: GenerationReport,
}

impl GeneratedLevel {
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = self.grid.canonical_bytes();
        for pos in [self.spawn, self.exit] {
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
        }
        bytes.extend((self.room_centers.len() as u32).to_le_bytes());
        for center in &self.room_centers {
            bytes.extend(center.y.to_le_bytes());
            bytes.extend(center.x.to_le_bytes());
        }
        bytes.extend((self.corridors.len() as u32).to_le_bytes());
        for cell in &self.corridors {
            bytes.extend(cell.y.to_le_bytes());
            bytes.extend(cell.x.to_le_bytes());
        }
        bytes
    }
}
