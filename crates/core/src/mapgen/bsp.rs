//! Binary space partitioning into rooms, joined by a nearest-neighbor corridor chain.

use std::collections::{BTreeSet, VecDeque};

use log::{debug, trace};
use serde::Serialize;

use super::config::{Algorithm, BspConfig, ConfigError};
use super::grid::Grid;
use super::model::{GeneratedLevel, GenerationReport};
use super::random::RandomSource;
use super::walls;
use crate::types::{Pos, TileKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RoomRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl RoomRect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    fn right(self) -> usize {
        self.x + self.width - 1
    }

    fn top(self) -> usize {
        self.y + self.height - 1
    }

    pub fn area(self) -> usize {
        self.width * self.height
    }

    /// Centroid rounded half-down.
    pub fn center(self) -> Pos {
        Pos { y: (self.y + (self.height / 2)) as i32, x: (self.x + (self.width / 2)) as i32 }
    }

    /// Shrinks the rectangle by `margin` on every side; `None` when nothing is left.
    pub fn inset(self, margin: usize) -> Option<Self> {
        if self.width <= margin * 2 || self.height <= margin * 2 {
            return None;
        }
        Some(Self {
            x: self.x + margin,
            y: self.y + margin,
            width: self.width - margin * 2,
            height: self.height - margin * 2,
        })
    }

    pub fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.top()
            && self.top() >= other.y
    }

    pub fn contains(self, pos: Pos) -> bool {
        if pos.x < 0 || pos.y < 0 {
            return false;
        }
        let px = pos.x as usize;
        let py = pos.y as usize;
        px >= self.x && px <= self.right() && py >= self.y && py <= self.top()
    }

    fn split(self, axis: SplitAxis, offset: usize) -> (Self, Self) {
        match axis {
            SplitAxis::X => (
                Self { width: offset, ..self },
                Self { x: self.x + offset, width: self.width - offset, ..self },
            ),
            SplitAxis::Y => (
                Self { height: offset, ..self },
                Self { y: self.y + offset, height: self.height - offset, ..self },
            ),
        }
    }
}

/// Which coordinate a cut is made along: `X` yields a left and a right child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitAxis {
    X,
    Y,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartitionNode {
    Leaf(RoomRect),
    Split { rect: RoomRect, axis: SplitAxis, offset: usize, children: [usize; 2] },
}

impl PartitionNode {
    pub fn rect(&self) -> RoomRect {
        match self {
            Self::Leaf(rect) | Self::Split { rect, .. } => *rect,
        }
    }
}

/// Index arena for the partition tree. Node 0 is the root; nodes are stored
/// in breadth-first creation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    pub fn root(&self) -> &PartitionNode {
        &self.nodes[0]
    }

    /// Leaf rectangles in traversal order. The first is the spawn room and the
    /// last the exit room, so this order must not change for a given seed.
    pub fn leaves(&self) -> Vec<RoomRect> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                PartitionNode::Leaf(rect) => Some(*rect),
                PartitionNode::Split { .. } => None,
            })
            .collect()
    }

    pub fn split_count(&self) -> usize {
        self.nodes.len() / 2
    }
}

/// Splits `area` until no leaf can be cut without breaking the
/// `min_width` x `min_height` minimum, or `max_depth` is reached.
pub fn partition(
    area: RoomRect,
    min_width: usize,
    min_height: usize,
    max_depth: usize,
    rng: &mut impl RandomSource,
) -> Result<PartitionTree, ConfigError> {
    if min_width == 0 || min_height == 0 {
        return Err(ConfigError::ZeroRoomSize { min_width, min_height });
    }
    if area.width < min_width || area.height < min_height {
        return Err(ConfigError::RoomLargerThanArea {
            min_width,
            min_height,
            width: area.width,
            height: area.height,
        });
    }
    Ok(build_tree(area, min_width, min_height, max_depth, rng))
}

fn build_tree(
    area: RoomRect,
    min_width: usize,
    min_height: usize,
    max_depth: usize,
    rng: &mut impl RandomSource,
) -> PartitionTree {
    let mut nodes = vec![PartitionNode::Leaf(area)];
    let mut queue = VecDeque::from([(0_usize, 0_usize)]);

    while let Some((index, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let rect = nodes[index].rect();
        let Some(axis) = choose_axis(rect, min_width, min_height, rng) else {
            continue;
        };
        let (extent, minimum) = match axis {
            SplitAxis::X => (rect.width, min_width),
            SplitAxis::Y => (rect.height, min_height),
        };
        let offset = rng.range(minimum as i32, (extent - minimum) as i32 + 1) as usize;
        let (first, second) = rect.split(axis, offset);
        trace!(target: "dungen::bsp", "split {rect:?} on {axis:?} at {offset}");

        let first_index = nodes.len();
        nodes.push(PartitionNode::Leaf(first));
        nodes.push(PartitionNode::Leaf(second));
        nodes[index] =
            PartitionNode::Split { rect, axis, offset, children: [first_index, first_index + 1] };
        queue.push_back((first_index, depth + 1));
        queue.push_back((first_index + 1, depth + 1));
    }

    PartitionTree { nodes }
}

/// Cuts across the longer side; near-square rectangles pick an axis at random.
fn choose_axis(
    rect: RoomRect,
    min_width: usize,
    min_height: usize,
    rng: &mut impl RandomSource,
) -> Option<SplitAxis> {
    let can_cut_x = rect.width >= min_width * 2;
    let can_cut_y = rect.height >= min_height * 2;
    match (can_cut_x, can_cut_y) {
        (false, false) => None,
        (true, false) => Some(SplitAxis::X),
        (false, true) => Some(SplitAxis::Y),
        (true, true) if rect.width * 4 > rect.height * 5 => Some(SplitAxis::X),
        (true, true) if rect.height * 4 > rect.width * 5 => Some(SplitAxis::Y),
        (true, true) => Some(if rng.unit() < 0.5 { SplitAxis::X } else { SplitAxis::Y }),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorridorChain {
    /// Room centers in the order the chain reached them.
    pub visit_order: Vec<Pos>,
    /// Carved cells, de-duplicated, in carving order.
    pub corridors: Vec<Pos>,
}

/// Greedy nearest-neighbor chain over `centers`.
///
/// Starts at a random center and repeatedly walks to the closest center not
/// yet reached, carving an L-shaped corridor (vertical leg first). The result
/// is a path through every room rather than a spanning tree, so each room
/// touches at most two chain corridors.
pub fn connect_rooms(centers: &[Pos], rng: &mut impl RandomSource) -> CorridorChain {
    if centers.is_empty() {
        return CorridorChain::default();
    }

    let mut remaining = centers.to_vec();
    let mut current = remaining.remove(rng.range(0, remaining.len() as i32) as usize);
    let mut chain = CorridorChain { visit_order: vec![current], corridors: Vec::new() };
    let mut carved = BTreeSet::new();

    while let Some((closest_index, _)) = remaining
        .iter()
        .enumerate()
        .min_by_key(|(_, center)| current.distance_squared(**center))
    {
        let destination = remaining.remove(closest_index);
        for cell in l_shaped_path(current, destination) {
            if carved.insert(cell) {
                chain.corridors.push(cell);
            }
        }
        chain.visit_order.push(destination);
        current = destination;
    }
    chain
}

/// Unit-width path from `start` to `end`: vertical to the destination row, then horizontal.
fn l_shaped_path(start: Pos, end: Pos) -> Vec<Pos> {
    let mut path = vec![start];
    let mut pos = start;
    while pos.y != end.y {
        pos.y += (end.y - pos.y).signum();
        path.push(pos);
    }
    while pos.x != end.x {
        pos.x += (end.x - pos.x).signum();
        path.push(pos);
    }
    path
}

fn carve_room(grid: &mut Grid, room: RoomRect) {
    for y in room.y..=room.top() {
        for x in room.x..=room.right() {
            grid.set(Pos { y: y as i32, x: x as i32 }, TileKind::Floor);
        }
    }
}

#[derive(Clone, Debug)]
pub struct BspRoomEngine {
    config: BspConfig,
}

impl BspRoomEngine {
    pub fn new(config: BspConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BspConfig {
        &self.config
    }

    pub fn generate(&self, rng: &mut impl RandomSource) -> GeneratedLevel {
        let config = &self.config;
        let area = RoomRect::new(0, 0, config.width, config.height);
        let tree = build_tree(
            area,
            config.min_room_width,
            config.min_room_height,
            config.max_depth,
            rng,
        );
        let rooms = tree.leaves();

        let mut grid = Grid::new(config.width, config.height);
        for room in rooms.iter().filter_map(|room| room.inset(config.room_inset)) {
            carve_room(&mut grid, room);
        }

        let room_centers: Vec<Pos> = rooms.iter().map(|room| room.center()).collect();
        let chain = connect_rooms(&room_centers, rng);
        for &cell in &chain.corridors {
            grid.set(cell, TileKind::Floor);
        }
        walls::dress(&mut grid);

        let spawn = room_centers.first().copied().unwrap_or(area.center());
        let exit = room_centers.last().copied().unwrap_or(spawn);
        grid.set(spawn, TileKind::Start);

        let report = GenerationReport {
            iterations: tree.split_count(),
            floor_count: grid.count(TileKind::Floor) + grid.count(TileKind::Start),
            fill_reached: true,
            hunts: 0,
        };
        debug!(
            target: "dungen::bsp",
            "{} rooms, {} corridor cells, spawn {spawn:?}, exit {exit:?}",
            rooms.len(),
            chain.corridors.len()
        );

        GeneratedLevel {
            algorithm: Algorithm::Bsp,
            grid,
            spawn,
            exit,
            rooms,
            room_centers,
            corridors: chain.corridors,
            report,
        }
    }
}
