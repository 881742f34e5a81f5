use serde::{Deserialize, Serialize};

/// Grid coordinate. `y + 1` is up, `y - 1` is the cell below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    Floor,
    Wall,
    BottomWall,
    Start,
}

impl TileKind {
    pub fn is_wall(self) -> bool {
        matches!(self, Self::Wall | Self::BottomWall)
    }

    pub fn is_walkable(self) -> bool {
        matches!(self, Self::Floor | Self::Start)
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Floor => '.',
            Self::Wall => '#',
            Self::BottomWall => '_',
            Self::Start => 'S',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Index order used when a direction is drawn uniformly from `0..4`.
    /// Matches the declaration order, so `direction as i32` is its index.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Right => (1, 0),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
        }
    }
}
