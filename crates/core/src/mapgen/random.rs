//! Injectable random source consumed by every generation engine.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

use crate::types::Direction;

pub trait RandomSource {
    /// Uniform integer in `[low, high)`. Requires `low < high`.
    fn range(&mut self, low: i32, high: i32) -> i32;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f64;

    fn direction(&mut self) -> Direction {
        Direction::from_index(self.range(0, 4))
    }
}

impl RandomSource for ChaCha8Rng {
    fn range(&mut self, low: i32, high: i32) -> i32 {
        debug_assert!(low < high);
        let span = (i64::from(high) - i64::from(low)) as u64;
        (i64::from(low) + (self.next_u64() % span) as i64) as i32
    }

    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
    }
}

/// Replays fixed integer and float sequences, cycling when exhausted.
///
/// Integer draws map a scripted value `v` into `[low, high)` as
/// `low + v.rem_euclid(high - low)`, so direction scripts can be written as
/// plain `0..4` indices.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    ints: Vec<i32>,
    units: Vec<f64>,
    next_int: usize,
    next_unit: usize,
}

impl ScriptedSource {
    pub fn new(ints: Vec<i32>, units: Vec<f64>) -> Self {
        assert!(!ints.is_empty() && !units.is_empty(), "scripted source needs values to replay");
        Self { ints, units, next_int: 0, next_unit: 0 }
    }

    /// A script drawing `directions` in order, re-rolling on every float check.
    pub fn directions(directions: &[Direction]) -> Self {
        let ints = directions.iter().map(|&direction| direction as i32).collect();
        Self::new(ints, vec![0.0])
    }
}

impl RandomSource for ScriptedSource {
    fn range(&mut self, low: i32, high: i32) -> i32 {
        let value = self.ints[self.next_int % self.ints.len()];
        self.next_int += 1;
        low + value.rem_euclid(high - low)
    }

    fn unit(&mut self) -> f64 {
        let value = self.units[self.next_unit % self.units.len()];
        self.next_unit += 1;
        value
    }
}
