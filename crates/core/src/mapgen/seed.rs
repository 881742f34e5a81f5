//! Deterministic seed mixing for multi-level runs.

use super::config::Algorithm;

/// Folds the level index and algorithm into the run seed, one splitmix64
/// step per input, so every level of a run gets its own ChaCha stream.
pub fn derive_level_seed(run_seed: u64, level_index: u32, algorithm: Algorithm) -> u64 {
    [u64::from(level_index), algorithm_tag(algorithm)]
        .into_iter()
        .fold(splitmix64(run_seed), |state, input| splitmix64(state ^ input))
}

fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn algorithm_tag(algorithm: Algorithm) -> u64 {
    let tag: &[u8; 4] = match algorithm {
        Algorithm::DrunkardWalk => b"walk",
        Algorithm::HuntAndKill => b"hunt",
        Algorithm::Bsp => b"bsp\0",
    };
    u64::from(u32::from_le_bytes(*tag)) << 32
}
