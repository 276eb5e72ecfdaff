//! Deterministic dummy counts for tests and benchmarks.
//!
//! Fixture generators: distinct bitstrings of a given width, and counts maps
//! weighting each of them uniformly. Everything is seeded, so a fixture is
//! reproducible across runs and across the numeric backends under test.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;

use crate::counts::Counts;
use crate::error::{CountsError, CountsResult};

/// Widest register the generators accept.
pub const MAX_DUMMY_BITS: u32 = 32;

/// Generate `num` distinct bitstrings of `bit_len` bits.
///
/// Dense requests (half the key space or more) enumerate and shuffle;
/// sparse requests sample with rejection. Both paths are deterministic for
/// a fixed seed.
pub fn make_bit_strings(bit_len: u32, num: usize, seed: u64) -> CountsResult<Vec<String>> {
    if bit_len > MAX_DUMMY_BITS {
        return Err(CountsError::BitLengthTooLarge {
            bit_len,
            max: MAX_DUMMY_BITS,
        });
    }
    let capacity = 1u64 << bit_len;
    if num as u64 > capacity {
        return Err(CountsError::TooManyBitstrings {
            requested: num,
            bit_len,
            capacity: capacity as usize,
        });
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let width = bit_len as usize;
    let values: Vec<u64> = if (num as u64).saturating_mul(2) >= capacity {
        let mut all: Vec<u64> = (0..capacity).collect();
        all.shuffle(&mut rng);
        all.truncate(num);
        all
    } else {
        let mut seen = FxHashSet::default();
        let mut picked = Vec::with_capacity(num);
        while picked.len() < num {
            let value = rng.gen_range(0..capacity);
            if seen.insert(value) {
                picked.push(value);
            }
        }
        picked
    };

    Ok(values
        .into_iter()
        .map(|value| format!("{value:0width$b}"))
        .collect())
}

/// Build a counts map over `num` distinct bitstrings, each observed
/// `shots_per_case` times.
pub fn make_dummy_counts(
    bit_len: u32,
    num: usize,
    shots_per_case: u64,
    seed: u64,
) -> CountsResult<Counts> {
    let strings = make_bit_strings(bit_len, num, seed)?;
    Ok(strings
        .into_iter()
        .map(|bitstring| (bitstring, shots_per_case))
        .collect())
}
