//! Purity-cell computation over one repetition's counts.

use tracing::warn;

use skuld_counts::{BitstringRange, Counts, project_counts};

use crate::ensemble::{ensemble_cell, pair_weight};
use crate::error::EntropyResult;

/// Widest subsystem the bit-packed backend can hold in one machine word.
const PACKED_WIDTH_LIMIT: u32 = 64;

/// Strategy interface for one repetition's purity cell.
///
/// Implementations must agree numerically: the cell is the sum of
/// [`ensemble_cell`] over all ordered pairs of projected outcomes,
/// accumulated in sorted key order.
pub trait PurityCellComputer {
    /// Compute the purity cell for repetition `idx`.
    fn purity_cell(
        &self,
        idx: usize,
        single_counts: &Counts,
        range: BitstringRange,
        subsystem_size: u32,
    ) -> EntropyResult<(usize, f64)>;
}

/// Double-loop oracle over projected entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceCell;

impl PurityCellComputer for ReferenceCell {
    fn purity_cell(
        &self,
        idx: usize,
        single_counts: &Counts,
        range: BitstringRange,
        subsystem_size: u32,
    ) -> EntropyResult<(usize, f64)> {
        let shots = single_counts.total();
        let projected = project_counts(single_counts, range)?;

        let mut cell = 0.0_f64;
        for (s_ai, s_ai_meas) in projected.entries() {
            for (s_aj, s_aj_meas) in projected.entries() {
                cell += ensemble_cell(s_ai, *s_ai_meas, s_aj, *s_aj_meas, subsystem_size, shots)?;
            }
        }
        Ok((idx, cell))
    }
}

/// Bit-packed evaluation with a precomputed pair-weight table.
///
/// Keys are packed into `u64` words so the Hamming distance becomes
/// `xor` + `count_ones`, and the `2^a · (-2)^(-d)` factors are looked up
/// from a table. Both factors are exact powers of two and pairs accumulate
/// in the same sorted order, so the result matches [`ReferenceCell`] bit
/// for bit. Subsystems wider than one machine word fall back to the
/// reference loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorizedCell;

impl PurityCellComputer for VectorizedCell {
    fn purity_cell(
        &self,
        idx: usize,
        single_counts: &Counts,
        range: BitstringRange,
        subsystem_size: u32,
    ) -> EntropyResult<(usize, f64)> {
        if subsystem_size > PACKED_WIDTH_LIMIT {
            warn!(
                subsystem_size,
                limit = PACKED_WIDTH_LIMIT,
                "subsystem too wide for bit packing, falling back to the reference backend"
            );
            return ReferenceCell.purity_cell(idx, single_counts, range, subsystem_size);
        }

        let shots = single_counts.total();
        let projected = project_counts(single_counts, range)?;

        let packed: Vec<u64> = projected
            .entries()
            .iter()
            .map(|(key, _)| pack_bitstring(key))
            .collect();
        let probs: Vec<f64> = projected
            .entries()
            .iter()
            .map(|(_, meas)| *meas as f64 / shots as f64)
            .collect();
        let weights: Vec<f64> = (0..=subsystem_size)
            .map(|d| pair_weight(subsystem_size, d))
            .collect();

        let mut cell = 0.0_f64;
        for (i, &x_i) in packed.iter().enumerate() {
            for (j, &x_j) in packed.iter().enumerate() {
                let d = (x_i ^ x_j).count_ones() as usize;
                cell += weights[d] * probs[i] * probs[j];
            }
        }
        Ok((idx, cell))
    }
}

/// Pack a bitstring key into a machine word, most significant bit first.
fn pack_bitstring(key: &str) -> u64 {
    debug_assert!(key.len() <= PACKED_WIDTH_LIMIT as usize);
    key.bytes().fold(0u64, |acc, b| {
        debug_assert!(b == b'0' || b == b'1');
        (acc << 1) | u64::from(b == b'1')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skuld_counts::make_dummy_counts;

    #[test]
    fn test_pack_bitstring() {
        assert_eq!(pack_bitstring("0000"), 0);
        assert_eq!(pack_bitstring("1011"), 0b1011);
        assert_eq!(pack_bitstring(""), 0);
    }

    #[test]
    fn test_reference_cell_single_outcome() {
        // A fully determined repetition: one projected outcome with p = 1,
        // so the cell is exactly 2^subsystem_size.
        let counts: Counts = [("00000000", 4096u64)].into_iter().collect();
        let (idx, cell) = ReferenceCell
            .purity_cell(3, &counts, BitstringRange(2, 8), 6)
            .unwrap();
        assert_eq!(idx, 3);
        assert_eq!(cell, 64.0);
    }

    #[test]
    fn test_reference_cell_two_outcomes() {
        // {00: 1/2, 11: 1/2} over 2 bits: diagonal pairs contribute
        // 4 · 1 · 1/4 each, cross pairs 4 · 1/4 · 1/4 each.
        let counts: Counts = [("00", 512u64), ("11", 512)].into_iter().collect();
        let (_, cell) = ReferenceCell
            .purity_cell(0, &counts, BitstringRange(0, 2), 2)
            .unwrap();
        assert!((cell - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_vectorized_matches_reference() {
        let counts = make_dummy_counts(8, 48, 64, 11).unwrap();
        for range in [
            BitstringRange(2, 8),
            BitstringRange(0, 8),
            BitstringRange(-2, 5),
            BitstringRange(3, 6),
        ] {
            let size = range.width() as u32;
            let (_, reference) = ReferenceCell.purity_cell(0, &counts, range, size).unwrap();
            let (_, vectorized) = VectorizedCell.purity_cell(0, &counts, range, size).unwrap();
            assert!(
                (reference - vectorized).abs() < 1e-10,
                "range {range}: {reference} vs {vectorized}"
            );
        }
    }

    #[test]
    fn test_vectorized_cell_deterministic() {
        let counts = make_dummy_counts(8, 32, 128, 5).unwrap();
        let (_, first) = VectorizedCell
            .purity_cell(0, &counts, BitstringRange(2, 8), 6)
            .unwrap();
        let (_, second) = VectorizedCell
            .purity_cell(0, &counts, BitstringRange(2, 8), 6)
            .unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
