//! Pairwise ensemble-averaged overlap contributions.

use skuld_counts::hamming_distance;

use crate::error::EntropyResult;

/// Weighted overlap contribution of two projected outcomes.
///
/// ```text
/// 2^a_num · (-2)^(-d) · (s_i_meas / shots) · (s_j_meas / shots)
/// ```
///
/// with `d` the Hamming distance between `s_i` and `s_j`. The sum over all
/// pairs is an alternating series; the factor order above is kept verbatim
/// so every backend accumulates with the same rounding.
pub fn ensemble_cell(
    s_i: &str,
    s_i_meas: u64,
    s_j: &str,
    s_j_meas: u64,
    a_num: u32,
    shots: u64,
) -> EntropyResult<f64> {
    let diff = hamming_distance(s_i, s_j)?;
    Ok(pair_weight(a_num, diff) * (s_i_meas as f64 / shots as f64) * (s_j_meas as f64 / shots as f64))
}

/// `2^a_num · (-2)^(-d)`: exact in `f64` for the register widths this crate
/// accepts, which is what lets the vectorized backend reproduce the
/// reference backend bit for bit.
pub(crate) fn pair_weight(a_num: u32, diff: u32) -> f64 {
    f64::powi(2.0, a_num as i32) * f64::powi(-2.0, -(diff as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensemble_cell_identical_strings() {
        // d = 0: weight collapses to 2^a.
        let value = ensemble_cell("0000", 512, "0000", 512, 4, 1024).unwrap();
        assert!((value - 16.0 * 0.5 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ensemble_cell_sign_alternates_with_distance() {
        let d1 = ensemble_cell("0001", 100, "0000", 100, 4, 1000).unwrap();
        let d2 = ensemble_cell("0011", 100, "0000", 100, 4, 1000).unwrap();
        assert!(d1 < 0.0);
        assert!(d2 > 0.0);
        assert!((d1.abs() / d2.abs() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_ensemble_cell_fully_opposed() {
        // Maximal distance over 16 bits: every position differs.
        let value =
            ensemble_cell("1010101010101010", 100, "0101010101010101", 100, 12, 100).unwrap();
        let expected = f64::powi(2.0, 12) * f64::powi(-2.0, -16);
        assert!((value - expected).abs() < 1e-10);
    }

    #[test]
    fn test_ensemble_cell_length_mismatch() {
        assert!(ensemble_cell("010", 1, "0101", 1, 3, 2).is_err());
    }

    #[test]
    fn test_pair_weight_exact_powers() {
        assert_eq!(pair_weight(6, 0), 64.0);
        assert_eq!(pair_weight(6, 1), -32.0);
        assert_eq!(pair_weight(6, 6), 1.0);
        assert_eq!(pair_weight(0, 2), 0.25);
    }
}
