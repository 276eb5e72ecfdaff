//! Hamming distance between equal-length bitstrings.

use crate::error::{CountsError, CountsResult};

/// Number of positions at which two equal-length bitstrings differ.
pub fn hamming_distance(left: &str, right: &str) -> CountsResult<u32> {
    if left.len() != right.len() {
        return Err(CountsError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(left
        .bytes()
        .zip(right.bytes())
        .filter(|(a, b)| a != b)
        .count() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hamming_distance() {
        assert_eq!(hamming_distance("0000", "0000").unwrap(), 0);
        assert_eq!(hamming_distance("0000", "1111").unwrap(), 4);
        assert_eq!(
            hamming_distance("1010101010101010", "0101010101010101").unwrap(),
            16
        );
        assert_eq!(hamming_distance("", "").unwrap(), 0);
    }

    #[test]
    fn test_hamming_distance_length_mismatch() {
        assert!(matches!(
            hamming_distance("010", "0101"),
            Err(CountsError::LengthMismatch { left: 3, right: 4 })
        ));
    }
}
