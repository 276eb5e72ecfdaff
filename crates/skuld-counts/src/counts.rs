//! Bitstring outcome frequencies of a measured circuit repetition.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{CountsError, CountsResult};

/// Outcome frequencies of one repetition of a measured circuit.
///
/// Keys are fixed-length bitstrings over `{0, 1}`; values count how many of
/// the repetition's shots produced that outcome. The engine treats counts as
/// read-only input: every transformation produces a new container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts(FxHashMap<String, u64>);

impl Counts {
    /// Create an empty counts map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `freq` shots to an outcome, accumulating over existing entries.
    pub fn add(&mut self, bitstring: impl Into<String>, freq: u64) {
        *self.0.entry(bitstring.into()).or_insert(0) += freq;
    }

    /// Frequency recorded for an outcome, zero if absent.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no outcome was observed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of shots across all outcomes.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Width of the measured register.
    ///
    /// All keys must share one length; a mixed-width map is corrupt input.
    pub fn num_bits(&self) -> CountsResult<usize> {
        let mut keys = self.0.keys();
        let first = keys.next().ok_or(CountsError::EmptyCounts)?;
        let expected = first.len();
        for key in keys {
            if key.len() != expected {
                return Err(CountsError::NonUniformKeys {
                    key: key.clone(),
                    found: key.len(),
                    expected,
                });
            }
        }
        Ok(expected)
    }

    /// Iterate over `(bitstring, frequency)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (bitstring, freq) in iter {
            counts.add(bitstring, freq);
        }
        counts
    }
}

impl<'a> FromIterator<(&'a str, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(bitstring, freq)| (bitstring.to_string(), freq))
            .collect()
    }
}

impl From<FxHashMap<String, u64>> for Counts {
    fn from(map: FxHashMap<String, u64>) -> Self {
        Counts(map)
    }
}
