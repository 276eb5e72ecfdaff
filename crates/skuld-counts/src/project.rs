//! Projection of counts onto a subsystem bit range.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::counts::Counts;
use crate::error::CountsResult;
use crate::partition::{BitstringRange, cycling_slice, is_cycling_slice_active};

/// Counts reduced to a subsystem, in sorted key order.
///
/// Sorted entries give every downstream backend one canonical pair ordering,
/// so the alternating pairwise sums accumulate identically no matter how the
/// caller's map iterates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedCounts {
    entries: Vec<(String, u64)>,
}

impl ProjectedCounts {
    /// The projected `(bitstring, frequency)` entries, sorted by key.
    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    /// Number of distinct projected outcomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no outcome survived projection.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of shots across projected outcomes.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, freq)| freq).sum()
    }
}

/// Project counts onto a bit range, aggregating colliding keys.
///
/// Cyclic-vs-linear slicing is decided once per call via
/// [`is_cycling_slice_active`] and applied uniformly to every key. For a
/// full-width range the projection is the identity transform up to entry
/// ordering.
pub fn project_counts(counts: &Counts, range: BitstringRange) -> CountsResult<ProjectedCounts> {
    let num_bits = counts.num_bits()?;
    let cyclic = is_cycling_slice_active(num_bits, range)?;

    let mut reduced: FxHashMap<String, u64> = FxHashMap::default();
    for (key, freq) in counts.iter() {
        let sub = if cyclic {
            cycling_slice(key, range.start(), range.end())?
        } else {
            linear_key_slice(key, range)
        };
        *reduced.entry(sub).or_insert(0) += freq;
    }

    let mut entries: Vec<(String, u64)> = reduced.into_iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    Ok(ProjectedCounts { entries })
}

/// Plain slice of a key, with negative indices counted from the end.
fn linear_key_slice(key: &str, range: BitstringRange) -> String {
    let n = key.len() as i32;
    let norm = |idx: i32| -> usize {
        if idx < 0 {
            (n + idx).max(0) as usize
        } else {
            idx.min(n) as usize
        }
    };
    let (lo, hi) = (norm(range.start()), norm(range.end()));
    if lo >= hi {
        String::new()
    } else {
        key[lo..hi].to_string()
    }
}
