//! Subsystem partitions over a measured bitstring register.
//!
//! A partition is requested as a [`QubitDegree`] — either a subsystem size
//! counted from the right-most qubits, or an explicit index range — and
//! resolved against the register width into a [`BitstringRange`]. Ranges may
//! wrap past the register boundary ("cyclic" slicing), in which case the
//! kept bits are `key[start..] + key[..end]`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CountsError, CountsResult};

/// A subsystem selection, as callers express it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QubitDegree {
    /// A right-aligned subsystem of this many qubits.
    Size(i32),
    /// An explicit `[start, end)` range of bit positions.
    Range(i32, i32),
}

/// A resolved `[start, end)` range of bit positions.
///
/// Linear when `0 <= start < end <= n`; cyclic (wrapping past the register
/// boundary) when `start < 0 < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitstringRange(pub i32, pub i32);

impl BitstringRange {
    /// Start of the range.
    pub fn start(&self) -> i32 {
        self.0
    }

    /// End of the range.
    pub fn end(&self) -> i32 {
        self.1
    }

    /// Number of bit positions the range covers.
    pub fn width(&self) -> i32 {
        self.1 - self.0
    }
}

impl From<(i32, i32)> for BitstringRange {
    fn from(pair: (i32, i32)) -> Self {
        BitstringRange(pair.0, pair.1)
    }
}

impl fmt::Display for BitstringRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.0, self.1)
    }
}

/// Resolve a degree request into a concrete bit range.
///
/// `None` selects the full register. An integer degree selects that many
/// right-most bits. An explicit range is mapped modulo the register width,
/// except that a `start < 0 < end` pair is kept as-is to request cyclic
/// slicing.
pub fn qubit_selector(num_bits: i32, degree: Option<QubitDegree>) -> CountsResult<BitstringRange> {
    if num_bits <= 0 {
        return Err(CountsError::InvalidRange {
            start: 0,
            end: 0,
            num_bits,
            conditions: " n > 0;".to_string(),
        });
    }
    match degree {
        None => Ok(BitstringRange(0, num_bits)),
        Some(QubitDegree::Size(d)) => {
            if d > num_bits {
                return Err(CountsError::DegreeTooLarge {
                    degree: d,
                    num_bits,
                });
            }
            if d < 0 {
                return Err(CountsError::NegativeDegree(d));
            }
            Ok(BitstringRange(num_bits - d, num_bits))
        }
        Some(QubitDegree::Range(start, end)) => {
            let (a, b) = if start < 0 && end > 0 {
                (start, end)
            } else {
                let map = |d: i32| {
                    if d == num_bits {
                        num_bits
                    } else {
                        d.rem_euclid(num_bits)
                    }
                };
                (map(start), map(end))
            };
            Ok(BitstringRange(a.min(b), a.max(b)))
        }
    }
}

/// Resolve degree and measure requests together.
///
/// Returns the partition range, the measuring range (defaulting to the full
/// register), and the subsystem size. The partition range is validated
/// before any numeric work: `end > start`, `start >= -n`, `end <= n`, and
/// `end - start <= n` must all hold.
pub fn degree_handler(
    num_bits: i32,
    degree: Option<QubitDegree>,
    measure: Option<(i32, i32)>,
) -> CountsResult<(BitstringRange, BitstringRange, i32)> {
    let range = qubit_selector(num_bits, degree)?;
    let subsystem_size = range.width();

    let checks = [
        ("end > start", range.end() > range.start()),
        ("start >= -n", range.start() >= -num_bits),
        ("end <= n", range.end() <= num_bits),
        ("end - start <= n", range.width() <= num_bits),
    ];
    if checks.iter().any(|(_, ok)| !ok) {
        let conditions: String = checks
            .iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| format!(" {name};"))
            .collect();
        return Err(CountsError::InvalidRange {
            start: range.start(),
            end: range.end(),
            num_bits,
            conditions,
        });
    }

    let measure_actually = match measure {
        Some(pair) => BitstringRange::from(pair),
        None => qubit_selector(
            num_bits,
            Some(QubitDegree::Range(range.start(), range.end())),
        )?,
    };

    Ok((range, measure_actually, subsystem_size))
}

/// Slice a bitstring with wraparound.
///
/// Negative indices count from the end; a `start < 0 <= end` pair crosses
/// the register boundary and yields `s[start..] + s[..end]`. Expects ASCII
/// input, which bitstring keys always are.
pub fn cycling_slice(s: &str, start: i32, end: i32) -> CountsResult<String> {
    let length = s.len() as i32;
    if start < -length || end > length {
        let mut conditions = String::new();
        if start < -length {
            conditions.push_str(" start >= -n;");
        }
        if end > length {
            conditions.push_str(" end <= n;");
        }
        return Err(CountsError::InvalidRange {
            start,
            end,
            num_bits: length,
            conditions,
        });
    }
    if length == 0 {
        return Ok(String::new());
    }

    // An inverted pair slices to nothing, as Python slicing does.
    let plain = |lo: i32, hi: i32| {
        if lo >= hi {
            String::new()
        } else {
            s[lo as usize..hi as usize].to_string()
        }
    };
    let sliced = match (start >= 0, end >= 0) {
        (true, true) => plain(start, end),
        (false, true) => {
            let mut wrapped = String::with_capacity((end - start) as usize);
            wrapped.push_str(&s[(start + length) as usize..]);
            wrapped.push_str(&s[..end as usize]);
            wrapped
        }
        (true, false) => plain(start, end + length),
        (false, false) => plain(start + length, end + length),
    };
    Ok(sliced)
}

/// Python-style slice indices for a register of `n` positions.
fn linear_slice_indices(n: i32, start: i32, end: i32) -> Vec<i32> {
    let lo = if start < 0 {
        (n + start).max(0)
    } else {
        start.min(n)
    };
    let hi = if end < 0 { (n + end).max(0) } else { end.min(n) };
    if lo >= hi { Vec::new() } else { (lo..hi).collect() }
}

/// Wraparound slice indices for a register of `n` positions.
fn cyclic_slice_indices(n: i32, start: i32, end: i32) -> Vec<i32> {
    match (start >= 0, end >= 0) {
        (true, true) => (start..end).collect(),
        (false, true) => ((n + start)..n).chain(0..end).collect(),
        (true, false) => (start..(n + end)).collect(),
        (false, false) => ((n + start)..(n + end)).collect(),
    }
}

/// Whether a range slices the register cyclically.
///
/// Decided on the canonical index sequence `0..n`: the range is cyclic
/// exactly when its plain slice and its wraparound slice disagree.
pub fn is_cycling_slice_active(num_bits: usize, range: BitstringRange) -> CountsResult<bool> {
    let n = num_bits as i32;
    let (start, end) = (range.start(), range.end());
    if start < -n || end > n {
        return Err(CountsError::InvalidRange {
            start,
            end,
            num_bits: n,
            conditions: " start >= -n; end <= n;".to_string(),
        });
    }
    Ok(linear_slice_indices(n, start, end) != cyclic_slice_indices(n, start, end))
}
