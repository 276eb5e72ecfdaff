//! Wavefunction-overlap echo between two randomized experiments.
//!
//! The overlap `Tr(ρ₁ρ₂)` of two states is estimated the same way a single
//! state's purity is, except that the pairwise ensemble sum runs across the
//! two experiments' projected counts instead of one experiment against
//! itself (Elben et al., PhysRevA.99.052323).

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

use skuld_counts::{BitstringRange, Counts, CountsError, QubitDegree, degree_handler, project_counts};

use crate::backend::{PostProcessingBackend, workers_distribution};
use crate::ensemble::{ensemble_cell, pair_weight};
use crate::error::{EntropyError, EntropyResult};

/// Overlap-echo estimators for one partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlapAnalysis {
    /// Mean of the echo cells.
    pub echo: f64,
    /// Standard deviation of the echo cells.
    #[serde(rename = "echoSD")]
    pub echo_sd: f64,
    /// Echo cell per repetition-pair index.
    #[serde(rename = "echoCells")]
    pub echo_cells: BTreeMap<usize, f64>,
    /// Resolved partition range.
    #[serde(rename = "bitStringRange")]
    pub bitstring_range: BitstringRange,
    /// Resolved measuring range.
    #[serde(rename = "measureActually")]
    pub measure_actually: BitstringRange,
    /// Total number of counts maps consumed, both sides.
    #[serde(rename = "countsNum")]
    pub counts_num: usize,
    /// Seconds spent computing the cells.
    #[serde(rename = "takingTime")]
    pub taking_time: f64,
}

/// Echo cell of one repetition pair: the ensemble sum over the cross
/// product of the two projected counts.
pub fn echo_cell(
    idx: usize,
    first_counts: &Counts,
    second_counts: &Counts,
    range: BitstringRange,
    subsystem_size: u32,
) -> EntropyResult<(usize, f64)> {
    let shots = paired_shots(first_counts, second_counts)?;
    let first = project_counts(first_counts, range)?;
    let second = project_counts(second_counts, range)?;

    let mut cell = 0.0_f64;
    for (s_i, s_i_meas) in first.entries() {
        for (s_j, s_j_meas) in second.entries() {
            cell += ensemble_cell(s_i, *s_i_meas, s_j, *s_j_meas, subsystem_size, shots)?;
        }
    }
    Ok((idx, cell))
}

/// Bit-packed echo cell, numerically identical to [`echo_cell`].
fn echo_cell_vectorized(
    idx: usize,
    first_counts: &Counts,
    second_counts: &Counts,
    range: BitstringRange,
    subsystem_size: u32,
) -> EntropyResult<(usize, f64)> {
    if subsystem_size > 64 {
        warn!(
            subsystem_size,
            "subsystem too wide for bit packing, falling back to the reference echo cell"
        );
        return echo_cell(idx, first_counts, second_counts, range, subsystem_size);
    }

    let shots = paired_shots(first_counts, second_counts)?;
    let first = project_counts(first_counts, range)?;
    let second = project_counts(second_counts, range)?;

    let pack = |key: &str| -> u64 {
        key.bytes()
            .fold(0u64, |acc, b| (acc << 1) | u64::from(b == b'1'))
    };
    let packed_first: Vec<(u64, f64)> = first
        .entries()
        .iter()
        .map(|(key, meas)| (pack(key), *meas as f64 / shots as f64))
        .collect();
    let packed_second: Vec<(u64, f64)> = second
        .entries()
        .iter()
        .map(|(key, meas)| (pack(key), *meas as f64 / shots as f64))
        .collect();
    let weights: Vec<f64> = (0..=subsystem_size)
        .map(|d| pair_weight(subsystem_size, d))
        .collect();

    let mut cell = 0.0_f64;
    for &(x_i, p_i) in &packed_first {
        for &(x_j, p_j) in &packed_second {
            let d = (x_i ^ x_j).count_ones() as usize;
            cell += weights[d] * p_i * p_j;
        }
    }
    Ok((idx, cell))
}

/// Both sides of a pair must report the same shot total.
fn paired_shots(first: &Counts, second: &Counts) -> EntropyResult<u64> {
    let shots = first.total();
    let second_shots = second.total();
    if shots != second_shots {
        return Err(EntropyError::ShotsMismatch {
            declared: shots,
            observed: second_shots,
        });
    }
    Ok(shots)
}

/// Calculate the wavefunction-overlap echo of two experiments.
///
/// The i-th repetition of `first_counts` is paired with the i-th repetition
/// of `second_counts`; one echo cell is computed per pair and the mean over
/// pairs estimates the overlap. Backend and worker dispatch follow the
/// entropy core.
pub fn randomized_overlap_echo(
    shots: u64,
    first_counts: &[Counts],
    second_counts: &[Counts],
    degree: Option<QubitDegree>,
    measure: Option<(i32, i32)>,
    backend: PostProcessingBackend,
    workers: Option<usize>,
) -> EntropyResult<OverlapAnalysis> {
    if first_counts.len() != second_counts.len() {
        return Err(EntropyError::CountsLengthMismatch {
            first: first_counts.len(),
            second: second_counts.len(),
        });
    }
    if first_counts.is_empty() {
        return Err(EntropyError::EmptyCounts);
    }
    if let Some(index) = first_counts
        .iter()
        .chain(second_counts.iter())
        .position(Counts::is_empty)
    {
        return Err(EntropyError::EmptyRepetition {
            index: index % first_counts.len(),
        });
    }

    let observed = first_counts[0].total();
    if observed != shots {
        return Err(EntropyError::ShotsMismatch {
            declared: shots,
            observed,
        });
    }

    let num_bits = first_counts[0].num_bits()?;
    let second_bits = second_counts[0].num_bits()?;
    if num_bits != second_bits {
        return Err(CountsError::LengthMismatch {
            left: num_bits,
            right: second_bits,
        }
        .into());
    }

    let (bitstring_range, measure_actually, subsystem_size) =
        degree_handler(num_bits as i32, degree, measure)?;
    let subsystem_size = subsystem_size as u32;

    debug!(
        partition = %bitstring_range,
        measure = %measure_actually,
        backend = %backend,
        overlaps = first_counts.len(),
        "computing echo cells"
    );

    let pairs: Vec<(&Counts, &Counts)> = first_counts.iter().zip(second_counts.iter()).collect();

    let begin = Instant::now();
    let cells: Vec<(usize, f64)> = match backend {
        PostProcessingBackend::Reference => pairs
            .iter()
            .enumerate()
            .map(|(idx, &(c1, c2))| echo_cell(idx, c1, c2, bitstring_range, subsystem_size))
            .collect::<EntropyResult<_>>()?,
        PostProcessingBackend::Vectorized => pairs
            .iter()
            .enumerate()
            .map(|(idx, &(c1, c2))| {
                echo_cell_vectorized(idx, c1, c2, bitstring_range, subsystem_size)
            })
            .collect::<EntropyResult<_>>()?,
        PostProcessingBackend::Parallel => {
            let launch_workers = workers_distribution(workers);
            if launch_workers == 1 || pairs.len() == 1 {
                warn!(
                    workers = launch_workers,
                    overlaps = pairs.len(),
                    "single worker resolved, running the vectorized echo sequentially"
                );
                pairs
                    .iter()
                    .enumerate()
                    .map(|(idx, &(c1, c2))| {
                        echo_cell_vectorized(idx, c1, c2, bitstring_range, subsystem_size)
                    })
                    .collect::<EntropyResult<_>>()?
            } else {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(launch_workers)
                    .build()?;
                pool.install(|| {
                    pairs
                        .par_iter()
                        .enumerate()
                        .map(|(idx, &(c1, c2))| {
                            echo_cell_vectorized(idx, c1, c2, bitstring_range, subsystem_size)
                        })
                        .collect::<EntropyResult<Vec<_>>>()
                })?
            }
        }
    };
    let taking_time = begin.elapsed().as_secs_f64();

    let echo_cells: BTreeMap<usize, f64> = cells.into_iter().collect();
    let (echo, echo_sd) = crate::analysis::mean_and_std(&echo_cells);

    Ok(OverlapAnalysis {
        echo,
        echo_sd,
        echo_cells,
        bitstring_range,
        measure_actually,
        counts_num: first_counts.len() + second_counts.len(),
        taking_time,
    })
}
