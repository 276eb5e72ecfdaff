//! Core purity-cell sweep across repetitions.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

use skuld_counts::{BitstringRange, Counts, QubitDegree, degree_handler};

use crate::backend::{PostProcessingBackend, workers_distribution};
use crate::cell::{PurityCellComputer, ReferenceCell, VectorizedCell};
use crate::error::{EntropyError, EntropyResult};

/// Output of one purity-cell sweep.
#[derive(Debug, Clone)]
pub struct CellSweep {
    /// Purity cell per repetition index.
    pub purity_cells: BTreeMap<usize, f64>,
    /// Resolved partition range.
    pub bitstring_range: BitstringRange,
    /// Resolved measuring range.
    pub measure_actually: BitstringRange,
    /// Width of the kept subsystem.
    pub subsystem_size: u32,
    /// Seconds spent on the sweep.
    pub taking_time: f64,
}

/// Validate inputs, resolve the partition, and compute one purity cell per
/// repetition.
///
/// Validation happens before any numeric work: a bad range or a shots
/// mismatch never produces a partial result. The parallel backend spawns a
/// worker pool sized by [`workers_distribution`]; cells are collected by
/// repetition index, so completion order never affects the outcome.
pub fn entangled_entropy_core(
    shots: u64,
    counts: &[Counts],
    degree: Option<QubitDegree>,
    measure: Option<(i32, i32)>,
    backend: PostProcessingBackend,
    workers: Option<usize>,
) -> EntropyResult<CellSweep> {
    let (bitstring_range, measure_actually, subsystem_size) =
        validate_and_resolve(shots, counts, degree, measure)?;

    debug!(
        partition = %bitstring_range,
        measure = %measure_actually,
        backend = %backend,
        repetitions = counts.len(),
        "computing purity cells"
    );

    let begin = Instant::now();
    let cells = sweep_cells(counts, bitstring_range, subsystem_size, backend, workers)?;
    let taking_time = begin.elapsed().as_secs_f64();

    Ok(CellSweep {
        purity_cells: cells.into_iter().collect(),
        bitstring_range,
        measure_actually,
        subsystem_size,
        taking_time,
    })
}

/// Shared input validation and partition resolution.
pub(crate) fn validate_and_resolve(
    shots: u64,
    counts: &[Counts],
    degree: Option<QubitDegree>,
    measure: Option<(i32, i32)>,
) -> EntropyResult<(BitstringRange, BitstringRange, u32)> {
    if counts.is_empty() {
        return Err(EntropyError::EmptyCounts);
    }
    if let Some(index) = counts.iter().position(Counts::is_empty) {
        return Err(EntropyError::EmptyRepetition { index });
    }

    let observed = counts[0].total();
    if observed != shots {
        return Err(EntropyError::ShotsMismatch {
            declared: shots,
            observed,
        });
    }

    let num_bits = counts[0].num_bits()? as i32;
    let (bitstring_range, measure_actually, subsystem_size) =
        degree_handler(num_bits, degree, measure)?;
    Ok((bitstring_range, measure_actually, subsystem_size as u32))
}

/// Run the per-repetition cell computation on the selected backend.
pub(crate) fn sweep_cells(
    counts: &[Counts],
    range: BitstringRange,
    subsystem_size: u32,
    backend: PostProcessingBackend,
    workers: Option<usize>,
) -> EntropyResult<Vec<(usize, f64)>> {
    match backend {
        PostProcessingBackend::Reference => counts
            .iter()
            .enumerate()
            .map(|(idx, single)| ReferenceCell.purity_cell(idx, single, range, subsystem_size))
            .collect(),
        PostProcessingBackend::Vectorized => counts
            .iter()
            .enumerate()
            .map(|(idx, single)| VectorizedCell.purity_cell(idx, single, range, subsystem_size))
            .collect(),
        PostProcessingBackend::Parallel => {
            let launch_workers = workers_distribution(workers);
            if launch_workers == 1 || counts.len() == 1 {
                warn!(
                    workers = launch_workers,
                    repetitions = counts.len(),
                    "single worker resolved, running the vectorized backend sequentially"
                );
                return sweep_cells(
                    counts,
                    range,
                    subsystem_size,
                    PostProcessingBackend::Vectorized,
                    workers,
                );
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(launch_workers)
                .build()?;
            pool.install(|| {
                counts
                    .par_iter()
                    .enumerate()
                    .map(|(idx, single)| {
                        VectorizedCell.purity_cell(idx, single, range, subsystem_size)
                    })
                    .collect()
            })
        }
    }
}
