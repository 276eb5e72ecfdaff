//! Entropy estimators aggregated from purity cells.
//!
//! The entropy computed here is the second-order Rényi entropy of a
//! subsystem's reduced density matrix, estimated from randomized
//! measurements (Brydges et al., Science 364, 260 (2019)).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use skuld_counts::{BitstringRange, Counts, QubitDegree};

use crate::backend::PostProcessingBackend;
use crate::entropy_core::entangled_entropy_core;
use crate::error::EntropyResult;
use crate::mitigation::depolarizing_error_mitigation;

/// Second-order Rényi entropy estimators for one partition.
///
/// Created once per analysis call and never mutated; serializes with the
/// field names the surrounding framework persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntropyAnalysis {
    /// Mean of the purity cells.
    pub purity: f64,
    /// `-log2(purity)`.
    pub entropy: f64,
    /// Standard deviation of the purity cells.
    #[serde(rename = "puritySD")]
    pub purity_sd: f64,
    /// Propagated standard deviation of the entropy.
    #[serde(rename = "entropySD")]
    pub entropy_sd: f64,
    /// Purity cell per repetition index, kept as a diagnostic side product.
    #[serde(rename = "purityCells")]
    pub purity_cells: BTreeMap<usize, f64>,
    /// Resolved partition range.
    #[serde(rename = "bitStringRange")]
    pub bitstring_range: BitstringRange,
    /// Resolved measuring range.
    #[serde(rename = "measureActually")]
    pub measure_actually: BitstringRange,
    /// Number of repetitions analyzed.
    #[serde(rename = "countsNum")]
    pub counts_num: usize,
    /// Seconds spent computing the cells.
    #[serde(rename = "takingTime")]
    pub taking_time: f64,
}

/// A previously computed all-system sweep, reusable across partitions.
///
/// The all-system result is partition-independent, so one computation can
/// serve every subsystem analysis of the same experiment. Passed
/// explicitly — there is no hidden cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllSystemBaseline {
    /// Name of the analysis the baseline came from.
    pub source: String,
    /// Purity cell per repetition index of the all-system sweep.
    #[serde(rename = "purityCellsAllSys")]
    pub purity_cells: BTreeMap<usize, f64>,
    /// Partition range of the all-system sweep.
    #[serde(rename = "bitStringRange")]
    pub bitstring_range: BitstringRange,
    /// Measuring range of the all-system sweep.
    #[serde(rename = "measureActually")]
    pub measure_actually: BitstringRange,
}

impl AllSystemBaseline {
    /// Capture the all-system part of a mitigated analysis for reuse.
    pub fn from_analysis(source: impl Into<String>, analysis: &MitigatedEntropyAnalysis) -> Self {
        Self {
            source: source.into(),
            purity_cells: analysis.purity_cells_all_sys.clone(),
            bitstring_range: analysis.bitstring_range_all_sys,
            measure_actually: analysis.measure_actually_all_sys,
        }
    }
}

/// Entropy estimators with depolarizing error mitigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MitigatedEntropyAnalysis {
    // Target system.
    /// Mean of the purity cells.
    pub purity: f64,
    /// `-log2(purity)`.
    pub entropy: f64,
    /// Purity cell per repetition index.
    #[serde(rename = "purityCells")]
    pub purity_cells: BTreeMap<usize, f64>,
    /// Standard deviation of the purity cells.
    #[serde(rename = "puritySD")]
    pub purity_sd: f64,
    /// Propagated standard deviation of the entropy.
    #[serde(rename = "entropySD")]
    pub entropy_sd: f64,
    /// Resolved partition range.
    #[serde(rename = "bitStringRange")]
    pub bitstring_range: BitstringRange,

    // All system.
    /// Where the all-system quantities came from: `"independent"` for a
    /// fresh computation, otherwise the supplied baseline's source tag.
    #[serde(rename = "allSystemSource")]
    pub all_system_source: String,
    /// Mean of the all-system purity cells.
    #[serde(rename = "purityAllSys")]
    pub purity_all_sys: f64,
    /// `-log2` of the all-system purity.
    #[serde(rename = "entropyAllSys")]
    pub entropy_all_sys: f64,
    /// All-system purity cell per repetition index.
    #[serde(rename = "purityCellsAllSys")]
    pub purity_cells_all_sys: BTreeMap<usize, f64>,
    /// Standard deviation of the all-system purity cells.
    #[serde(rename = "puritySDAllSys")]
    pub purity_sd_all_sys: f64,
    /// Propagated standard deviation of the all-system entropy.
    #[serde(rename = "entropySDAllSys")]
    pub entropy_sd_all_sys: f64,
    /// Partition range of the all-system sweep. The key spelling is the
    /// historical wire format.
    #[serde(rename = "bitsStringRangeAllSys")]
    pub bitstring_range_all_sys: BitstringRange,

    // Mitigated.
    /// Estimated depolarizing error rate.
    #[serde(rename = "errorRate")]
    pub error_rate: f64,
    /// Purity after error mitigation.
    #[serde(rename = "mitigatedPurity")]
    pub mitigated_purity: f64,
    /// `-log2` of the mitigated purity.
    #[serde(rename = "mitigatedEntropy")]
    pub mitigated_entropy: f64,

    // Info.
    /// The degree the caller requested, full width if unspecified.
    pub degree: QubitDegree,
    /// Width of the measured register.
    #[serde(rename = "numQubits")]
    pub num_qubits: u32,
    /// Resolved measuring range of the target sweep.
    #[serde(rename = "measureActually")]
    pub measure_actually: BitstringRange,
    /// Resolved measuring range of the all-system sweep.
    #[serde(rename = "measureActuallyAllSys")]
    pub measure_actually_all_sys: BitstringRange,
    /// Number of repetitions analyzed.
    #[serde(rename = "countsNum")]
    pub counts_num: usize,
    /// Seconds spent on the target sweep.
    #[serde(rename = "takingTime")]
    pub taking_time: f64,
    /// Seconds spent on the all-system sweep, zero when a baseline was
    /// reused.
    #[serde(rename = "takingTimeAllSys")]
    pub taking_time_all_sys: f64,
}

/// Calculate the entangled entropy of a subsystem.
///
/// Runs one purity-cell sweep over the requested partition and aggregates:
/// `purity` is the mean over repetitions, `entropy = -log2(purity)`, and
/// the standard deviations propagate as `entropySD = puritySD / ln 2 /
/// purity`.
pub fn randomized_entangled_entropy(
    shots: u64,
    counts: &[Counts],
    degree: Option<QubitDegree>,
    measure: Option<(i32, i32)>,
    backend: PostProcessingBackend,
    workers: Option<usize>,
) -> EntropyResult<EntropyAnalysis> {
    let sweep = entangled_entropy_core(shots, counts, degree, measure, backend, workers)?;
    let (purity, purity_sd) = mean_and_std(&sweep.purity_cells);
    let entropy = -purity.log2();
    let entropy_sd = purity_sd / std::f64::consts::LN_2 / purity;

    Ok(EntropyAnalysis {
        purity,
        entropy,
        purity_sd,
        entropy_sd,
        purity_cells: sweep.purity_cells,
        bitstring_range: sweep.bitstring_range,
        measure_actually: sweep.measure_actually,
        counts_num: counts.len(),
        taking_time: sweep.taking_time,
    })
}

/// Calculate the entangled entropy with depolarizing error mitigation.
///
/// Additionally sweeps the all-system partition — or reuses a supplied
/// [`AllSystemBaseline`], in which case no new all-system computation
/// happens and `takingTimeAllSys` is zero — estimates the depolarizing
/// error rate from it, and corrects the subsystem purity.
pub fn randomized_entangled_entropy_mitigated(
    shots: u64,
    counts: &[Counts],
    degree: Option<QubitDegree>,
    measure: Option<(i32, i32)>,
    backend: PostProcessingBackend,
    workers: Option<usize>,
    baseline: Option<AllSystemBaseline>,
) -> EntropyResult<MitigatedEntropyAnalysis> {
    let sweep = entangled_entropy_core(shots, counts, degree, measure, backend, workers)?;

    let (all_sys_cells, all_sys_range, all_sys_measure, all_sys_time, source) = match baseline {
        None => {
            let all_sweep = entangled_entropy_core(shots, counts, None, measure, backend, workers)?;
            (
                all_sweep.purity_cells,
                all_sweep.bitstring_range,
                all_sweep.measure_actually,
                all_sweep.taking_time,
                "independent".to_string(),
            )
        }
        Some(existing) => (
            existing.purity_cells,
            existing.bitstring_range,
            existing.measure_actually,
            0.0,
            existing.source,
        ),
    };

    let (purity, purity_sd) = mean_and_std(&sweep.purity_cells);
    let (purity_all_sys, purity_sd_all_sys) = mean_and_std(&all_sys_cells);

    let entropy = -purity.log2();
    let entropy_sd = purity_sd / std::f64::consts::LN_2 / purity;
    let entropy_all_sys = -purity_all_sys.log2();
    let entropy_sd_all_sys = purity_sd_all_sys / std::f64::consts::LN_2 / purity_all_sys;

    let num_qubits = counts[0].num_bits()? as u32;
    let mitigated = depolarizing_error_mitigation(
        purity,
        purity_all_sys,
        sweep.subsystem_size,
        num_qubits,
    )?;

    Ok(MitigatedEntropyAnalysis {
        purity,
        entropy,
        purity_cells: sweep.purity_cells,
        purity_sd,
        entropy_sd,
        bitstring_range: sweep.bitstring_range,
        all_system_source: source,
        purity_all_sys,
        entropy_all_sys,
        purity_cells_all_sys: all_sys_cells,
        purity_sd_all_sys,
        entropy_sd_all_sys,
        bitstring_range_all_sys: all_sys_range,
        error_rate: mitigated.error_rate,
        mitigated_purity: mitigated.mitigated_purity,
        mitigated_entropy: mitigated.mitigated_entropy,
        degree: degree.unwrap_or(QubitDegree::Size(num_qubits as i32)),
        num_qubits,
        measure_actually: sweep.measure_actually,
        measure_actually_all_sys: all_sys_measure,
        counts_num: counts.len(),
        taking_time: sweep.taking_time,
        taking_time_all_sys: all_sys_time,
    })
}

/// Mean and population standard deviation of a cell dictionary.
pub(crate) fn mean_and_std(cells: &BTreeMap<usize, f64>) -> (f64, f64) {
    if cells.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = cells.len() as f64;
    let mean = cells.values().sum::<f64>() / n;
    let variance = cells.values().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
