//! `skuld-entropy` — randomized-measurement entanglement-entropy estimation.
//!
//! Converts raw measurement counts from randomized-measurement experiments
//! into second-order Rényi entropy estimators:
//!
//! - **Purity cells**: the O(k²) Hamming-weighted pairwise sum over one
//!   repetition's projected counts, on three numerically-agreeing backends
//!   (reference loop, bit-packed vectorized, rayon parallel)
//! - **Entropy aggregation**: purity/entropy means and standard deviations
//!   across repetitions, with an optional reusable all-system baseline
//! - **Depolarizing error mitigation**: closed-form correction of the
//!   subsystem purity from the all-system purity
//! - **Overlap echo**: the same pairwise machinery across two experiments
//!
//! # Quick start
//!
//! ```rust
//! use skuld_counts::{Counts, QubitDegree};
//! use skuld_entropy::{PostProcessingBackend, randomized_entangled_entropy};
//!
//! // Ten repetitions of a GHZ-like outcome over 4 qubits.
//! let single: Counts = [("0000", 2048u64), ("1111", 2048)].into_iter().collect();
//! let counts = vec![single; 10];
//!
//! let analysis = randomized_entangled_entropy(
//!     4096,
//!     &counts,
//!     Some(QubitDegree::Size(2)),
//!     None,
//!     PostProcessingBackend::Vectorized,
//!     None,
//! )
//! .unwrap();
//!
//! assert_eq!(analysis.purity_cells.len(), 10);
//! assert!((analysis.entropy - -analysis.purity.log2()).abs() < 1e-12);
//! ```

pub mod analysis;
pub mod backend;
pub mod cell;
pub mod ensemble;
pub mod entropy_core;
pub mod error;
pub mod mitigation;
pub mod overlap;

pub use analysis::{
    AllSystemBaseline, EntropyAnalysis, MitigatedEntropyAnalysis, randomized_entangled_entropy,
    randomized_entangled_entropy_mitigated,
};
pub use backend::{PostProcessingBackend, available_backends, workers_distribution};
pub use cell::{PurityCellComputer, ReferenceCell, VectorizedCell};
pub use entropy_core::{CellSweep, entangled_entropy_core};
pub use ensemble::ensemble_cell;
pub use error::{EntropyError, EntropyResult};
pub use mitigation::{MitigatedQuantity, depolarizing_error_mitigation, mitigation_equation, solve_p};
pub use overlap::{OverlapAnalysis, echo_cell, randomized_overlap_echo};
