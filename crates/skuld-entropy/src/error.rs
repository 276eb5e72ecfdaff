//! Error types for the entropy engine.

use thiserror::Error;

/// Errors produced by the randomized-measurement post-processing engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EntropyError {
    /// Counts-layer failure: range resolution, projection, or Hamming.
    #[error("counts error: {0}")]
    Counts(#[from] skuld_counts::CountsError),

    /// Declared shots do not match the observed totals.
    #[error("declared {declared} shots but counts sum to {observed}")]
    ShotsMismatch {
        /// Shots the caller declared.
        declared: u64,
        /// Shots the first repetition actually sums to.
        observed: u64,
    },

    /// No repetitions supplied.
    #[error("no counts supplied — at least one repetition is required")]
    EmptyCounts,

    /// A repetition holds no outcomes.
    #[error("repetition {index} holds no outcomes")]
    EmptyRepetition {
        /// Index of the empty repetition.
        index: usize,
    },

    /// Overlap inputs differ in repetition count.
    #[error("first counts series has {first} repetitions but second has {second}")]
    CountsLengthMismatch {
        /// Repetitions on the first side.
        first: usize,
        /// Repetitions on the second side.
        second: usize,
    },

    /// The requested backend name is not compiled into this build.
    #[error("backend '{requested}' is not available, compiled backends: {available}")]
    BackendUnavailable {
        /// The name that failed to resolve.
        requested: String,
        /// Comma-separated names of the compiled backends.
        available: String,
    },

    /// The worker pool could not be started.
    #[error("worker pool failed to start: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// Mitigation inputs left the physical domain.
    #[error("mitigation out of domain: {reason}")]
    MitigationDomain {
        /// What went out of domain.
        reason: String,
    },
}

/// Result type for entropy post-processing operations.
pub type EntropyResult<T> = Result<T, EntropyError>;
