//! Numeric backend selection and worker distribution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::EntropyError;

/// Numeric backend used to evaluate purity and echo cells.
///
/// All three are compiled into every build and must agree numerically; they
/// trade implementation simplicity against throughput.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostProcessingBackend {
    /// Plain double loop over projected entries. The correctness oracle.
    Reference,
    /// Bit-packed keys with a precomputed pair-weight table.
    #[default]
    Vectorized,
    /// Vectorized cells mapped across repetitions on a sized worker pool.
    Parallel,
}

impl PostProcessingBackend {
    /// Canonical lowercase name of the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            PostProcessingBackend::Reference => "reference",
            PostProcessingBackend::Vectorized => "vectorized",
            PostProcessingBackend::Parallel => "parallel",
        }
    }
}

impl fmt::Display for PostProcessingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostProcessingBackend {
    type Err = EntropyError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "reference" => Ok(PostProcessingBackend::Reference),
            // "native" is the historical name for the accelerated backend.
            "vectorized" | "native" => Ok(PostProcessingBackend::Vectorized),
            "parallel" => Ok(PostProcessingBackend::Parallel),
            other => Err(EntropyError::BackendUnavailable {
                requested: other.to_string(),
                available: available_backends()
                    .iter()
                    .map(|b| b.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

/// Backends compiled into this build.
///
/// Selection is static: there is no import-time probing, callers opt in to
/// a backend explicitly.
pub fn available_backends() -> &'static [PostProcessingBackend] {
    &[
        PostProcessingBackend::Reference,
        PostProcessingBackend::Vectorized,
        PostProcessingBackend::Parallel,
    ]
}

/// Clamp a requested worker count into `[1, cpu_count]`.
///
/// `None` requests the default of `cpu_count - 2`, which falls back to
/// `cpu_count` (with a warning) on machines too small for the margin.
/// Oversized requests fall back to the default; a zero request runs a
/// single worker.
pub fn workers_distribution(requested: Option<usize>) -> usize {
    let cpu_count = std::thread::available_parallelism().map_or(1, usize::from);
    let mut default = cpu_count.saturating_sub(2);
    if default < 1 {
        warn!(
            cpu_count,
            "available worker number is 2 or fewer, the pool will allocate every thread"
        );
        default = cpu_count;
    }

    match requested {
        None => default,
        Some(workers) if workers > cpu_count => {
            warn!(workers, cpu_count, "worker number exceeds the cpu count");
            default
        }
        Some(0) => {
            warn!("worker number 0 requested, using a single worker");
            1
        }
        Some(workers) => workers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!(
            "reference".parse::<PostProcessingBackend>().unwrap(),
            PostProcessingBackend::Reference
        );
        assert_eq!(
            "vectorized".parse::<PostProcessingBackend>().unwrap(),
            PostProcessingBackend::Vectorized
        );
        assert_eq!(
            "native".parse::<PostProcessingBackend>().unwrap(),
            PostProcessingBackend::Vectorized
        );
        assert_eq!(
            "parallel".parse::<PostProcessingBackend>().unwrap(),
            PostProcessingBackend::Parallel
        );
    }

    #[test]
    fn test_backend_unknown_name() {
        let err = "cython".parse::<PostProcessingBackend>().unwrap_err();
        match err {
            EntropyError::BackendUnavailable { requested, .. } => {
                assert_eq!(requested, "cython");
            }
            other => panic!("expected BackendUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_available_backends_covers_all() {
        let names: Vec<&str> = available_backends().iter().map(|b| b.as_str()).collect();
        assert_eq!(names, ["reference", "vectorized", "parallel"]);
    }

    #[test]
    fn test_workers_distribution_clamps() {
        let cpu_count = std::thread::available_parallelism().map_or(1, usize::from);
        for requested in [None, Some(0), Some(1), Some(cpu_count), Some(usize::MAX)] {
            let workers = workers_distribution(requested);
            assert!(workers >= 1, "requested {requested:?} gave {workers}");
            assert!(workers <= cpu_count, "requested {requested:?} gave {workers}");
        }
    }

    #[test]
    fn test_workers_distribution_zero_means_single() {
        assert_eq!(workers_distribution(Some(0)), 1);
    }

    #[test]
    fn test_backend_display_roundtrip() {
        for backend in available_backends() {
            let parsed: PostProcessingBackend = backend.to_string().parse().unwrap();
            assert_eq!(parsed, *backend);
        }
    }
}
