//! Property-based tests for the purity-cell engines.
//!
//! Strategies generate seeded dummy experiments, so every case is
//! reproducible from the proptest seed alone.

use proptest::prelude::*;

use skuld_counts::{
    BitstringRange, QubitDegree, make_dummy_counts, project_counts, qubit_selector,
};
use skuld_entropy::{
    PostProcessingBackend, PurityCellComputer, ReferenceCell, VectorizedCell,
    entangled_entropy_core, workers_distribution,
};

/// A dummy experiment: register width, distinct outcomes, shots per
/// outcome, and a generator seed.
fn arb_experiment() -> impl Strategy<Value = (u32, usize, u64, u64)> {
    (4u32..=10, 2usize..=24, 16u64..=256, any::<u64>()).prop_filter(
        "outcomes must fit the register",
        |(bits, num, _, _)| (*num as u64) <= (1u64 << bits),
    )
}

/// A valid degree for the given register width.
fn arb_degree(bits: u32) -> impl Strategy<Value = QubitDegree> {
    let n = bits as i32;
    prop_oneof![
        (1..=n).prop_map(QubitDegree::Size),
        (0..n).prop_flat_map(move |a| (a + 1..=n).prop_map(move |b| QubitDegree::Range(a, b))),
        // Cyclic: start below zero, end above.
        (-(n - 1)..0)
            .prop_flat_map(move |a| (1..=(n + a)).prop_map(move |b| QubitDegree::Range(a, b))),
    ]
}

proptest! {
    /// The vectorized cell matches the reference cell on arbitrary
    /// experiments and partitions.
    #[test]
    fn test_vectorized_matches_reference(
        (bits, num, shots_per_case, seed) in arb_experiment(),
        degree_seed in any::<prop::sample::Index>(),
    ) {
        let counts = make_dummy_counts(bits, num, shots_per_case, seed).unwrap();
        let degrees: Vec<QubitDegree> = (1..=bits as i32).map(QubitDegree::Size).collect();
        let degree = degrees[degree_seed.index(degrees.len())];
        let range = qubit_selector(bits as i32, Some(degree)).unwrap();
        let size = range.width() as u32;

        let (_, reference) = ReferenceCell.purity_cell(0, &counts, range, size).unwrap();
        let (_, vectorized) = VectorizedCell.purity_cell(0, &counts, range, size).unwrap();
        prop_assert!(
            (reference - vectorized).abs() < 1e-10,
            "range {}: {} vs {}", range, reference, vectorized
        );
    }

    /// Full-width projection is the identity transform.
    #[test]
    fn test_full_width_projection_identity(
        (bits, num, shots_per_case, seed) in arb_experiment(),
    ) {
        let counts = make_dummy_counts(bits, num, shots_per_case, seed).unwrap();
        let projected = project_counts(&counts, BitstringRange(0, bits as i32)).unwrap();
        prop_assert_eq!(projected.len(), counts.len());
        prop_assert_eq!(projected.total(), counts.total());
        for (key, freq) in projected.entries() {
            prop_assert_eq!(counts.get(key), *freq);
        }
    }

    /// All three backends agree through the full core on arbitrary degrees,
    /// including cyclic ones.
    #[test]
    fn test_core_backend_equivalence(
        (bits, num, shots_per_case, seed, degree) in arb_experiment()
            .prop_flat_map(|(bits, num, shots_per_case, seed)| {
                arb_degree(bits)
                    .prop_map(move |degree| (bits, num, shots_per_case, seed, degree))
            }),
    ) {
        let counts = vec![make_dummy_counts(bits, num, shots_per_case, seed).unwrap(); 4];
        let shots = num as u64 * shots_per_case;

        let mut means = Vec::new();
        for backend in [
            PostProcessingBackend::Reference,
            PostProcessingBackend::Vectorized,
            PostProcessingBackend::Parallel,
        ] {
            let sweep = entangled_entropy_core(
                shots, &counts, Some(degree), None, backend, Some(2),
            ).unwrap();
            means.push(
                sweep.purity_cells.values().sum::<f64>() / sweep.purity_cells.len() as f64,
            );
        }
        prop_assert!((means[0] - means[1]).abs() < 1e-10, "degree {:?}", degree);
        prop_assert!((means[0] - means[2]).abs() < 1e-10, "degree {:?}", degree);
    }

    /// Worker distribution always lands in `[1, cpu_count]`.
    #[test]
    fn test_workers_distribution_bounds(requested in any::<usize>()) {
        let cpu_count = std::thread::available_parallelism().map_or(1, usize::from);
        let workers = workers_distribution(Some(requested));
        prop_assert!(workers >= 1);
        prop_assert!(workers <= cpu_count);
    }
}
