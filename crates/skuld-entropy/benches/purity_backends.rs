//! Purity-cell backend benchmark suite.
//!
//! Compares the reference loop, the bit-packed vectorized cell, and the
//! parallel sweep over growing numbers of distinct outcomes — the O(k²)
//! pair sum dominates, so the distinct-outcome count is the axis that
//! matters.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use skuld_counts::{BitstringRange, Counts, QubitDegree, make_dummy_counts};
use skuld_entropy::{
    PostProcessingBackend, PurityCellComputer, ReferenceCell, VectorizedCell,
    entangled_entropy_core,
};

fn benchmark_single_cell(c: &mut Criterion) {
    let mut group = c.benchmark_group("purity_cell");
    let range = BitstringRange(4, 12);

    for distinct in [16usize, 64, 256, 1024] {
        let counts = make_dummy_counts(12, distinct, 32, 42).unwrap();

        group.bench_with_input(
            BenchmarkId::new("reference", distinct),
            &counts,
            |b, counts| {
                b.iter(|| {
                    let cell = ReferenceCell.purity_cell(0, counts, range, 8).unwrap();
                    black_box(cell);
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("vectorized", distinct),
            &counts,
            |b, counts| {
                b.iter(|| {
                    let cell = VectorizedCell.purity_cell(0, counts, range, 8).unwrap();
                    black_box(cell);
                });
            },
        );
    }

    group.finish();
}

fn benchmark_full_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("entropy_core");
    group.sample_size(20);

    let shots = 256 * 32;
    for repetitions in [10usize, 50, 100] {
        let counts: Vec<Counts> = (0..repetitions)
            .map(|i| make_dummy_counts(12, 256, 32, i as u64).unwrap())
            .collect();

        group.bench_with_input(
            BenchmarkId::new("vectorized", repetitions),
            &counts,
            |b, counts| {
                b.iter(|| {
                    let sweep = entangled_entropy_core(
                        shots,
                        counts,
                        Some(QubitDegree::Size(8)),
                        None,
                        PostProcessingBackend::Vectorized,
                        None,
                    )
                    .unwrap();
                    black_box(sweep);
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("parallel", repetitions),
            &counts,
            |b, counts| {
                b.iter(|| {
                    let sweep = entangled_entropy_core(
                        shots,
                        counts,
                        Some(QubitDegree::Size(8)),
                        None,
                        PostProcessingBackend::Parallel,
                        None,
                    )
                    .unwrap();
                    black_box(sweep);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_single_cell, benchmark_full_sweep);
criterion_main!(benches);
