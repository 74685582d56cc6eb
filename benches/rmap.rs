use criterion::{criterion_group, criterion_main, Criterion};
use rmap::lowlevel::{CorrelatePlan, FormulaScalar, Kernel, ReferenceScalar};
use rmap::{compute_rmap, FingerprintMatrix, Method, RmapConfig};
use std::hint::black_box;

fn make_matrix(voxels: usize, samples: usize) -> FingerprintMatrix {
    let mut data = Vec::with_capacity(voxels * samples);
    for v in 0..voxels {
        for s in 0..samples {
            let value = ((v * 13) ^ (s * 7) ^ (v * s)) & 0xFF;
            data.push(value as f64 / 255.0);
        }
    }
    FingerprintMatrix::new(data, voxels, samples).unwrap()
}

fn make_correlates(samples: usize) -> Vec<f64> {
    (0..samples).map(|s| ((s * 31) % 17) as f64 * 0.1).collect()
}

fn bench_kernels(c: &mut Criterion) {
    let voxels = 100_000;
    let samples = 40;
    let matrix = make_matrix(voxels, samples);
    let y = make_correlates(samples);
    let plan = CorrelatePlan::new(&y).unwrap();

    c.bench_function("formula_scalar_100k_x40", |b| {
        b.iter(|| black_box(FormulaScalar::scan(matrix.view(), &plan).unwrap()));
    });

    c.bench_function("reference_scalar_100k_x40", |b| {
        b.iter(|| black_box(ReferenceScalar::scan(matrix.view(), &plan).unwrap()));
    });

    let parallel = RmapConfig {
        method: Method::Formula,
        parallel: true,
    };
    c.bench_function("compute_rmap_parallel_100k_x40", |b| {
        b.iter(|| black_box(compute_rmap(matrix.view(), &y, &parallel).unwrap()));
    });
}

criterion_group!(benches, bench_kernels);
criterion_main!(benches);
