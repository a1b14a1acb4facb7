//! Benchmarks for the hypersphere maps
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geodesia_core::PointBatch;
use geodesia_manifolds::Hypersphere;
use nalgebra::DMatrix;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

fn random_batch(rng: &mut StdRng, dim: usize, n: usize) -> PointBatch<f64> {
    PointBatch::from_matrix(DMatrix::<f64>::from_fn(dim, n, |_, _| StandardNormal.sample(&mut *rng)))
}

fn benchmark_hypersphere_maps(c: &mut Criterion) {
    let mut group = c.benchmark_group("hypersphere");
    let mut rng = StdRng::seed_from_u64(42);

    for &n_samples in &[1, 100, 10_000] {
        let sphere = Hypersphere::<f64>::new(9).unwrap();
        let metric = sphere.metric();
        let base = sphere.projection(&random_batch(&mut rng, 10, n_samples)).unwrap();
        let tangent = sphere
            .projection_to_tangent_space(&random_batch(&mut rng, 10, n_samples), &base)
            .unwrap();
        let other = sphere.projection(&random_batch(&mut rng, 10, n_samples)).unwrap();

        group.bench_with_input(BenchmarkId::new("exp", n_samples), &n_samples, |b, _| {
            b.iter(|| metric.exp(black_box(&tangent), black_box(&base)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("log", n_samples), &n_samples, |b, _| {
            b.iter(|| metric.log(black_box(&other), black_box(&base)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("distance", n_samples), &n_samples, |b, _| {
            b.iter(|| metric.distance(black_box(&other), black_box(&base)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("parallel_transport", n_samples), &n_samples, |b, _| {
            b.iter(|| {
                metric
                    .parallel_transport(black_box(&tangent), black_box(&tangent), black_box(&base))
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_hypersphere_maps);
criterion_main!(benches);
