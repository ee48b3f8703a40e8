use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use camremap_linalg::{evaluate_fourier, evaluate_polynomial, euler_to_rot, transform_points, Point3};

fn bench_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("Series");

    for num_coeffs in [2, 4, 8, 16].iter() {
        let coeffs = (0..*num_coeffs)
            .map(|i| 0.1 * (i + 1) as f64)
            .collect::<Vec<_>>();

        group.bench_with_input(
            BenchmarkId::new("polynomial", num_coeffs),
            &coeffs,
            |b, coeffs| b.iter(|| evaluate_polynomial(black_box(coeffs), black_box(0.35))),
        );

        group.bench_with_input(
            BenchmarkId::new("fourier", num_coeffs),
            &coeffs,
            |b, coeffs| b.iter(|| evaluate_fourier(black_box(coeffs), black_box(0.35))),
        );
    }
    group.finish();
}

fn bench_transform_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("TransformPoints");

    let rotation = euler_to_rot(&Point3::new(0.1, 0.2, 0.3));
    let translation = Point3::new(0.0, 0.0, 3.0);

    for num_points in [1000, 10000, 100000].iter() {
        group.throughput(criterion::Throughput::Elements(*num_points as u64));

        let points = (0..*num_points)
            .map(|i| Point3::new(i as f64, 0.5 * i as f64, 1.0))
            .collect::<Vec<_>>();

        group.bench_with_input(
            BenchmarkId::new("serial", num_points),
            &points,
            |b, points| {
                b.iter(|| {
                    black_box(
                        points
                            .iter()
                            .map(|p| rotation * *p + translation)
                            .collect::<Vec<_>>(),
                    )
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("rayon", num_points),
            &points,
            |b, points| {
                b.iter(|| {
                    black_box(transform_points(
                        black_box(&rotation),
                        black_box(&translation),
                        black_box(points),
                    ))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_series, bench_transform_points);
criterion_main!(benches);
