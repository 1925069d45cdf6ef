//! Triangulation construction benchmarks.
//!
//! Measures [`DelaunayTriangulation::new`] on seeded clouds so that runs are comparable:
//!
//! 1. uniform float points in a square canvas,
//! 2. integer lattice points, which hit the edge-split path often,
//! 3. the linear point locator on its own, which dominates large inputs.
//!
//! ```bash
//! cargo bench --bench triangulation_creation
//! ```

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use planar_delaunay::core::algorithms::locate::locate;
use planar_delaunay::geometry::util::{
    generate_random_integer_points_seeded, generate_random_points_seeded,
};
use planar_delaunay::prelude::{DelaunayTriangulation, Point};
use std::hint::black_box;

/// Point counts used by every group
const COUNTS: &[usize] = &[100, 500, 1_000];

const CANVAS: f64 = 1_000.0;

/// Fixed seed for reproducible clouds across runs
const SEED: u64 = 0x00de_1a00;

fn bench_float_clouds(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction_float");
    for &count in COUNTS {
        let points = generate_random_points_seeded(count, CANVAS, CANVAS, SEED)
            .unwrap_or_else(|err| panic!("point generation failed for {count} points: {err}"));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, points| {
            b.iter(|| {
                let dt = DelaunayTriangulation::new(black_box(points), CANVAS, CANVAS)
                    .unwrap_or_else(|err| panic!("construction failed: {err}"));
                black_box(dt.number_of_triangles())
            });
        });
    }
    group.finish();
}

fn bench_lattice_clouds(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction_lattice");
    for &count in COUNTS {
        let points = generate_random_integer_points_seeded(count, 100, 100, 10, SEED)
            .unwrap_or_else(|err| panic!("point generation failed for {count} points: {err}"));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, points| {
            b.iter(|| {
                let dt = DelaunayTriangulation::new(black_box(points), 100.0, 100.0)
                    .unwrap_or_else(|err| panic!("construction failed: {err}"));
                black_box(dt.number_of_triangles())
            });
        });
    }
    group.finish();
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");
    for &count in COUNTS {
        let points = generate_random_points_seeded(count, CANVAS, CANVAS, SEED)
            .unwrap_or_else(|err| panic!("point generation failed for {count} points: {err}"));
        let dt = DelaunayTriangulation::new(&points, CANVAS, CANVAS)
            .unwrap_or_else(|err| panic!("construction failed: {err}"));
        let centre = Point::new([CANVAS / 2.0, CANVAS / 2.0]);
        group.bench_with_input(BenchmarkId::from_parameter(count), &dt, |b, dt| {
            b.iter(|| black_box(locate(dt.tds(), black_box(&centre))));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_float_clouds,
    bench_lattice_clouds,
    bench_locate
);
criterion_main!(benches);
