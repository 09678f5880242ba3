use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use trefoil::geometry::{
    build_tube, sample_trefoil, ClosedCatmullRom, ParticleCloud, CURVE_SAMPLES,
    PARTICLE_COUNT, RADIAL_SEGMENTS, TUBE_RADIUS, TUBULAR_SEGMENTS,
};

/// Benchmark: trefoil sampling plus spline construction
fn bench_curve_sampling(c: &mut Criterion) {
    c.bench_function("sample_trefoil", |b| {
        b.iter(|| black_box(sample_trefoil(black_box(CURVE_SAMPLES))))
    });
}

/// Benchmark: full tube sweep at the shipping segment counts
fn bench_tube_sweep(c: &mut Criterion) {
    let path = ClosedCatmullRom::new(sample_trefoil(CURVE_SAMPLES));

    c.bench_function("build_tube", |b| {
        b.iter(|| {
            black_box(build_tube(
                black_box(&path),
                TUBULAR_SEGMENTS,
                TUBE_RADIUS,
                RADIAL_SEGMENTS,
            ))
        })
    });
}

/// Benchmark: particle generation at several cloud sizes
fn bench_particle_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_generation");

    for count in [1_000, PARTICLE_COUNT, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(ParticleCloud::generate(black_box(count), &mut rng)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_curve_sampling,
    bench_tube_sweep,
    bench_particle_generation
);
criterion_main!(benches);
