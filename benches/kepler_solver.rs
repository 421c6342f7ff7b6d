use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use glam::DVec3;
use kepler_orbits::{solve_kepler_equation, Orbit};
use std::hint::black_box;

const POLL_ITERS: u64 = 1024;
const MULTIPLIER: f64 = std::f64::consts::TAU / POLL_ITERS as f64;

#[inline(always)]
fn poll_solver(eccentricity: f64) {
    for i in 0..POLL_ITERS {
        let mean_anomaly = i as f64 * MULTIPLIER;
        black_box(solve_kepler_equation(
            black_box(mean_anomaly),
            black_box(eccentricity),
        ));
    }
}

#[inline(always)]
fn poll_position(orbit: &Orbit) {
    let period = orbit.get_period().unwrap();
    let step = period / POLL_ITERS as f64;
    for i in 0..POLL_ITERS {
        let time = i as f64 * step;
        black_box(orbit.get_position_at_time(black_box(time)).unwrap());
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let circular = Orbit::from_state_vectors(
        DVec3::new(100.0, 0.0, 0.0),
        DVec3::new(0.0, (1000.0_f64 / 100.0).sqrt(), 0.0),
        1000.0,
        1.0,
    )
    .unwrap();
    let elliptic = Orbit::from_state_vectors(
        DVec3::new(100.0, 0.0, 0.0),
        DVec3::new(0.0, 4.0, 0.0),
        1000.0,
        1.0,
    )
    .unwrap();

    let mut group = c.benchmark_group("kepler_solver");
    group.throughput(Throughput::Elements(POLL_ITERS));

    group.bench_function("e = 0.0", |b| b.iter(|| poll_solver(black_box(0.0))));
    group.bench_function("e = 0.6", |b| b.iter(|| poll_solver(black_box(0.6))));
    group.bench_function("e = 0.95", |b| b.iter(|| poll_solver(black_box(0.95))));

    group.finish();

    let mut group = c.benchmark_group("position@time");
    group.throughput(Throughput::Elements(POLL_ITERS));

    group.bench_function("circular", |b| b.iter(|| poll_position(black_box(&circular))));
    group.bench_function("elliptic", |b| b.iter(|| poll_position(black_box(&elliptic))));

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
