//! Benchmarks for tracker queries.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use unitrack::{
    BBoxInput, LocalState, SensePolicy, SimpleUnitTracker, SurfaceInput, TrackScratch, UnitInput,
    UnitOptions, UnitParams, VolumeFlag, VolumeInput,
};
use unitrack_math::{Point3, Vec3};

/// Background holding an `n`³ lattice of unit-spaced spheres.
fn sphere_lattice(n: usize) -> UnitInput {
    let mut surfaces = Vec::new();
    let mut volumes = vec![VolumeInput {
        label: "background".into(),
        faces: Vec::new(),
        logic: "* ~".into(),
        bbox: None,
        flags: vec![VolumeFlag::ImplicitVol],
    }];

    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let center = [i as f64, j as f64, k as f64];
                surfaces.push(SurfaceInput::Sphere {
                    origin: center,
                    radius: 0.4,
                });
                volumes.push(VolumeInput {
                    label: format!("ball {i} {j} {k}"),
                    faces: vec![surfaces.len() as u32 - 1],
                    logic: "0 ~".into(),
                    bbox: Some(BBoxInput {
                        lower: center.map(|c| c - 0.4),
                        upper: center.map(|c| c + 0.4),
                    }),
                    flags: Vec::new(),
                });
            }
        }
    }

    UnitInput {
        label: format!("{n}^3 lattice"),
        tol: None,
        logic_notation: Default::default(),
        surfaces,
        volumes,
        background: Some(0),
    }
}

fn lattice_params(n: usize, sense_policy: SensePolicy) -> UnitParams {
    let options = UnitOptions {
        sense_policy,
        ..Default::default()
    };
    UnitParams::from_input(&sphere_lattice(n), &options).unwrap()
}

fn bench_initialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("initialize");
    for n in [2, 8, 16] {
        let params = lattice_params(n, SensePolicy::default());
        let tracker = SimpleUnitTracker::new(&params);
        let mut scratch = TrackScratch::new(&params);
        // Between spheres, so every candidate box is rejected
        let state = LocalState::new(Point3::new(0.5, 0.5, 0.5), Vec3::x());

        group.bench_with_input(BenchmarkId::from_parameter(n), &state, |b, state| {
            b.iter(|| tracker.initialize(black_box(state), &mut scratch))
        });
    }
    group.finish();
}

fn bench_background_intersect(c: &mut Criterion) {
    let mut group = c.benchmark_group("background_intersect");
    for n in [2, 8, 16] {
        let params = lattice_params(n, SensePolicy::default());
        let tracker = SimpleUnitTracker::new(&params);
        let mut scratch = TrackScratch::new(&params);
        let mut state = LocalState::new(
            Point3::new(-1.0, 0.3, 0.2),
            Vec3::new(1.0, 0.05, 0.02).normalize(),
        );
        state.volume = params.background();

        group.bench_with_input(BenchmarkId::from_parameter(n), &state, |b, state| {
            b.iter(|| tracker.intersect(black_box(state), &mut scratch))
        });
    }
    group.finish();
}

fn bench_sense_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("sense_policy");
    for policy in [SensePolicy::Eager, SensePolicy::Lazy, SensePolicy::CachedLazy] {
        let params = lattice_params(8, policy);
        let tracker = SimpleUnitTracker::new(&params);
        let mut scratch = TrackScratch::new(&params);
        let state = LocalState::new(Point3::new(3.1, 4.2, 5.0), Vec3::z());

        group.bench_function(policy.to_string(), |b| {
            b.iter(|| tracker.initialize(black_box(&state), &mut scratch))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_initialize,
    bench_background_intersect,
    bench_sense_policy
);
criterion_main!(benches);
