//! Sense policies and logic notations must track identically.

mod common;

use common::{load, OVERLAPPING_SPHERES, SPHERE_IN_BOX, TORUS};
use unitrack::{Intersection, LocalState, SimpleUnitTracker, TrackScratch, UnitOptions, UnitParams};
use unitrack_math::{LocalVolumeId, Point3, Vec3};

/// Coordinates chosen to avoid every surface in the fixtures.
const COORDS: [f64; 7] = [-2.55, -1.45, -0.35, 0.15, 0.75, 1.85, 2.65];

fn directions() -> Vec<Vec3> {
    vec![
        Vec3::x(),
        -Vec3::y(),
        Vec3::new(1.0, 0.3, -0.2).normalize(),
        Vec3::new(-0.4, 0.1, 0.9).normalize(),
    ]
}

/// Location and first boundary for every grid point and direction.
fn survey(params: &UnitParams) -> Vec<(Option<LocalVolumeId>, Option<Intersection>)> {
    let tracker = SimpleUnitTracker::new(params);
    let mut scratch = TrackScratch::new(params);
    let mut results = Vec::new();

    for &x in &COORDS {
        for &y in &COORDS {
            for &z in &COORDS {
                for dir in directions() {
                    let mut state = LocalState::new(Point3::new(x, y, z), dir);
                    state.volume = tracker.initialize(&state, &mut scratch).volume;
                    let next = state.volume.map(|_| tracker.intersect(&state, &mut scratch));
                    results.push((state.volume, next));
                }
            }
        }
    }
    results
}

fn check_equivalent(json: &str) {
    let baseline = survey(&load(json, &UnitOptions::default()));
    assert!(baseline.iter().all(|(vol, _)| vol.is_some()));

    for options in common::all_options() {
        let results = survey(&load(json, &options));
        assert_eq!(results.len(), baseline.len());
        for (i, (actual, expected)) in results.iter().zip(&baseline).enumerate() {
            assert_eq!(actual, expected, "{options:?}, sample {i}");
        }
    }
}

#[test]
fn sphere_in_box_policies_agree() {
    check_equivalent(SPHERE_IN_BOX);
}

#[test]
fn overlapping_spheres_policies_agree() {
    check_equivalent(OVERLAPPING_SPHERES);
}

#[test]
fn torus_policies_agree() {
    check_equivalent(TORUS);
}

#[test]
fn leaf_size_does_not_matter() {
    let baseline = survey(&load(SPHERE_IN_BOX, &UnitOptions::default()));
    let options = UnitOptions {
        max_leaf_size: 1,
        ..Default::default()
    };
    assert_eq!(survey(&load(SPHERE_IN_BOX, &options)), baseline);
}
