//! End-to-end walks through small units.

mod common;

use approx::assert_relative_eq;
use common::{entered, load, walk, NESTED_SPHERES, SPHERE_IN_BOX, SPHERE_IN_BOX_INFIX, TORUS};
use unitrack::{Navigator, UnitOptions};
use unitrack_math::{Point3, Vec3};

#[test]
fn sphere_in_box_crossings() {
    for json in [SPHERE_IN_BOX, SPHERE_IN_BOX_INFIX] {
        for options in common::all_options() {
            let params = load(json, &options);
            let mut nav = Navigator::new(&params);
            nav.initialize(Point3::origin(), Vec3::x());
            assert_eq!(params.volume(nav.volume().unwrap()).label(), "sphere");

            let step = nav.find_next_step();
            assert!(step.boundary);
            assert_eq!(step.distance, 1.0);
            nav.move_to_boundary();
            assert_relative_eq!(nav.normal(), Vec3::new(1.0, 0.0, 0.0));
            nav.cross_boundary();
            assert_eq!(params.volume(nav.volume().unwrap()).label(), "box");

            // The sphere just crossed is not found again at zero distance
            let step = nav.find_next_step();
            assert!(step.boundary, "{options:?}");
            assert_eq!(step.distance, 1.0);
            nav.move_to_boundary();
            assert_eq!(nav.surface().unwrap().id.get(), 1);
            assert_relative_eq!(nav.normal(), Vec3::new(1.0, 0.0, 0.0));
            nav.cross_boundary();
            assert_eq!(params.volume(nav.volume().unwrap()).label(), "world");

            assert!(!nav.find_next_step().boundary);
        }
    }
}

#[test]
fn sphere_in_box_inward() {
    let params = load(SPHERE_IN_BOX, &UnitOptions::default());
    let crossings = walk(&params, Point3::new(-6.0, 0.5, 0.0), Vec3::x());
    assert_eq!(entered(&crossings), ["box", "sphere", "box", "world"]);

    let half_chord = 0.75_f64.sqrt();
    let expected = [4.0, 2.0 - half_chord, 2.0 * half_chord, 2.0 - half_chord];
    for (c, e) in crossings.iter().zip(expected) {
        assert_relative_eq!(c.distance, e, epsilon = 1e-12);
    }
    assert_eq!(crossings[0].surface, 0);
    assert_eq!(crossings[3].surface, 1);
}

#[test]
fn nested_spheres_walk() {
    for options in common::all_options() {
        let params = load(NESTED_SPHERES, &options);
        let crossings = walk(&params, Point3::new(-5.0, 0.0, 0.0), Vec3::x());
        assert_eq!(
            entered(&crossings),
            ["crust", "mantle", "core", "mantle", "crust", "background"],
            "{options:?}"
        );
        let distances: Vec<f64> = crossings.iter().map(|c| c.distance).collect();
        assert_eq!(distances, [2.0, 1.0, 1.0, 2.0, 1.0, 1.0]);
        let surfaces: Vec<u32> = crossings.iter().map(|c| c.surface).collect();
        assert_eq!(surfaces, [2, 1, 0, 0, 1, 2]);
    }
}

#[test]
fn nested_spheres_safety() {
    let params = load(NESTED_SPHERES, &UnitOptions::default());
    let mut nav = Navigator::new(&params);

    nav.initialize(Point3::new(0.0, 1.25, 0.0), Vec3::x());
    assert_eq!(params.volume(nav.volume().unwrap()).label(), "mantle");
    assert_relative_eq!(nav.safety(), 0.25);

    nav.initialize(Point3::new(0.0, 0.0, 2.9), Vec3::x());
    assert_eq!(params.volume(nav.volume().unwrap()).label(), "crust");
    assert_relative_eq!(nav.safety(), 0.1, epsilon = 1e-12);

    // Background never reports a safety distance
    nav.initialize(Point3::new(10.0, 0.0, 0.0), Vec3::x());
    assert_eq!(nav.volume(), params.background());
    assert_eq!(nav.safety(), 0.0);
}

#[test]
fn torus_crossings() {
    for options in common::all_options() {
        let params = load(TORUS, &options);
        let crossings = walk(&params, Point3::new(-5.0, 0.0, 0.0), Vec3::x());
        assert_eq!(
            entered(&crossings),
            ["tube", "outside", "tube", "outside"],
            "{options:?}"
        );
        for (c, e) in crossings.iter().zip([2.5, 1.0, 3.0, 1.0]) {
            assert_relative_eq!(c.distance, e, epsilon = 1e-8);
        }
    }
}

#[test]
fn torus_normal_and_safety() {
    let params = load(TORUS, &UnitOptions::default());
    let mut nav = Navigator::new(&params);
    nav.initialize(Point3::new(0.0, -5.0, 0.0), Vec3::y());
    assert_eq!(params.volume(nav.volume().unwrap()).label(), "outside");
    // Toroids have no exact safety distance
    assert_eq!(nav.safety(), 0.0);

    let step = nav.find_next_step();
    assert_relative_eq!(step.distance, 2.5, epsilon = 1e-8);
    nav.move_to_boundary();
    assert_relative_eq!(nav.normal(), Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-6);
    nav.cross_boundary();
    assert_eq!(params.volume(nav.volume().unwrap()).label(), "tube");
    assert_eq!(nav.safety(), 0.0);
}
