//! Shared fixtures for integration tests.

#![allow(dead_code)]

use unitrack::{Navigator, SensePolicy, UnitInput, UnitOptions, UnitParams};
use unitrack_csg::LogicNotation;
use unitrack_math::{Point3, Vec3};

/// Unit sphere inside the box `[-2, 2]³`.
pub const SPHERE_IN_BOX: &str = r#"{
    "label": "sphere in box",
    "surfaces": [
        {"type": "plane_aligned", "axis": "x", "position": -2.0},
        {"type": "plane_aligned", "axis": "x", "position": 2.0},
        {"type": "plane_aligned", "axis": "y", "position": -2.0},
        {"type": "plane_aligned", "axis": "y", "position": 2.0},
        {"type": "plane_aligned", "axis": "z", "position": -2.0},
        {"type": "plane_aligned", "axis": "z", "position": 2.0},
        {"type": "sphere_centered", "radius": 1.0}
    ],
    "volumes": [
        {"label": "world", "faces": [0, 1, 2, 3, 4, 5],
         "logic": "0 1 ~ & 2 & 3 ~ & 4 & 5 ~ & ~", "flags": ["internal_surfaces"]},
        {"label": "box", "faces": [0, 1, 2, 3, 4, 5, 6],
         "logic": "0 1 ~ & 2 & 3 ~ & 4 & 5 ~ & 6 &",
         "bbox": {"lower": [-2, -2, -2], "upper": [2, 2, 2]}},
        {"label": "sphere", "faces": [6], "logic": "0 ~",
         "bbox": {"lower": [-1, -1, -1], "upper": [1, 1, 1]}}
    ]
}"#;

/// The same geometry with infix logic.
pub const SPHERE_IN_BOX_INFIX: &str = r#"{
    "label": "sphere in box",
    "logic_notation": "infix",
    "surfaces": [
        {"type": "plane_aligned", "axis": "x", "position": -2.0},
        {"type": "plane_aligned", "axis": "x", "position": 2.0},
        {"type": "plane_aligned", "axis": "y", "position": -2.0},
        {"type": "plane_aligned", "axis": "y", "position": 2.0},
        {"type": "plane_aligned", "axis": "z", "position": -2.0},
        {"type": "plane_aligned", "axis": "z", "position": 2.0},
        {"type": "sphere_centered", "radius": 1.0}
    ],
    "volumes": [
        {"label": "world", "faces": [0, 1, 2, 3, 4, 5],
         "logic": "~(0 & ~1 & 2 & ~3 & 4 & ~5)", "flags": ["internal_surfaces"]},
        {"label": "box", "faces": [0, 1, 2, 3, 4, 5, 6],
         "logic": "0 & ~1 & 2 & ~3 & 4 & ~5 & 6",
         "bbox": {"lower": [-2, -2, -2], "upper": [2, 2, 2]}},
        {"label": "sphere", "faces": [6], "logic": "~0",
         "bbox": {"lower": [-1, -1, -1], "upper": [1, 1, 1]}}
    ]
}"#;

/// Concentric spheres of radius 1, 2 and 3 in an implicit background.
pub const NESTED_SPHERES: &str = r#"{
    "label": "nested spheres",
    "surfaces": [
        {"type": "sphere_centered", "radius": 1.0},
        {"type": "sphere_centered", "radius": 2.0},
        {"type": "sphere_centered", "radius": 3.0}
    ],
    "volumes": [
        {"label": "background", "logic": "* ~", "flags": ["implicit_vol"]},
        {"label": "core", "faces": [0], "logic": "0 ~",
         "bbox": {"lower": [-1, -1, -1], "upper": [1, 1, 1]}},
        {"label": "mantle", "faces": [0, 1], "logic": "0 1 ~ &",
         "bbox": {"lower": [-2, -2, -2], "upper": [2, 2, 2]}},
        {"label": "crust", "faces": [1, 2], "logic": "0 1 ~ &",
         "bbox": {"lower": [-3, -3, -3], "upper": [3, 3, 3]}}
    ],
    "background": 0
}"#;

/// Circular torus of major radius 2 and tube radius 0.5.
pub const TORUS: &str = r#"{
    "label": "torus",
    "surfaces": [
        {"type": "toroid", "origin": [0, 0, 0], "major_radius": 2.0, "a": 0.5, "b": 0.5}
    ],
    "volumes": [
        {"label": "outside", "faces": [0], "logic": "0"},
        {"label": "tube", "faces": [0], "logic": "0 ~",
         "bbox": {"lower": [-2.5, -2.5, -0.5], "upper": [2.5, 2.5, 0.5]}}
    ]
}"#;

/// Two overlapping spheres whose union has internal surfaces.
pub const OVERLAPPING_SPHERES: &str = r#"{
    "label": "overlapping spheres",
    "surfaces": [
        {"type": "sphere", "origin": [-0.5, 0, 0], "radius": 1.0},
        {"type": "sphere", "origin": [0.5, 0, 0], "radius": 1.0},
        {"type": "plane_aligned", "axis": "z", "position": 0.25}
    ],
    "volumes": [
        {"label": "exterior", "faces": [0, 1], "logic": "0 1 &",
         "flags": ["internal_surfaces"]},
        {"label": "upper", "faces": [0, 1, 2], "logic": "0 ~ 1 ~ | 2 &",
         "bbox": {"lower": [-1.5, -1, 0.25], "upper": [1.5, 1, 1]},
         "flags": ["internal_surfaces"]},
        {"label": "lower", "faces": [0, 1, 2], "logic": "0 ~ 1 ~ | 2 ~ &",
         "bbox": {"lower": [-1.5, -1, -1], "upper": [1.5, 1, 0.25]},
         "flags": ["internal_surfaces"]}
    ]
}"#;

/// Parse and build a unit, panicking on invalid input.
pub fn load(json: &str, options: &UnitOptions) -> UnitParams {
    let input = UnitInput::from_json(json).expect("fixture should parse");
    UnitParams::from_input(&input, options).expect("fixture should be valid")
}

/// Every combination of sense policy and tracking notation.
pub fn all_options() -> Vec<UnitOptions> {
    [SensePolicy::Eager, SensePolicy::Lazy, SensePolicy::CachedLazy]
        .into_iter()
        .flat_map(|sense_policy| {
            [LogicNotation::Postfix, LogicNotation::Infix]
                .into_iter()
                .map(move |logic_notation| UnitOptions {
                    sense_policy,
                    logic_notation,
                    ..Default::default()
                })
        })
        .collect()
}

/// One boundary crossing of a walk.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossing {
    pub distance: f64,
    pub surface: u32,
    pub entered: Option<String>,
}

/// Walk a ray from a starting point until no boundary remains.
pub fn walk(params: &UnitParams, pos: Point3, dir: Vec3) -> Vec<Crossing> {
    let mut nav = Navigator::new(params);
    nav.initialize(pos, dir);
    assert!(!nav.is_outside(), "walk starts outside every volume");

    let mut crossings = Vec::new();
    loop {
        let step = nav.find_next_step();
        if !step.boundary {
            break;
        }
        nav.move_to_boundary();
        let surface = nav.surface().expect("on a boundary").id.get();
        nav.cross_boundary();
        crossings.push(Crossing {
            distance: step.distance,
            surface,
            entered: nav.volume().map(|v| params.volume(v).label().to_string()),
        });
        assert!(crossings.len() < 100, "walk does not terminate");
    }
    crossings
}

/// Labels of the volumes entered by a walk.
pub fn entered(crossings: &[Crossing]) -> Vec<&str> {
    crossings
        .iter()
        .map(|c| c.entered.as_deref().unwrap_or("<none>"))
        .collect()
}
