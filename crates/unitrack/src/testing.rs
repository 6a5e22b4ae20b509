//! Small units shared by the unit tests.

use crate::input::UnitInput;

/// Unit sphere in the box `[-2, 2]³`, with the exterior as volume 0.
///
/// Surfaces 0-5 are the box planes (-x, +x, -y, +y, -z, +z) and surface 6
/// is the sphere.
pub fn sphere_in_box() -> UnitInput {
    parse(
        r#"{
        "label": "sphere in box",
        "surfaces": [
            {"type": "plane_aligned", "axis": "x", "position": -2},
            {"type": "plane_aligned", "axis": "x", "position": 2},
            {"type": "plane_aligned", "axis": "y", "position": -2},
            {"type": "plane_aligned", "axis": "y", "position": 2},
            {"type": "plane_aligned", "axis": "z", "position": -2},
            {"type": "plane_aligned", "axis": "z", "position": 2},
            {"type": "sphere_centered", "radius": 1}
        ],
        "volumes": [
            {"label": "exterior", "faces": [0, 1, 2, 3, 4, 5],
             "logic": "0 1 ~ & 2 & 3 ~ & 4 & 5 ~ & ~",
             "flags": ["internal_surfaces"]},
            {"label": "shell", "faces": [0, 1, 2, 3, 4, 5, 6],
             "logic": "0 1 ~ & 2 & 3 ~ & 4 & 5 ~ & 6 &",
             "bbox": {"lower": [-2, -2, -2], "upper": [2, 2, 2]}},
            {"label": "ball", "faces": [6], "logic": "0 ~",
             "bbox": {"lower": [-1, -1, -1], "upper": [1, 1, 1]}}
        ]
    }"#,
    )
}

/// Two unit spheres at x = ±2 in an implicit background (volume 0).
pub fn two_spheres() -> UnitInput {
    parse(
        r#"{
        "label": "two spheres",
        "surfaces": [
            {"type": "sphere", "origin": [-2, 0, 0], "radius": 1},
            {"type": "sphere", "origin": [2, 0, 0], "radius": 1}
        ],
        "volumes": [
            {"label": "background", "logic": "* ~", "flags": ["implicit_vol"]},
            {"label": "left", "faces": [0], "logic": "0 ~",
             "bbox": {"lower": [-3, -1, -1], "upper": [-1, 1, 1]}},
            {"label": "right", "faces": [1], "logic": "0 ~",
             "bbox": {"lower": [1, -1, -1], "upper": [3, 1, 1]}}
        ],
        "background": 0
    }"#,
    )
}

/// Union of two overlapping unit spheres at x = ±0.5, so the union volume
/// has an internal surface.
pub fn overlapping_spheres() -> UnitInput {
    parse(
        r#"{
        "label": "overlapping spheres",
        "surfaces": [
            {"type": "sphere", "origin": [-0.5, 0, 0], "radius": 1},
            {"type": "sphere", "origin": [0.5, 0, 0], "radius": 1}
        ],
        "volumes": [
            {"label": "exterior", "faces": [0, 1], "logic": "0 1 &",
             "flags": ["internal_surfaces"]},
            {"label": "union", "faces": [0, 1], "logic": "0 ~ 1 ~ |",
             "bbox": {"lower": [-1.5, -1, -1], "upper": [1.5, 1, 1]},
             "flags": ["internal_surfaces"]}
        ]
    }"#,
    )
}

fn parse(json: &str) -> UnitInput {
    UnitInput::from_json(json).expect("test unit should parse")
}
