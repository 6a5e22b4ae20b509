//! Serializable description of a unit.
//!
//! ```json
//! {
//!   "label": "sphere in box",
//!   "surfaces": [
//!     {"type": "sphere_centered", "radius": 1.0},
//!     {"type": "plane_aligned", "axis": "x", "position": 2.0}
//!   ],
//!   "volumes": [
//!     {"label": "ball", "faces": [0], "logic": "0 ~",
//!      "bbox": {"lower": [-1, -1, -1], "upper": [1, 1, 1]}}
//!   ]
//! }
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};
use unitrack_csg::LogicNotation;
use unitrack_math::{Axis, BBox, Point3, Tolerance, Vec3};
use unitrack_surf::{
    ConeAligned, CylAligned, CylCentered, GeneralQuadric, Plane, PlaneAligned, SimpleQuadric,
    Sphere, SphereCentered, Surface, SurfaceError, Toroid,
};

use crate::Result;

/// Surface coefficients, tagged by surface type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceInput {
    /// Plane normal to an axis.
    PlaneAligned {
        /// Normal axis.
        axis: Axis,
        /// Intercept on that axis.
        position: f64,
    },
    /// Plane `n·x = d`.
    Plane {
        /// Unit normal.
        normal: [f64; 3],
        /// Signed distance from the origin.
        displacement: f64,
    },
    /// Cylinder along an axis through the origin.
    CylCentered {
        /// Cylinder axis.
        axis: Axis,
        /// Radius.
        radius: f64,
    },
    /// Cylinder parallel to an axis.
    CylAligned {
        /// Cylinder axis.
        axis: Axis,
        /// Any point on the axis line.
        origin: [f64; 3],
        /// Radius.
        radius: f64,
    },
    /// Sphere at the origin.
    SphereCentered {
        /// Radius.
        radius: f64,
    },
    /// Sphere anywhere.
    Sphere {
        /// Center.
        origin: [f64; 3],
        /// Radius.
        radius: f64,
    },
    /// Double cone parallel to an axis.
    ConeAligned {
        /// Cone axis.
        axis: Axis,
        /// Apex.
        origin: [f64; 3],
        /// Tangent of the half-opening angle.
        tangent: f64,
    },
    /// `ax² + by² + cz² + dx + ey + fz + g`.
    SimpleQuadric {
        /// Second-order coefficients.
        abc: [f64; 3],
        /// First-order coefficients.
        def: [f64; 3],
        /// Constant.
        g: f64,
    },
    /// Quadric with cross terms `xy`, `yz`, `zx`.
    GeneralQuadric {
        /// Second-order coefficients.
        abc: [f64; 3],
        /// Cross-term coefficients.
        def: [f64; 3],
        /// First-order coefficients.
        ghi: [f64; 3],
        /// Constant.
        j: f64,
    },
    /// Z-aligned torus with an elliptical cross-section.
    Toroid {
        /// Center.
        origin: [f64; 3],
        /// Distance from the center to the cross-section center.
        major_radius: f64,
        /// Radial semi-axis of the cross-section.
        a: f64,
        /// Axial semi-axis of the cross-section.
        b: f64,
    },
}

fn point(v: &[f64; 3]) -> Point3 {
    Point3::new(v[0], v[1], v[2])
}

fn vector(v: &[f64; 3]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

impl TryFrom<&SurfaceInput> for Surface {
    type Error = SurfaceError;

    fn try_from(input: &SurfaceInput) -> std::result::Result<Self, SurfaceError> {
        Ok(match input {
            SurfaceInput::PlaneAligned { axis, position } => {
                PlaneAligned::new(*axis, *position)?.into()
            }
            SurfaceInput::Plane {
                normal,
                displacement,
            } => Plane::new(vector(normal), *displacement)?.into(),
            SurfaceInput::CylCentered { axis, radius } => CylCentered::new(*axis, *radius)?.into(),
            SurfaceInput::CylAligned {
                axis,
                origin,
                radius,
            } => CylAligned::new(*axis, point(origin), *radius)?.into(),
            SurfaceInput::SphereCentered { radius } => SphereCentered::new(*radius)?.into(),
            SurfaceInput::Sphere { origin, radius } => Sphere::new(point(origin), *radius)?.into(),
            SurfaceInput::ConeAligned {
                axis,
                origin,
                tangent,
            } => ConeAligned::new(*axis, point(origin), *tangent)?.into(),
            SurfaceInput::SimpleQuadric { abc, def, g } => {
                SimpleQuadric::new(vector(abc), vector(def), *g)?.into()
            }
            SurfaceInput::GeneralQuadric { abc, def, ghi, j } => {
                GeneralQuadric::new(vector(abc), vector(def), vector(ghi), *j)?.into()
            }
            SurfaceInput::Toroid {
                origin,
                major_radius,
                a,
                b,
            } => Toroid::new(point(origin), *major_radius, *a, *b)?.into(),
        })
    }
}

/// Property of a volume that changes how it is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeFlag {
    /// Crossing a face may leave the track inside the volume.
    InternalSurfaces,
    /// Claims whatever no other volume does; has no faces of its own.
    ImplicitVol,
}

/// Finite axis-aligned extent of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBoxInput {
    /// Lower corner.
    pub lower: [f64; 3],
    /// Upper corner.
    pub upper: [f64; 3],
}

impl From<&BBoxInput> for BBox {
    fn from(input: &BBoxInput) -> Self {
        BBox::new(point(&input.lower), point(&input.upper))
    }
}

/// One volume: sorted surface ids and logic over their positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VolumeInput {
    /// Name used in diagnostics.
    #[serde(default)]
    pub label: String,
    /// Surfaces bounding the volume, strictly increasing.
    #[serde(default)]
    pub faces: Vec<u32>,
    /// Logic text whose operands index `faces`.
    pub logic: String,
    /// Extent; unbounded if absent.
    #[serde(default)]
    pub bbox: Option<BBoxInput>,
    /// Tracking flags.
    #[serde(default)]
    pub flags: Vec<VolumeFlag>,
}

impl VolumeInput {
    /// Whether the flag is present.
    pub fn has_flag(&self, flag: VolumeFlag) -> bool {
        self.flags.contains(&flag)
    }
}

/// Full description of a single universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitInput {
    /// Name used in diagnostics.
    #[serde(default)]
    pub label: String,
    /// Comparison tolerance; a default is used if absent.
    #[serde(default)]
    pub tol: Option<Tolerance>,
    /// Notation of every volume's logic text.
    #[serde(default)]
    pub logic_notation: LogicNotation,
    /// All surfaces, indexed by surface id.
    pub surfaces: Vec<SurfaceInput>,
    /// All volumes, indexed by volume id.
    pub volumes: Vec<VolumeInput>,
    /// Implicit volume that claims unenclosed points.
    #[serde(default)]
    pub background: Option<u32>,
}

impl UnitInput {
    /// Parse from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse from a JSON stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialize as indented JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
