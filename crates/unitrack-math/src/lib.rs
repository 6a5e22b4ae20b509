#![warn(missing_docs)]

//! Math types for the unitrack CSG tracker.
//!
//! Thin wrappers around nalgebra plus the tolerance, soft-comparison,
//! identifier and bounding-box types shared by the other crates.

mod bbox;
mod id;
mod tolerance;

pub use bbox::{inverse_direction, BBox};
pub use id::{FaceId, LocalSurfaceId, LocalVolumeId};
pub use tolerance::{SoftEqual, SoftZero, Tolerance, ToleranceError};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Cartesian axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// All axes in order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Array index of this axis.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two axes perpendicular to this one, in increasing order.
    #[inline]
    pub fn perpendicular(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    /// Unit vector along this axis.
    pub fn unit_vector(self) -> Vec3 {
        let mut v = Vec3::zeros();
        v[self.index()] = 1.0;
        v
    }

    /// Lowercase letter for this axis.
    pub fn as_char(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

/// Whether a vector has unit length within a loose tolerance.
pub fn is_soft_unit_vector(v: &Vec3) -> bool {
    SoftEqual::new(1e-8, 1e-10).eq(1.0, v.norm_squared())
}
