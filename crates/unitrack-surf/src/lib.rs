#![warn(missing_docs)]

//! Implicit surfaces for CSG tracking.
//!
//! Every surface is the zero set of a function `f(x)`; the negative side is
//! "inside". Each type answers three questions for a point and direction:
//!
//! - which side of the surface the point is on ([`SurfaceFunction::calc_sense`])
//! - the positive distances to the surface along the ray
//!   ([`SurfaceFunction::calc_intersections`])
//! - the outward unit normal at a point on the surface
//!   ([`SurfaceFunction::calc_normal`])
//!
//! The [`Surface`] enum is the closed set of supported types, dispatched by
//! `match`.

mod cone;
mod cylinder;
mod plane;
mod quadric;
mod sense;
mod sphere;
mod toroid;

pub use cone::ConeAligned;
pub use cylinder::{CylAligned, CylCentered};
pub use plane::{Plane, PlaneAligned};
pub use quadric::{GeneralQuadric, SimpleQuadric};
pub use sense::{Sense, SignedSense, SurfaceState};
pub use sphere::{Sphere, SphereCentered};
pub use toroid::Toroid;

pub use unitrack_solve::NO_INTERSECTION;

use std::fmt;

use thiserror::Error;
use unitrack_math::{Point3, Vec3};

/// Errors from surface construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// A radius or semi-axis was zero, negative, or not finite.
    #[error("{what} must be positive and finite, got {value}")]
    NonPositive {
        /// Which parameter was invalid.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A plane normal was not unit length.
    #[error("plane normal ({0}, {1}, {2}) is not a unit vector")]
    NonUnitNormal(f64, f64, f64),
    /// The three points defining a plane are collinear.
    #[error("points defining a plane are collinear")]
    CollinearPoints,
    /// A quadric has no quadratic or linear terms.
    #[error("quadric has no nonconstant terms")]
    DegenerateQuadric,
    /// A coefficient or position was NaN or infinite.
    #[error("surface parameter {0} is not finite")]
    NonFinite(&'static str),
    /// The toroid cross-section reaches the axis of revolution.
    #[error("toroid minor radius {minor} must be smaller than major radius {major}")]
    SelfIntersectingToroid {
        /// Major radius.
        major: f64,
        /// Radial semi-axis of the cross-section.
        minor: f64,
    },
}

/// Result alias for surface construction.
pub type Result<T> = std::result::Result<T, SurfaceError>;

/// Queries shared by every surface type.
pub trait SurfaceFunction {
    /// Fixed-size distance array, padded with [`NO_INTERSECTION`].
    type Intersections: AsRef<[f64]> + Copy;

    /// Maximum number of intersections along one ray.
    const NUM_INTERSECTIONS: usize;

    /// Type tag.
    const KIND: SurfaceKind;

    /// Whether [`calc_safety`](Self::calc_safety) returns exact distances.
    const SIMPLE_SAFETY: bool;

    /// Value of the implicit function at a point.
    fn calc_value(&self, pos: &Point3) -> f64;

    /// Side of the surface the point is on.
    #[inline]
    fn calc_sense(&self, pos: &Point3) -> SignedSense {
        SignedSense::from_value(self.calc_value(pos))
    }

    /// Positive distances to the surface along a unit direction.
    ///
    /// Present distances come first; the remainder are [`NO_INTERSECTION`].
    fn calc_intersections(&self, pos: &Point3, dir: &Vec3, state: SurfaceState)
        -> Self::Intersections;

    /// Outward unit normal at a point on the surface.
    fn calc_normal(&self, pos: &Point3) -> Vec3;

    /// Exact distance from a point to the surface, if cheap to compute.
    fn calc_safety(&self, _pos: &Point3) -> Option<f64> {
        None
    }
}

/// Name of a surface type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Plane perpendicular to an axis.
    PlaneAligned,
    /// Cylinder along an axis through the origin.
    CylCentered,
    /// Sphere at the origin.
    SphereCentered,
    /// Cylinder parallel to an axis.
    CylAligned,
    /// General plane.
    Plane,
    /// Sphere with arbitrary center.
    Sphere,
    /// Double cone parallel to an axis.
    ConeAligned,
    /// Quadric without cross terms.
    SimpleQuadric,
    /// Quadric with cross terms.
    GeneralQuadric,
    /// Z-aligned torus with elliptical cross-section.
    Toroid,
}

impl SurfaceKind {
    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceKind::PlaneAligned => "plane_aligned",
            SurfaceKind::CylCentered => "cyl_centered",
            SurfaceKind::SphereCentered => "sphere_centered",
            SurfaceKind::CylAligned => "cyl_aligned",
            SurfaceKind::Plane => "plane",
            SurfaceKind::Sphere => "sphere",
            SurfaceKind::ConeAligned => "cone_aligned",
            SurfaceKind::SimpleQuadric => "simple_quadric",
            SurfaceKind::GeneralQuadric => "general_quadric",
            SurfaceKind::Toroid => "toroid",
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Largest intersection count of any surface type.
pub const MAX_INTERSECTIONS: usize = Toroid::NUM_INTERSECTIONS;

/// Any supported surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// See [`PlaneAligned`].
    PlaneAligned(PlaneAligned),
    /// See [`CylCentered`].
    CylCentered(CylCentered),
    /// See [`SphereCentered`].
    SphereCentered(SphereCentered),
    /// See [`CylAligned`].
    CylAligned(CylAligned),
    /// See [`Plane`].
    Plane(Plane),
    /// See [`Sphere`].
    Sphere(Sphere),
    /// See [`ConeAligned`].
    ConeAligned(ConeAligned),
    /// See [`SimpleQuadric`].
    SimpleQuadric(SimpleQuadric),
    /// See [`GeneralQuadric`].
    GeneralQuadric(GeneralQuadric),
    /// See [`Toroid`].
    Toroid(Toroid),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Surface::PlaneAligned($s) => $body,
            Surface::CylCentered($s) => $body,
            Surface::SphereCentered($s) => $body,
            Surface::CylAligned($s) => $body,
            Surface::Plane($s) => $body,
            Surface::Sphere($s) => $body,
            Surface::ConeAligned($s) => $body,
            Surface::SimpleQuadric($s) => $body,
            Surface::GeneralQuadric($s) => $body,
            Surface::Toroid($s) => $body,
        }
    };
}

/// Copy a surface's intersections into a full-width array.
#[inline]
fn widen<I: AsRef<[f64]>>(isect: I) -> [f64; MAX_INTERSECTIONS] {
    let mut result = [NO_INTERSECTION; MAX_INTERSECTIONS];
    let isect = isect.as_ref();
    result[..isect.len()].copy_from_slice(isect);
    result
}

/// Count of a surface's intersections, for use in `dispatch!`.
#[inline]
fn num_intersections<S: SurfaceFunction>(_: &S) -> usize {
    S::NUM_INTERSECTIONS
}

/// Simple-safety flag of a surface, for use in `dispatch!`.
#[inline]
fn simple_safety<S: SurfaceFunction>(_: &S) -> bool {
    S::SIMPLE_SAFETY
}

/// Kind of a surface, for use in `dispatch!`.
#[inline]
fn kind<S: SurfaceFunction>(_: &S) -> SurfaceKind {
    S::KIND
}

impl Surface {
    /// Type of this surface.
    pub fn kind(&self) -> SurfaceKind {
        dispatch!(self, s => kind(s))
    }

    /// Maximum number of intersections along one ray.
    pub fn num_intersections(&self) -> usize {
        dispatch!(self, s => num_intersections(s))
    }

    /// Whether [`safety`](Self::safety) is exact for this type.
    pub fn simple_safety(&self) -> bool {
        dispatch!(self, s => simple_safety(s))
    }

    /// Value of the implicit function.
    pub fn value(&self, pos: &Point3) -> f64 {
        dispatch!(self, s => s.calc_value(pos))
    }

    /// Side of the surface the point is on.
    #[inline]
    pub fn sense(&self, pos: &Point3) -> SignedSense {
        dispatch!(self, s => s.calc_sense(pos))
    }

    /// Positive distances along the ray.
    ///
    /// Only the first [`num_intersections`](Self::num_intersections)
    /// entries can be finite.
    #[inline]
    pub fn intersections(
        &self,
        pos: &Point3,
        dir: &Vec3,
        state: SurfaceState,
    ) -> [f64; MAX_INTERSECTIONS] {
        dispatch!(self, s => widen(s.calc_intersections(pos, dir, state)))
    }

    /// Outward unit normal.
    pub fn normal(&self, pos: &Point3) -> Vec3 {
        dispatch!(self, s => s.calc_normal(pos))
    }

    /// Exact distance to the surface, if this type supports it.
    pub fn safety(&self, pos: &Point3) -> Option<f64> {
        dispatch!(self, s => s.calc_safety(pos))
    }
}

macro_rules! impl_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Surface {
                fn from(s: $variant) -> Self {
                    Surface::$variant(s)
                }
            }
        )*
    };
}

impl_from!(
    PlaneAligned,
    CylCentered,
    SphereCentered,
    CylAligned,
    Plane,
    Sphere,
    ConeAligned,
    SimpleQuadric,
    GeneralQuadric,
    Toroid,
);

/// Check that a value is finite, naming it in the error.
pub(crate) fn require_finite(value: f64, what: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SurfaceError::NonFinite(what))
    }
}

/// Check that a length is positive and finite, naming it in the error.
pub(crate) fn require_positive(value: f64, what: &'static str) -> Result<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(SurfaceError::NonPositive { what, value })
    }
}

/// Check that every component of a point or vector is finite.
pub(crate) fn require_finite_vec(v: &Vec3, what: &'static str) -> Result<()> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(SurfaceError::NonFinite(what))
    }
}
