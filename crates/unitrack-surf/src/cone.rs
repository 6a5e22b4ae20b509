//! Double cone parallel to a coordinate axis.

use unitrack_math::{Axis, Point3, Vec3};
use unitrack_solve::QuadraticSolver;

use crate::{
    require_finite_vec, require_positive, Result, SurfaceFunction, SurfaceKind, SurfaceState,
};

/// Cone with apex at `origin`: `(u-u0)² + (v-v0)² - t²(w-w0)²`.
///
/// `t` is the tangent of the half-opening angle; `w` is the coordinate
/// along the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeAligned {
    axis: Axis,
    origin: Point3,
    tsq: f64,
}

impl ConeAligned {
    /// Construct from an axis, apex and the tangent of the half-angle.
    pub fn new(axis: Axis, origin: Point3, tangent: f64) -> Result<Self> {
        require_finite_vec(&origin.coords, "origin")?;
        let tangent = require_positive(tangent, "tangent")?;
        Ok(Self {
            axis,
            origin,
            tsq: tangent * tangent,
        })
    }

    /// Axis of revolution.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Apex.
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Square of the half-angle tangent.
    pub fn tangent_sq(&self) -> f64 {
        self.tsq
    }

    /// Rotate `x` so that the axis component is last.
    #[inline]
    fn to_uvw(&self, x: &Vec3) -> Vec3 {
        let (u, v) = self.axis.perpendicular();
        Vec3::new(x[u.index()], x[v.index()], x[self.axis.index()])
    }
}

impl SurfaceFunction for ConeAligned {
    type Intersections = [f64; 2];
    const NUM_INTERSECTIONS: usize = 2;
    const KIND: SurfaceKind = SurfaceKind::ConeAligned;
    const SIMPLE_SAFETY: bool = false;

    fn calc_value(&self, pos: &Point3) -> f64 {
        let x = self.to_uvw(&(pos - self.origin));
        x.x * x.x + x.y * x.y - self.tsq * x.z * x.z
    }

    fn calc_intersections(&self, pos: &Point3, dir: &Vec3, state: SurfaceState) -> [f64; 2] {
        let x = self.to_uvw(&(pos - self.origin));
        let d = self.to_uvw(dir);

        let a = 1.0 - (1.0 + self.tsq) * d.z * d.z;
        let half_b = x.x * d.x + x.y * d.y - self.tsq * x.z * d.z;
        let c = x.x * x.x + x.y * x.y - self.tsq * x.z * x.z;
        QuadraticSolver::solve_general(a, half_b, c, state.is_on())
    }

    fn calc_normal(&self, pos: &Point3) -> Vec3 {
        let x = self.to_uvw(&(pos - self.origin));
        let (u, v) = self.axis.perpendicular();
        let mut n = Vec3::zeros();
        n[u.index()] = x.x;
        n[v.index()] = x.y;
        n[self.axis.index()] = -self.tsq * x.z;
        n.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SignedSense, NO_INTERSECTION};
    use approx::assert_relative_eq;

    #[test]
    fn test_both_nappes() {
        // 45 degree cone along y with apex at the origin
        let cone = ConeAligned::new(Axis::Y, Point3::origin(), 1.0).unwrap();
        assert_eq!(cone.calc_sense(&Point3::new(0.0, 2.0, 1.0)), SignedSense::Inside);
        assert_eq!(cone.calc_sense(&Point3::new(0.0, -2.0, 1.0)), SignedSense::Inside);
        assert_eq!(cone.calc_sense(&Point3::new(3.0, 2.0, 0.0)), SignedSense::Outside);

        // Parallel to the axis, offset by 1: crosses both nappes at |y| = 1
        let isect = cone.calc_intersections(
            &Point3::new(1.0, -5.0, 0.0),
            &Vec3::new(0.0, 1.0, 0.0),
            SurfaceState::Off,
        );
        assert_relative_eq!(isect[0], 4.0);
        assert_relative_eq!(isect[1], 6.0);
    }

    #[test]
    fn test_parallel_to_surface() {
        // Ray parallel to a generator line: the quadratic term vanishes
        let cone = ConeAligned::new(Axis::Z, Point3::origin(), 1.0).unwrap();
        let dir = Vec3::new(1.0, 0.0, 1.0).normalize();
        let isect = cone.calc_intersections(&Point3::new(-1.0, 0.0, 0.0), &dir, SurfaceState::Off);
        assert_relative_eq!(isect[0], 0.5 * 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_eq!(isect[1], NO_INTERSECTION);
    }

    #[test]
    fn test_normal() {
        let cone = ConeAligned::new(Axis::Z, Point3::new(0.0, 0.0, 1.0), 1.0).unwrap();
        let n = cone.calc_normal(&Point3::new(1.0, 0.0, 2.0));
        let s2 = 0.5_f64.sqrt();
        assert_relative_eq!(n, Vec3::new(s2, 0.0, -s2), epsilon = 1e-12);
    }
}
