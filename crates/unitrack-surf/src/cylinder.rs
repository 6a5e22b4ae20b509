//! Cylinders parallel to a coordinate axis.

use unitrack_math::{Axis, Point3, Vec3};
use unitrack_solve::QuadraticSolver;

use crate::{
    require_finite_vec, require_positive, Result, SurfaceFunction, SurfaceKind, SurfaceState,
    NO_INTERSECTION,
};

/// Intersect a cylinder given the point's offset from the axis.
///
/// `u`, `v` are the perpendicular offsets and `du`, `dv` the matching
/// direction components. A ray parallel to the axis never intersects.
#[inline]
fn intersect_cyl(
    u: f64,
    v: f64,
    du: f64,
    dv: f64,
    radius_sq: f64,
    state: SurfaceState,
) -> [f64; 2] {
    let a = du * du + dv * dv;
    if a < QuadraticSolver::min_a() {
        return [NO_INTERSECTION, NO_INTERSECTION];
    }
    let solve = QuadraticSolver::new(a, u * du + v * dv);
    if state.is_on() {
        solve.solve_on_surface()
    } else {
        solve.solve(u * u + v * v - radius_sq)
    }
}

/// Normal of a cylinder from the perpendicular offsets.
#[inline]
fn cyl_normal(axis: Axis, u: f64, v: f64) -> Vec3 {
    let (iu, iv) = axis.perpendicular();
    let mut n = Vec3::zeros();
    n[iu.index()] = u;
    n[iv.index()] = v;
    n.normalize()
}

/// Cylinder along an axis through the origin: `u² + v² - r²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylCentered {
    axis: Axis,
    radius_sq: f64,
}

impl CylCentered {
    /// Construct from an axis and radius.
    pub fn new(axis: Axis, radius: f64) -> Result<Self> {
        let radius = require_positive(radius, "radius")?;
        Ok(Self {
            axis,
            radius_sq: radius * radius,
        })
    }

    /// Axis of the cylinder.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Square of the radius.
    pub fn radius_sq(&self) -> f64 {
        self.radius_sq
    }

    #[inline]
    fn uv(&self, x: &Vec3) -> (f64, f64) {
        let (u, v) = self.axis.perpendicular();
        (x[u.index()], x[v.index()])
    }
}

impl SurfaceFunction for CylCentered {
    type Intersections = [f64; 2];
    const NUM_INTERSECTIONS: usize = 2;
    const KIND: SurfaceKind = SurfaceKind::CylCentered;
    const SIMPLE_SAFETY: bool = true;

    fn calc_value(&self, pos: &Point3) -> f64 {
        let (u, v) = self.uv(&pos.coords);
        u * u + v * v - self.radius_sq
    }

    fn calc_intersections(&self, pos: &Point3, dir: &Vec3, state: SurfaceState) -> [f64; 2] {
        let (u, v) = self.uv(&pos.coords);
        let (du, dv) = self.uv(dir);
        intersect_cyl(u, v, du, dv, self.radius_sq, state)
    }

    fn calc_normal(&self, pos: &Point3) -> Vec3 {
        let (u, v) = self.uv(&pos.coords);
        cyl_normal(self.axis, u, v)
    }

    fn calc_safety(&self, pos: &Point3) -> Option<f64> {
        let (u, v) = self.uv(&pos.coords);
        Some(((u * u + v * v).sqrt() - self.radius_sq.sqrt()).abs())
    }
}

/// Cylinder parallel to an axis: `(u - u0)² + (v - v0)² - r²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylAligned {
    axis: Axis,
    origin_u: f64,
    origin_v: f64,
    radius_sq: f64,
}

impl CylAligned {
    /// Construct from an axis, a point on the axis, and a radius.
    ///
    /// The component of `origin` along `axis` is ignored.
    pub fn new(axis: Axis, origin: Point3, radius: f64) -> Result<Self> {
        require_finite_vec(&origin.coords, "origin")?;
        let radius = require_positive(radius, "radius")?;
        let (u, v) = axis.perpendicular();
        Ok(Self {
            axis,
            origin_u: origin[u.index()],
            origin_v: origin[v.index()],
            radius_sq: radius * radius,
        })
    }

    /// Axis of the cylinder.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Square of the radius.
    pub fn radius_sq(&self) -> f64 {
        self.radius_sq
    }

    #[inline]
    fn local_uv(&self, pos: &Point3) -> (f64, f64) {
        let (u, v) = self.axis.perpendicular();
        (pos[u.index()] - self.origin_u, pos[v.index()] - self.origin_v)
    }
}

impl SurfaceFunction for CylAligned {
    type Intersections = [f64; 2];
    const NUM_INTERSECTIONS: usize = 2;
    const KIND: SurfaceKind = SurfaceKind::CylAligned;
    const SIMPLE_SAFETY: bool = true;

    fn calc_value(&self, pos: &Point3) -> f64 {
        let (u, v) = self.local_uv(pos);
        u * u + v * v - self.radius_sq
    }

    fn calc_intersections(&self, pos: &Point3, dir: &Vec3, state: SurfaceState) -> [f64; 2] {
        let (u, v) = self.local_uv(pos);
        let (iu, iv) = self.axis.perpendicular();
        intersect_cyl(u, v, dir[iu.index()], dir[iv.index()], self.radius_sq, state)
    }

    fn calc_normal(&self, pos: &Point3) -> Vec3 {
        let (u, v) = self.local_uv(pos);
        cyl_normal(self.axis, u, v)
    }

    fn calc_safety(&self, pos: &Point3) -> Option<f64> {
        let (u, v) = self.local_uv(pos);
        Some(((u * u + v * v).sqrt() - self.radius_sq.sqrt()).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_centered() {
        let cyl = CylCentered::new(Axis::X, 2.0).unwrap();
        let pos = Point3::new(100.0, 0.0, 0.0);
        let isect = cyl.calc_intersections(&pos, &Vec3::new(0.0, 1.0, 0.0), SurfaceState::Off);
        assert_relative_eq!(isect[0], 2.0);
        assert_eq!(isect[1], NO_INTERSECTION);

        // Parallel to the axis
        let isect = cyl.calc_intersections(&pos, &Vec3::new(1.0, 0.0, 0.0), SurfaceState::Off);
        assert_eq!(isect, [NO_INTERSECTION, NO_INTERSECTION]);

        // From outside, through both walls
        let pos = Point3::new(0.0, -5.0, 0.0);
        let isect = cyl.calc_intersections(&pos, &Vec3::new(0.0, 1.0, 0.0), SurfaceState::Off);
        assert_relative_eq!(isect[0], 3.0);
        assert_relative_eq!(isect[1], 7.0);

        assert_relative_eq!(cyl.calc_safety(&Point3::new(3.0, 0.0, 0.5)).unwrap(), 1.5);
    }

    #[test]
    fn test_aligned() {
        let cyl = CylAligned::new(Axis::Z, Point3::new(1.0, 2.0, 99.0), 0.5).unwrap();
        let pos = Point3::new(1.0, 2.0, 0.0);
        let dir = Vec3::new(1.0, 0.0, 0.0);
        let isect = cyl.calc_intersections(&pos, &dir, SurfaceState::Off);
        assert_relative_eq!(isect[0], 0.5);

        // On the surface heading back in
        let on = Point3::new(1.5, 2.0, 0.0);
        let isect = cyl.calc_intersections(&on, &(-dir), SurfaceState::On);
        assert_relative_eq!(isect[0], 1.0);
        assert_eq!(isect[1], NO_INTERSECTION);

        let n = cyl.calc_normal(&on);
        assert_relative_eq!(n, Vec3::new(1.0, 0.0, 0.0));
    }
}
