//! Spheres.

use unitrack_math::{Point3, Vec3};
use unitrack_solve::QuadraticSolver;

use crate::{
    require_finite_vec, require_positive, Result, SurfaceFunction, SurfaceKind, SurfaceState,
};

/// Intersect a sphere given the point's offset from its center.
#[inline]
fn intersect_sphere(x: &Vec3, dir: &Vec3, radius_sq: f64, state: SurfaceState) -> [f64; 2] {
    let solve = QuadraticSolver::new(1.0, x.dot(dir));
    if state.is_on() {
        solve.solve_on_surface()
    } else {
        solve.solve(x.norm_squared() - radius_sq)
    }
}

/// Sphere centered on the origin: `|x|² - r²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCentered {
    radius_sq: f64,
}

impl SphereCentered {
    /// Construct from a radius.
    pub fn new(radius: f64) -> Result<Self> {
        let radius = require_positive(radius, "radius")?;
        Ok(Self {
            radius_sq: radius * radius,
        })
    }

    /// Square of the radius.
    pub fn radius_sq(&self) -> f64 {
        self.radius_sq
    }
}

impl SurfaceFunction for SphereCentered {
    type Intersections = [f64; 2];
    const NUM_INTERSECTIONS: usize = 2;
    const KIND: SurfaceKind = SurfaceKind::SphereCentered;
    const SIMPLE_SAFETY: bool = true;

    fn calc_value(&self, pos: &Point3) -> f64 {
        pos.coords.norm_squared() - self.radius_sq
    }

    fn calc_intersections(&self, pos: &Point3, dir: &Vec3, state: SurfaceState) -> [f64; 2] {
        intersect_sphere(&pos.coords, dir, self.radius_sq, state)
    }

    fn calc_normal(&self, pos: &Point3) -> Vec3 {
        pos.coords.normalize()
    }

    fn calc_safety(&self, pos: &Point3) -> Option<f64> {
        Some((pos.coords.norm() - self.radius_sq.sqrt()).abs())
    }
}

/// Sphere with arbitrary center: `|x - c|² - r²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    origin: Point3,
    radius_sq: f64,
}

impl Sphere {
    /// Construct from a center and radius.
    pub fn new(origin: Point3, radius: f64) -> Result<Self> {
        require_finite_vec(&origin.coords, "origin")?;
        let radius = require_positive(radius, "radius")?;
        Ok(Self {
            origin,
            radius_sq: radius * radius,
        })
    }

    /// Center of the sphere.
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Square of the radius.
    pub fn radius_sq(&self) -> f64 {
        self.radius_sq
    }
}

impl SurfaceFunction for Sphere {
    type Intersections = [f64; 2];
    const NUM_INTERSECTIONS: usize = 2;
    const KIND: SurfaceKind = SurfaceKind::Sphere;
    const SIMPLE_SAFETY: bool = true;

    fn calc_value(&self, pos: &Point3) -> f64 {
        (pos - self.origin).norm_squared() - self.radius_sq
    }

    fn calc_intersections(&self, pos: &Point3, dir: &Vec3, state: SurfaceState) -> [f64; 2] {
        intersect_sphere(&(pos - self.origin), dir, self.radius_sq, state)
    }

    fn calc_normal(&self, pos: &Point3) -> Vec3 {
        (pos - self.origin).normalize()
    }

    fn calc_safety(&self, pos: &Point3) -> Option<f64> {
        Some(((pos - self.origin).norm() - self.radius_sq.sqrt()).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SignedSense, NO_INTERSECTION};
    use approx::assert_relative_eq;

    #[test]
    fn test_centered() {
        let s = SphereCentered::new(1.0).unwrap();
        let dir = Vec3::new(0.0, 0.0, 1.0);
        let isect = s.calc_intersections(&Point3::new(0.0, 0.0, -3.0), &dir, SurfaceState::Off);
        assert_relative_eq!(isect[0], 2.0);
        assert_relative_eq!(isect[1], 4.0);

        // Tangent grazing ray misses a slightly smaller sphere
        let pos = Point3::new(1.0 + 1e-9, 0.0, -3.0);
        let isect = s.calc_intersections(&pos, &dir, SurfaceState::Off);
        assert_eq!(isect, [NO_INTERSECTION, NO_INTERSECTION]);
    }

    #[test]
    fn test_offset() {
        let s = Sphere::new(Point3::new(1.0, 2.0, 3.0), 0.5).unwrap();
        assert_eq!(s.calc_sense(&Point3::new(1.0, 2.0, 3.2)), SignedSense::Inside);
        assert_eq!(s.calc_sense(&Point3::new(1.0, 2.0, 3.5)), SignedSense::On);

        let on = Point3::new(1.0, 2.0, 3.5);
        let isect = s.calc_intersections(&on, &Vec3::new(0.0, 0.0, -1.0), SurfaceState::On);
        assert_relative_eq!(isect[0], 1.0);
        assert_relative_eq!(s.calc_normal(&on), Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(s.calc_safety(&Point3::new(1.0, 2.0, 5.0)).unwrap(), 1.5);
    }
}
