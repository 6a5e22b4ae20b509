//! Axis-aligned bounding box.
//!
//! Boxes may be infinite along any axis; the BIH uses fully infinite boxes
//! for volumes without an explicit extent.

use serde::{Deserialize, Serialize};

use crate::{Axis, Point3, Tolerance, Vec3};

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Lower corner.
    pub lower: Point3,
    /// Upper corner.
    pub upper: Point3,
}

impl BBox {
    /// Create a box from lower and upper corners.
    pub fn new(lower: Point3, upper: Point3) -> Self {
        Self { lower, upper }
    }

    /// Create an empty (inverted) box suitable for expansion.
    pub fn empty() -> Self {
        Self {
            lower: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            upper: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Smallest box containing all the given points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.include_point(p);
        }
        bbox
    }

    /// Create a box that encloses all space.
    pub fn infinite() -> Self {
        Self {
            lower: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            upper: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
        }
    }

    /// Whether every lower bound is at most the matching upper bound.
    pub fn is_valid(&self) -> bool {
        Axis::ALL
            .iter()
            .all(|&ax| self.lower[ax.index()] <= self.upper[ax.index()])
    }

    /// Whether the box spans all of space.
    pub fn is_infinite(&self) -> bool {
        Axis::ALL.iter().all(|&ax| {
            self.lower[ax.index()] == f64::NEG_INFINITY
                && self.upper[ax.index()] == f64::INFINITY
        })
    }

    /// Whether some but not all bounds are infinite.
    ///
    /// The center of such a box is not finite, so it cannot be partitioned.
    pub fn is_half_infinite(&self) -> bool {
        let any_inf = Axis::ALL.iter().any(|&ax| {
            self.lower[ax.index()].is_infinite() || self.upper[ax.index()].is_infinite()
        });
        any_inf && !self.is_infinite()
    }

    /// Whether the point is inside or on the boundary of the box.
    pub fn contains(&self, p: &Point3) -> bool {
        Axis::ALL.iter().all(|&ax| {
            let i = ax.index();
            p[i] >= self.lower[i] && p[i] <= self.upper[i]
        })
    }

    /// Expand this box to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        for i in 0..3 {
            self.lower[i] = self.lower[i].min(p[i]);
            self.upper[i] = self.upper[i].max(p[i]);
        }
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        let mut result = *self;
        result.include_point(&other.lower);
        result.include_point(&other.upper);
        result
    }

    /// Center of the box.
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.lower, &self.upper)
    }

    /// Width along each axis.
    pub fn extent(&self) -> Vec3 {
        self.upper - self.lower
    }

    /// Surface area, zero for empty boxes.
    pub fn surface_area(&self) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        let e = self.extent();
        2.0 * (e.x * e.y + e.y * e.z + e.z * e.x)
    }

    /// Copy expanded outward by the tolerance on every side.
    ///
    /// Each bound moves by the larger of the absolute tolerance and the
    /// relative tolerance scaled by the bound's magnitude.
    pub fn bumped(&self, tol: &Tolerance) -> BBox {
        let bump = |v: f64| tol.abs.max(tol.rel * v.abs());
        let mut result = *self;
        for i in 0..3 {
            if result.lower[i].is_finite() {
                result.lower[i] -= bump(result.lower[i]);
            }
            if result.upper[i].is_finite() {
                result.upper[i] += bump(result.upper[i]);
            }
        }
        result
    }

    /// Slab test against a ray with precomputed inverse direction.
    ///
    /// Returns `Some((t_enter, t_exit))` with `t_enter` clamped to zero, or
    /// `None` if the ray misses the box or the box is behind it.
    #[inline]
    pub fn intersect_ray(&self, pos: &Point3, inv_dir: &Vec3) -> Option<(f64, f64)> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        for i in 0..3 {
            let t1 = (self.lower[i] - pos[i]) * inv_dir[i];
            let t2 = (self.upper[i] - pos[i]) * inv_dir[i];
            // NaN (zero direction on a bound) is ignored by min/max
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        if t_max >= t_min && t_max >= 0.0 {
            Some((t_min.max(0.0), t_max))
        } else {
            None
        }
    }
}

impl Default for BBox {
    fn default() -> Self {
        Self::empty()
    }
}

/// Reciprocal of a direction, used by [`BBox::intersect_ray`].
pub fn inverse_direction(dir: &Vec3) -> Vec3 {
    Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BBox {
        BBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_ray_hit() {
        let inv = inverse_direction(&Vec3::new(1.0, 0.0, 0.0));
        let (t_min, t_max) = unit_box()
            .intersect_ray(&Point3::new(-5.0, 0.5, 0.5), &inv)
            .unwrap();
        assert!((t_min - 5.0).abs() < 1e-10);
        assert!((t_max - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_ray_miss_and_behind() {
        let inv = inverse_direction(&Vec3::new(1.0, 0.0, 0.0));
        assert!(unit_box()
            .intersect_ray(&Point3::new(-5.0, 5.0, 5.0), &inv)
            .is_none());
        let inv = inverse_direction(&Vec3::new(-1.0, 0.0, 0.0));
        assert!(unit_box()
            .intersect_ray(&Point3::new(-5.0, 0.5, 0.5), &inv)
            .is_none());
    }

    #[test]
    fn test_ray_inside() {
        let inv = inverse_direction(&Vec3::new(1.0, 0.0, 0.0));
        let (t_min, t_max) = unit_box()
            .intersect_ray(&Point3::new(0.5, 0.5, 0.5), &inv)
            .unwrap();
        assert_eq!(t_min, 0.0);
        assert!((t_max - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_infinite_box() {
        let inf = BBox::infinite();
        assert!(inf.is_infinite());
        assert!(!inf.is_half_infinite());
        assert!(inf.contains(&Point3::new(1e300, -1e300, 0.0)));
        let inv = inverse_direction(&Vec3::new(0.0, 0.0, 1.0));
        let (t_min, t_max) = inf.intersect_ray(&Point3::origin(), &inv).unwrap();
        assert_eq!(t_min, 0.0);
        assert_eq!(t_max, f64::INFINITY);

        let mut half = unit_box();
        half.upper.x = f64::INFINITY;
        assert!(half.is_half_infinite());
    }

    #[test]
    fn test_union_and_center() {
        let a = unit_box();
        let b = BBox::new(Point3::new(2.0, -1.0, 0.0), Point3::new(3.0, 0.0, 1.0));
        let u = a.union(&b);
        assert_eq!(u.lower, Point3::new(0.0, -1.0, 0.0));
        assert_eq!(u.upper, Point3::new(3.0, 1.0, 1.0));
        assert_eq!(u.center(), Point3::new(1.5, 0.0, 0.5));
        assert!((a.surface_area() - 6.0).abs() < 1e-12);
        assert_eq!(BBox::empty().surface_area(), 0.0);

        let pts = [Point3::new(1.0, 2.0, -1.0), Point3::new(-1.0, 0.5, 3.0)];
        let from = BBox::from_points(&pts);
        assert_eq!(from.lower, Point3::new(-1.0, 0.5, -1.0));
        assert_eq!(from.upper, Point3::new(1.0, 2.0, 3.0));
        assert!(!BBox::from_points(&[] as &[Point3]).is_valid());
    }

    #[test]
    fn test_bumped() {
        let tol = Tolerance {
            rel: 1e-3,
            abs: 1e-2,
        };
        let b = BBox::new(Point3::new(-100.0, 0.0, 0.0), Point3::new(1.0, 1.0, f64::INFINITY));
        let bumped = b.bumped(&tol);
        assert!((bumped.lower.x - (-100.1)).abs() < 1e-12);
        assert!((bumped.lower.y - (-0.01)).abs() < 1e-12);
        assert!((bumped.upper.x - 1.01).abs() < 1e-12);
        assert_eq!(bumped.upper.z, f64::INFINITY);
    }
}
