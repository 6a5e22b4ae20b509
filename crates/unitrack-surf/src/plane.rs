//! Planes: axis-aligned and general.

use unitrack_math::{is_soft_unit_vector, Axis, Point3, Vec3};

use crate::{
    require_finite, require_finite_vec, Result, SurfaceError, SurfaceFunction, SurfaceKind,
    SurfaceState, NO_INTERSECTION,
};

/// Plane perpendicular to an axis: `x[axis] - position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneAligned {
    axis: Axis,
    position: f64,
}

impl PlaneAligned {
    /// Construct at a position along an axis.
    pub fn new(axis: Axis, position: f64) -> Result<Self> {
        Ok(Self {
            axis,
            position: require_finite(position, "position")?,
        })
    }

    /// Normal axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Intercept along the normal axis.
    pub fn position(&self) -> f64 {
        self.position
    }
}

impl SurfaceFunction for PlaneAligned {
    type Intersections = [f64; 1];
    const NUM_INTERSECTIONS: usize = 1;
    const KIND: SurfaceKind = SurfaceKind::PlaneAligned;
    const SIMPLE_SAFETY: bool = true;

    #[inline]
    fn calc_value(&self, pos: &Point3) -> f64 {
        pos[self.axis.index()] - self.position
    }

    fn calc_intersections(&self, pos: &Point3, dir: &Vec3, state: SurfaceState) -> [f64; 1] {
        let n_dir = dir[self.axis.index()];
        if !state.is_on() && n_dir != 0.0 {
            let dist = -self.calc_value(pos) / n_dir;
            if dist > 0.0 {
                return [dist];
            }
        }
        [NO_INTERSECTION]
    }

    fn calc_normal(&self, _pos: &Point3) -> Vec3 {
        self.axis.unit_vector()
    }

    fn calc_safety(&self, pos: &Point3) -> Option<f64> {
        Some(self.calc_value(pos).abs())
    }
}

/// General plane: `n · x - d` with unit normal `n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vec3,
    displacement: f64,
}

impl Plane {
    /// Construct from a unit normal and the displacement along it.
    pub fn new(normal: Vec3, displacement: f64) -> Result<Self> {
        require_finite_vec(&normal, "normal")?;
        if !is_soft_unit_vector(&normal) {
            return Err(SurfaceError::NonUnitNormal(normal.x, normal.y, normal.z));
        }
        Ok(Self {
            normal,
            displacement: require_finite(displacement, "displacement")?,
        })
    }

    /// Construct from a unit normal and a point on the plane.
    pub fn from_normal_point(normal: Vec3, point: &Point3) -> Result<Self> {
        Self::new(normal, normal.dot(&point.coords))
    }

    /// Construct from three points, counterclockwise about the normal.
    pub fn from_points(a: &Point3, b: &Point3, c: &Point3) -> Result<Self> {
        let cross = (b - a).cross(&(c - a));
        let scale = (b - a).norm() * (c - a).norm();
        if cross.norm() <= 1e-12 * scale {
            return Err(SurfaceError::CollinearPoints);
        }
        Self::from_normal_point(cross.normalize(), a)
    }

    /// Unit normal.
    pub fn normal(&self) -> &Vec3 {
        &self.normal
    }

    /// Distance from the origin along the normal.
    pub fn displacement(&self) -> f64 {
        self.displacement
    }
}

impl SurfaceFunction for Plane {
    type Intersections = [f64; 1];
    const NUM_INTERSECTIONS: usize = 1;
    const KIND: SurfaceKind = SurfaceKind::Plane;
    const SIMPLE_SAFETY: bool = true;

    #[inline]
    fn calc_value(&self, pos: &Point3) -> f64 {
        self.normal.dot(&pos.coords) - self.displacement
    }

    fn calc_intersections(&self, pos: &Point3, dir: &Vec3, state: SurfaceState) -> [f64; 1] {
        let n_dir = self.normal.dot(dir);
        if !state.is_on() && n_dir != 0.0 {
            let dist = -self.calc_value(pos) / n_dir;
            if dist > 0.0 {
                return [dist];
            }
        }
        [NO_INTERSECTION]
    }

    fn calc_normal(&self, _pos: &Point3) -> Vec3 {
        self.normal
    }

    fn calc_safety(&self, pos: &Point3) -> Option<f64> {
        Some(self.calc_value(pos).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SignedSense;

    #[test]
    fn test_plane_aligned() {
        let p = PlaneAligned::new(Axis::Y, 2.0).unwrap();
        assert_eq!(p.calc_sense(&Point3::new(5.0, 1.0, 0.0)), SignedSense::Inside);
        assert_eq!(p.calc_sense(&Point3::new(5.0, 2.0, 0.0)), SignedSense::On);

        let pos = Point3::new(0.0, 0.0, 0.0);
        let dist = p.calc_intersections(&pos, &Vec3::new(0.0, 0.5, 0.0), SurfaceState::Off);
        assert_eq!(dist, [4.0]);
        let dist = p.calc_intersections(&pos, &Vec3::new(0.0, -1.0, 0.0), SurfaceState::Off);
        assert_eq!(dist, [NO_INTERSECTION]);
        let dist = p.calc_intersections(&pos, &Vec3::new(1.0, 0.0, 0.0), SurfaceState::Off);
        assert_eq!(dist, [NO_INTERSECTION]);
        assert_eq!(p.calc_safety(&pos), Some(2.0));
    }

    #[test]
    fn test_plane_from_points() {
        let p = Plane::from_points(
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(0.0, 0.0, 1.0),
        )
        .unwrap();
        let s3 = 1.0 / 3.0_f64.sqrt();
        assert!((p.normal() - Vec3::new(s3, s3, s3)).norm() < 1e-12);
        assert!((p.displacement() - s3).abs() < 1e-12);

        let dist = p.calc_intersections(
            &Point3::origin(),
            &Vec3::new(s3, s3, s3),
            SurfaceState::Off,
        );
        assert!((dist[0] - s3).abs() < 1e-12);
    }

    #[test]
    fn test_plane_errors() {
        assert_eq!(
            Plane::from_points(
                &Point3::new(0.0, 0.0, 0.0),
                &Point3::new(1.0, 1.0, 1.0),
                &Point3::new(2.0, 2.0, 2.0),
            ),
            Err(SurfaceError::CollinearPoints)
        );
        assert!(matches!(
            Plane::new(Vec3::new(1.0, 1.0, 0.0), 0.0),
            Err(SurfaceError::NonUnitNormal(..))
        ));
        assert!(PlaneAligned::new(Axis::X, f64::NAN).is_err());
    }
}
