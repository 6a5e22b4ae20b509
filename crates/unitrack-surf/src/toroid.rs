//! Z-aligned torus with an elliptical cross-section.
//!
//! The tube cross-section is an ellipse with radial semi-axis `a` and axial
//! semi-axis `b`, swept around the z axis at major radius `r`. Squaring out
//! the radial square root gives the quartic
//!
//! ```text
//! (x² + y² + p z² + r² - a²)² - 4 r² (x² + y²),   p = a²/b²
//! ```
//!
//! whose roots along a ray are found with [`FerrariSolver`] and then polished
//! with [`RegulaFalsiSolver`].

use unitrack_math::{Point3, Vec3};
use unitrack_solve::{FerrariSolver, PolyEvaluator, RegulaFalsiSolver};

use crate::{
    require_finite_vec, require_positive, Result, SurfaceError, SurfaceFunction, SurfaceKind,
    SurfaceState, NO_INTERSECTION,
};

/// Half-widths of the polishing brackets, relative to the root, tried from
/// narrowest to widest. The widest covers the error of Ferrari's
/// biquadratic branch.
const POLISH_REL_WIDTHS: [f64; 3] = [1e-7, 1e-6, 1e-5];

/// Residual tolerance for polishing, relative to the term magnitudes.
const POLISH_REL_TOL: f64 = 1e-10;

/// Elliptical torus about the z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Toroid {
    origin: Point3,
    major_radius: f64,
    ellipse_xy_radius: f64,
    ellipse_z_radius: f64,
}

impl Toroid {
    /// Construct from a center, major radius and ellipse semi-axes.
    ///
    /// The cross-section must not reach the axis (`a < r`).
    pub fn new(origin: Point3, major_radius: f64, a: f64, b: f64) -> Result<Self> {
        require_finite_vec(&origin.coords, "origin")?;
        let major_radius = require_positive(major_radius, "major radius")?;
        let a = require_positive(a, "radial semi-axis")?;
        let b = require_positive(b, "axial semi-axis")?;
        if a >= major_radius {
            return Err(SurfaceError::SelfIntersectingToroid {
                major: major_radius,
                minor: a,
            });
        }
        Ok(Self {
            origin,
            major_radius,
            ellipse_xy_radius: a,
            ellipse_z_radius: b,
        })
    }

    /// Center of the torus.
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Distance from the axis to the center of the tube.
    pub fn major_radius(&self) -> f64 {
        self.major_radius
    }

    /// Radial and axial semi-axes of the tube cross-section.
    pub fn ellipse_radii(&self) -> (f64, f64) {
        (self.ellipse_xy_radius, self.ellipse_z_radius)
    }

    /// Quartic coefficients along a ray, highest power first.
    ///
    /// The leading coefficient is normalized to one.
    fn ray_coefficients(&self, x: &Vec3, dir: &Vec3) -> [f64; 5] {
        let r = self.major_radius;
        let a = self.ellipse_xy_radius;
        let b = self.ellipse_z_radius;

        let p = (a * a) / (b * b);
        let f = 1.0 - dir.z * dir.z;
        let g = f + p * dir.z * dir.z;
        let h = 2.0 * (x.x * dir.x + x.y * dir.y);
        let t = x.x * x.x + x.y * x.y;
        let q = 4.0 * r * r / (g * g);
        let m = (h + 2.0 * p * x.z * dir.z) / g;
        let u = (t + p * x.z * x.z + r * r - a * a) / g;

        [
            1.0,
            2.0 * m,
            m * m + 2.0 * u - q * f,
            2.0 * m * u - q * h,
            u * u - q * t,
        ]
    }
}

/// Refine a root of `poly` by regula falsi in the narrowest nearby bracket
/// with a sign change.
///
/// A root with no sign change within the widest bracket (a double root, or
/// a pair of roots closer than the bracket) is returned unchanged.
fn polish_root(poly: &PolyEvaluator<5>, root: f64) -> f64 {
    let scale = root.abs().max(1.0);
    for rel_width in POLISH_REL_WIDTHS {
        let half_width = rel_width * scale;
        let (left, right) = (root - half_width, root + half_width);
        let (f_left, f_right) = (poly.eval(left), poly.eval(right));

        if f_left == 0.0 {
            return left;
        }
        if f_right == 0.0 {
            return right;
        }
        if f_left.signum() != f_right.signum() {
            let tol = POLISH_REL_TOL * poly.eval_magnitude(root);
            return RegulaFalsiSolver::new(|t| poly.eval(t), tol.max(f64::MIN_POSITIVE))
                .solve(left, right);
        }
    }
    root
}

impl SurfaceFunction for Toroid {
    type Intersections = [f64; 4];
    const NUM_INTERSECTIONS: usize = 4;
    const KIND: SurfaceKind = SurfaceKind::Toroid;
    const SIMPLE_SAFETY: bool = false;

    fn calc_value(&self, pos: &Point3) -> f64 {
        let x = pos - self.origin;
        let r = self.major_radius;
        let a = self.ellipse_xy_radius;
        let b = self.ellipse_z_radius;

        let rho_sq = x.x * x.x + x.y * x.y;
        let s = rho_sq + (x.z * a / b).powi(2) + r * r - a * a;
        s * s - 4.0 * r * r * rho_sq
    }

    fn calc_intersections(&self, pos: &Point3, dir: &Vec3, state: SurfaceState) -> [f64; 4] {
        let x = pos - self.origin;
        let [c4, c3, c2, c1, c0] = self.ray_coefficients(&x, dir);

        let solve = FerrariSolver::default();
        let (mut roots, c0) = if state.is_on() {
            (solve.solve_on_surface([c4, c3, c2, c1]), 0.0)
        } else {
            (solve.solve([c4, c3, c2, c1, c0]), c0)
        };

        let poly = PolyEvaluator::new([c0, c1, c2, c3, c4]);
        for root in roots.iter_mut().filter(|r| **r != NO_INTERSECTION) {
            let polished = polish_root(&poly, *root);
            *root = if polished > 0.0 { polished } else { NO_INTERSECTION };
        }
        // Keep present roots at the front
        roots.sort_by(|a, b| a.total_cmp(b));
        roots
    }

    fn calc_normal(&self, pos: &Point3) -> Vec3 {
        let x = pos - self.origin;
        let a = self.ellipse_xy_radius;
        let b = self.ellipse_z_radius;

        let d = (x.x * x.x + x.y * x.y).sqrt();
        let f = 2.0 * (d - self.major_radius) / (d * a * a);
        Vec3::new(x.x * f, x.y * f, 2.0 * x.z / (b * b)).normalize()
    }
}
