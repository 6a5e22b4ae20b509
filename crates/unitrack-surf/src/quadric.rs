//! Second-order surfaces in general position.

use unitrack_math::{Point3, Vec3};
use unitrack_solve::QuadraticSolver;

use crate::{
    require_finite, require_finite_vec, Result, SurfaceError, SurfaceFunction, SurfaceKind,
    SurfaceState,
};

/// Axis-aligned quadric: `a x² + b y² + c z² + d x + e y + f z + g`.
///
/// Covers ellipsoids, hyperboloids and paraboloids whose principal axes
/// are the coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleQuadric {
    /// Second-order coefficients.
    abc: Vec3,
    /// First-order coefficients.
    def: Vec3,
    g: f64,
}

impl SimpleQuadric {
    /// Construct from second-order, first-order and constant coefficients.
    pub fn new(abc: Vec3, def: Vec3, g: f64) -> Result<Self> {
        require_finite_vec(&abc, "second-order coefficients")?;
        require_finite_vec(&def, "first-order coefficients")?;
        let g = require_finite(g, "constant")?;
        if abc.iter().chain(def.iter()).all(|&c| c == 0.0) {
            return Err(SurfaceError::DegenerateQuadric);
        }
        Ok(Self { abc, def, g })
    }

    /// Ellipsoid centered at `origin` with the given semi-axes.
    pub fn ellipsoid(origin: &Point3, radii: &Vec3) -> Result<Self> {
        for &r in radii.iter() {
            crate::require_positive(r, "radius")?;
        }
        let abc = radii.map(|r| 1.0 / (r * r));
        let def = -2.0 * abc.component_mul(&origin.coords);
        let g = abc.dot(&origin.coords.component_mul(&origin.coords)) - 1.0;
        Self::new(abc, def, g)
    }

    /// Second-order coefficients.
    pub fn second(&self) -> &Vec3 {
        &self.abc
    }

    /// First-order coefficients.
    pub fn first(&self) -> &Vec3 {
        &self.def
    }

    /// Constant term.
    pub fn zeroth(&self) -> f64 {
        self.g
    }

    #[inline]
    fn gradient(&self, x: &Vec3) -> Vec3 {
        2.0 * self.abc.component_mul(x) + self.def
    }
}

impl SurfaceFunction for SimpleQuadric {
    type Intersections = [f64; 2];
    const NUM_INTERSECTIONS: usize = 2;
    const KIND: SurfaceKind = SurfaceKind::SimpleQuadric;
    const SIMPLE_SAFETY: bool = false;

    fn calc_value(&self, pos: &Point3) -> f64 {
        let x = &pos.coords;
        (self.abc.component_mul(x) + self.def).dot(x) + self.g
    }

    fn calc_intersections(&self, pos: &Point3, dir: &Vec3, state: SurfaceState) -> [f64; 2] {
        let a = self.abc.dot(&dir.component_mul(dir));
        let half_b = 0.5 * self.gradient(&pos.coords).dot(dir);
        let c = self.calc_value(pos);
        QuadraticSolver::solve_general(a, half_b, c, state.is_on())
    }

    fn calc_normal(&self, pos: &Point3) -> Vec3 {
        self.gradient(&pos.coords).normalize()
    }
}

/// Quadric with cross terms:
/// `a x² + b y² + c z² + d xy + e yz + f zx + g x + h y + i z + j`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralQuadric {
    /// Second-order coefficients.
    abc: Vec3,
    /// Cross-term coefficients for xy, yz, zx.
    def: Vec3,
    /// First-order coefficients.
    ghi: Vec3,
    j: f64,
}

impl GeneralQuadric {
    /// Construct from second-order, cross, first-order and constant terms.
    pub fn new(abc: Vec3, def: Vec3, ghi: Vec3, j: f64) -> Result<Self> {
        require_finite_vec(&abc, "second-order coefficients")?;
        require_finite_vec(&def, "cross-term coefficients")?;
        require_finite_vec(&ghi, "first-order coefficients")?;
        let j = require_finite(j, "constant")?;
        if abc.iter().chain(def.iter()).chain(ghi.iter()).all(|&c| c == 0.0) {
            return Err(SurfaceError::DegenerateQuadric);
        }
        Ok(Self { abc, def, ghi, j })
    }

    /// Second-order coefficients.
    pub fn second(&self) -> &Vec3 {
        &self.abc
    }

    /// Cross-term coefficients.
    pub fn cross(&self) -> &Vec3 {
        &self.def
    }

    /// First-order coefficients.
    pub fn first(&self) -> &Vec3 {
        &self.ghi
    }

    /// Constant term.
    pub fn zeroth(&self) -> f64 {
        self.j
    }

    fn gradient(&self, x: &Vec3) -> Vec3 {
        let (a, b, c) = (self.abc.x, self.abc.y, self.abc.z);
        let (d, e, f) = (self.def.x, self.def.y, self.def.z);
        Vec3::new(
            2.0 * a * x.x + d * x.y + f * x.z,
            2.0 * b * x.y + d * x.x + e * x.z,
            2.0 * c * x.z + e * x.y + f * x.x,
        ) + self.ghi
    }
}

impl SurfaceFunction for GeneralQuadric {
    type Intersections = [f64; 2];
    const NUM_INTERSECTIONS: usize = 2;
    const KIND: SurfaceKind = SurfaceKind::GeneralQuadric;
    const SIMPLE_SAFETY: bool = false;

    fn calc_value(&self, pos: &Point3) -> f64 {
        let (x, y, z) = (pos.x, pos.y, pos.z);
        let (a, b, c) = (self.abc.x, self.abc.y, self.abc.z);
        let (d, e, f) = (self.def.x, self.def.y, self.def.z);
        (a * x + d * y + self.ghi.x) * x
            + (b * y + e * z + self.ghi.y) * y
            + (c * z + f * x + self.ghi.z) * z
            + self.j
    }

    fn calc_intersections(&self, pos: &Point3, dir: &Vec3, state: SurfaceState) -> [f64; 2] {
        let (u, v, w) = (dir.x, dir.y, dir.z);
        let (a, b, c) = (self.abc.x, self.abc.y, self.abc.z);
        let (d, e, f) = (self.def.x, self.def.y, self.def.z);

        let qa = (a * u + d * v) * u + (b * v + e * w) * v + (c * w + f * u) * w;
        let half_b = 0.5 * self.gradient(&pos.coords).dot(dir);
        let qc = self.calc_value(pos);
        QuadraticSolver::solve_general(qa, half_b, qc, state.is_on())
    }

    fn calc_normal(&self, pos: &Point3) -> Vec3 {
        self.gradient(&pos.coords).normalize()
    }
}
