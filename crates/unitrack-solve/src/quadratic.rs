//! Positive roots of `a x² + b x + c`.

use unitrack_math::Tolerance;

use crate::NO_INTERSECTION;

/// Find positive roots of a quadratic with a fixed `a` and `b`.
///
/// The equation is normalized by `a` at construction, so the solver is
/// cheap to apply to several constant terms. The on-surface form assumes
/// `c = 0` and drops the root at zero analytically.
#[derive(Debug, Clone, Copy)]
pub struct QuadraticSolver {
    a_inv: f64,
    /// Half of `b`, divided by `a`
    hba: f64,
}

impl QuadraticSolver {
    /// Smallest `|a|` treated as a true quadratic.
    #[inline]
    pub fn min_a() -> f64 {
        Tolerance::SQRT_QUADRATIC * Tolerance::SQRT_QUADRATIC
    }

    /// Construct from the quadratic coefficient and half the linear one.
    #[inline]
    pub fn new(a: f64, half_b: f64) -> Self {
        debug_assert!(a.abs() >= Self::min_a(), "quadratic coefficient {a} too small");
        let a_inv = 1.0 / a;
        Self {
            a_inv,
            hba: half_b * a_inv,
        }
    }

    /// Solve for a point off the surface.
    ///
    /// Roots are returned in ascending order; absent roots are
    /// [`NO_INTERSECTION`] and always trail the present ones.
    pub fn solve(&self, c: f64) -> [f64; 2] {
        let c = c * self.a_inv;
        let b2_4 = self.hba * self.hba;

        if b2_4 > c {
            // Two real roots
            let t2 = (b2_4 - c).sqrt();
            let mut result = [-self.hba - t2, -self.hba + t2];
            if result[1] <= 0.0 {
                // Both behind
                result = [NO_INTERSECTION, NO_INTERSECTION];
            } else if result[0] <= 0.0 {
                result = [result[1], NO_INTERSECTION];
            }
            result
        } else if b2_4 == c {
            // Tangent
            let root = -self.hba;
            [if root > 0.0 { root } else { NO_INTERSECTION }, NO_INTERSECTION]
        } else {
            [NO_INTERSECTION, NO_INTERSECTION]
        }
    }

    /// Solve for a point on the surface (`c = 0`), excluding the zero root.
    pub fn solve_on_surface(&self) -> [f64; 2] {
        let root = -2.0 * self.hba;
        [if root > 0.0 { root } else { NO_INTERSECTION }, NO_INTERSECTION]
    }

    /// Solve a general quadric, handling vanishing `a`.
    ///
    /// If `|a|` is below [`min_a`](Self::min_a) the equation is treated as
    /// linear; a ray on the surface or parallel to it has no roots.
    pub fn solve_general(a: f64, half_b: f64, c: f64, on_surface: bool) -> [f64; 2] {
        if a.abs() >= Self::min_a() {
            let solve = Self::new(a, half_b);
            if on_surface {
                solve.solve_on_surface()
            } else {
                solve.solve(c)
            }
        } else if !on_surface && half_b != 0.0 {
            // Linear: b x + c = 0
            let root = -c / (2.0 * half_b);
            [if root > 0.0 { root } else { NO_INTERSECTION }, NO_INTERSECTION]
        } else {
            [NO_INTERSECTION, NO_INTERSECTION]
        }
    }
}
