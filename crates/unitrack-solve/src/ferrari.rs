//! Positive real roots of quartic polynomials (Ferrari's method).
//!
//! The quartic `a x⁴ + b x³ + c x² + d x + e` is normalized and depressed
//! with `x = y - b/4a`. If the depressed linear term vanishes the equation
//! is biquadratic and solved as two nested quadratics. Otherwise the
//! dominant real root of the resolvent cubic factors the quartic into two
//! quadratics. The cubic uses the trigonometric formula when all its roots
//! are real and Cardano's formula otherwise.
//!
//! Near-zero square root arguments are detected with a [`SoftZero`] and
//! routed to the degenerate branches instead of producing NaN.

use std::f64::consts::PI;

use unitrack_math::SoftZero;

use crate::{signum, PolyEvaluator, NO_INTERSECTION};

/// Quartic solver returning up to four positive real roots.
///
/// Roots are placed at the front of the result in no guaranteed order;
/// unused slots are [`NO_INTERSECTION`].
#[derive(Debug, Clone, Copy)]
pub struct FerrariSolver {
    soft_zero: SoftZero,
}

impl FerrariSolver {
    /// Default tolerance for detecting degenerate cases.
    pub const DEFAULT_TOL: f64 = 1e-5;

    /// Construct with a tolerance for degenerate-case detection.
    pub fn new(tol: f64) -> Self {
        Self {
            soft_zero: SoftZero::new(tol),
        }
    }

    /// Solve `a x⁴ + b x³ + c x² + d x + e = 0` for positive roots.
    pub fn solve(&self, [a, b, c, d, e]: [f64; 5]) -> [f64; 4] {
        debug_assert!(a != 0.0, "quartic coefficient must be nonzero");
        let (ba, ca, da, ea) = (b / a, c / a, d / a, e / a);
        let qb = 0.25 * ba;

        // Depressed quartic: y⁴ - 2p y² + 2q y - r
        let p = PolyEvaluator::new([-0.5 * ca, 0.0, 3.0]).eval(qb);
        let q = PolyEvaluator::new([0.5 * da, -ca, 0.0, 4.0]).eval(qb);
        let r = PolyEvaluator::new([-ea, da, -ca, 0.0, 3.0]).eval(qb);

        if self.soft_zero.is_zero(q) {
            return self.biquadratic_roots(qb, p, r);
        }

        let z0 = self.normalized_cubic_roots(p, r, p * r - 0.5 * q * q)[0];
        let s2 = 2.0 * p + 2.0 * z0;
        if s2 < 0.0 {
            return [NO_INTERSECTION; 4];
        }

        let s = s2.sqrt();
        let t = if self.soft_zero.is_zero(s) {
            (z0 * z0 + r).max(0.0).sqrt()
        } else {
            -q / s
        };

        let [r0, r1] = self.normalized_quadratic_roots(0.5 * s, z0 + t);
        let [r2, r3] = self.normalized_quadratic_roots(-0.5 * s, z0 - t);

        let mut roots = [NO_INTERSECTION; 4];
        let mut idx = 0;
        for root in [r0, r1, r2, r3] {
            idx = place_root(&mut roots, root - qb, idx);
        }
        roots
    }

    /// Solve `a x⁴ + b x³ + c x² + d x = 0`, excluding the known root at zero.
    ///
    /// This is the on-surface form: the remaining cubic is solved directly.
    pub fn solve_on_surface(&self, [a, b, c, d]: [f64; 4]) -> [f64; 4] {
        debug_assert!(a != 0.0, "quartic coefficient must be nonzero");
        let cubic = self.normalized_cubic_roots(b / a, c / a, d / a);

        let mut roots = [NO_INTERSECTION; 4];
        let mut idx = 0;
        for root in cubic {
            idx = place_root(&mut roots, root, idx);
        }
        roots
    }

    /// Roots of the biquadratic `y⁴ - 2p y² - r`, shifted back by `qb`.
    fn biquadratic_roots(&self, qb: f64, p: f64, r: f64) -> [f64; 4] {
        let ir = self.normalized_quadratic_roots(-p, -r);

        let mut roots = [NO_INTERSECTION; 4];
        let mut idx = 0;
        for y2 in [ir[1], ir[0]] {
            if y2 == NO_INTERSECTION || y2 <= 0.0 {
                continue;
            }
            let y = y2.sqrt();
            let from_pos = y - qb;
            idx = place_root(&mut roots, from_pos, idx);
            if from_pos > 0.0 {
                // The negative root can only be positive if the positive one is
                idx = place_root(&mut roots, -y - qb, idx);
            }
        }
        roots
    }

    /// Real roots of `x³ + b x² + c x + d`, dominant root first.
    fn normalized_cubic_roots(&self, b: f64, c: f64, d: f64) -> [f64; 3] {
        let third_b = b / 3.0;
        let q = third_b * third_b - c / 3.0;
        let r = 0.5 * PolyEvaluator::new([d, -c, 0.0, 2.0]).eval(third_b);

        let q3 = q * q * q;
        let discrim = r * r - q3;

        if self.soft_zero.is_zero(q) && self.soft_zero.is_zero(r) && self.soft_zero.is_zero(discrim)
        {
            // Triple root
            return [-d.cbrt(), NO_INTERSECTION, NO_INTERSECTION];
        }

        if discrim <= 0.0 {
            // Three real roots: trigonometric form. Rounding can push the
            // cosine argument just outside [-1, 1].
            let theta = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
            let n2_root_q = -2.0 * q.sqrt();
            let two_thirds_pi = 2.0 * PI / 3.0;
            let third_theta = theta / 3.0;

            let z0 = n2_root_q * third_theta.cos() - third_b;
            let z1 = n2_root_q * (third_theta + two_thirds_pi).cos() - third_b;
            let z2 = n2_root_q * (third_theta - two_thirds_pi).cos() - third_b;

            if 2.0 * theta < PI {
                [z0, z1, z2]
            } else {
                [z1, z0, z2]
            }
        } else {
            // One real root: Cardano
            let a = -signum(r) * (r.abs() + discrim.sqrt()).cbrt();
            let b = if a == 0.0 { 0.0 } else { q / a };
            [a + b - third_b, NO_INTERSECTION, NO_INTERSECTION]
        }
    }

    /// Real roots of `x² + 2 hb x + c`, ascending.
    fn normalized_quadratic_roots(&self, hb: f64, c: f64) -> [f64; 2] {
        let hb2 = hb * hb;
        if self.soft_zero.is_zero(hb2 - c) {
            // Single critical root
            [-hb, NO_INTERSECTION]
        } else if hb2 > c {
            let ht = (hb2 - c).sqrt();
            [-hb - ht, -hb + ht]
        } else {
            [NO_INTERSECTION, NO_INTERSECTION]
        }
    }
}

impl Default for FerrariSolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOL)
    }
}

/// Store a positive finite root at `idx`, returning the next free index.
#[inline]
fn place_root(roots: &mut [f64; 4], root: f64, idx: usize) -> usize {
    if root > 0.0 && root != NO_INTERSECTION {
        roots[idx] = root;
        idx + 1
    } else {
        idx
    }
}
