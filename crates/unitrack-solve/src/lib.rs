#![warn(missing_docs)]

//! Root solvers for ray-surface intersection.
//!
//! - [`QuadraticSolver`] - positive roots of quadrics, with on-surface and
//!   near-linear special cases
//! - [`FerrariSolver`] - positive real roots of quartics via a resolvent cubic
//! - [`RegulaFalsiSolver`] - bracketed iterative root refinement
//! - [`PolyEvaluator`] - Horner evaluation of fixed-degree polynomials
//!
//! Every solver reports missing roots with [`NO_INTERSECTION`].

mod ferrari;
mod poly;
mod quadratic;
mod regula_falsi;

pub use ferrari::FerrariSolver;
pub use poly::PolyEvaluator;
pub use quadratic::QuadraticSolver;
pub use regula_falsi::RegulaFalsiSolver;

/// Sentinel for "no positive real root".
pub const NO_INTERSECTION: f64 = f64::INFINITY;

/// Sign of a value, returning zero for zero.
#[inline]
pub(crate) fn signum(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
