//! Bracketed root refinement.

/// Find a root of a function bracketed by a sign change.
///
/// Each step replaces one end of the bracket with the secant root, keeping
/// the sign change. Convergence is declared once `|f(x)| <= tol`.
pub struct RegulaFalsiSolver<F> {
    func: F,
    tol: f64,
}

impl<F: Fn(f64) -> f64> RegulaFalsiSolver<F> {
    /// Iteration cap; exceeding it is a logic error in the caller.
    pub const MAX_ITERS: usize = 50;

    /// Construct with a function and an absolute residual tolerance.
    pub fn new(func: F, tol: f64) -> Self {
        debug_assert!(tol > 0.0);
        Self { func, tol }
    }

    /// Solve in `[left, right]`, whose function values must differ in sign.
    ///
    /// # Panics
    ///
    /// Panics if the residual is not below tolerance after
    /// [`MAX_ITERS`](Self::MAX_ITERS) steps.
    pub fn solve(&self, mut left: f64, mut right: f64) -> f64 {
        let mut f_left = (self.func)(left);
        let mut f_right = (self.func)(right);
        debug_assert!(
            f_left.signum() != f_right.signum(),
            "root is not bracketed: f({left})={f_left}, f({right})={f_right}"
        );

        let mut root = left;
        let mut f_root = f_left;
        let mut iters = 0;
        while f_root.abs() > self.tol {
            assert!(
                iters < Self::MAX_ITERS,
                "regula falsi did not converge in [{left}, {right}]"
            );
            iters += 1;

            root = (left * f_right - right * f_left) / (f_right - f_left);
            f_root = (self.func)(root);

            if f_root.signum() == f_left.signum() {
                left = root;
                f_left = f_root;
            } else {
                right = root;
                f_right = f_root;
            }
        }
        root
    }
}
