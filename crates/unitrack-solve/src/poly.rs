//! Fixed-degree polynomial evaluation.

/// Polynomial with coefficients in increasing order of power.
///
/// `PolyEvaluator::new([c0, c1, c2])` evaluates `c0 + c1 x + c2 x²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyEvaluator<const N: usize> {
    coeffs: [f64; N],
}

impl<const N: usize> PolyEvaluator<N> {
    /// Construct from coefficients, lowest power first.
    pub const fn new(coeffs: [f64; N]) -> Self {
        Self { coeffs }
    }

    /// Coefficients, lowest power first.
    pub fn coeffs(&self) -> &[f64; N] {
        &self.coeffs
    }

    /// Evaluate with Horner's method.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Evaluate the sum of absolute term magnitudes at `x`.
    ///
    /// This bounds the rounding error of [`eval`](Self::eval).
    pub fn eval_magnitude(&self, x: f64) -> f64 {
        let ax = x.abs();
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * ax + c.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval() {
        let p = PolyEvaluator::new([1.0, -2.0, 3.0]);
        assert_eq!(p.eval(0.0), 1.0);
        assert_eq!(p.eval(2.0), 1.0 - 4.0 + 12.0);
        assert_eq!(p.eval_magnitude(-2.0), 1.0 + 4.0 + 12.0);
    }

    #[test]
    fn test_empty_and_constant() {
        assert_eq!(PolyEvaluator::new([]).eval(3.0), 0.0);
        assert_eq!(PolyEvaluator::new([4.5]).eval(3.0), 4.5);
    }
}
