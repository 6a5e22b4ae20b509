//! Tolerance pair and soft floating-point comparisons.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from constructing a [`Tolerance`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToleranceError {
    /// Relative tolerance outside of the open unit interval.
    #[error("relative tolerance {0} is out of range (must be in (0, 1))")]
    Relative(f64),
    /// Non-positive characteristic length.
    #[error("length scale {0} is invalid (must be positive)")]
    Length(f64),
}

/// Relative and absolute tolerance used by every soft comparison.
///
/// The absolute tolerance is usually the relative tolerance scaled by a
/// characteristic length of the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Relative error.
    pub rel: f64,
    /// Absolute error.
    pub abs: f64,
}

impl Tolerance {
    /// Square root of the smallest meaningful quadratic coefficient.
    ///
    /// Quadratic solvers treat `|a| < SQRT_QUADRATIC²` as linear.
    pub const SQRT_QUADRATIC: f64 = 1e-5;

    /// Default relative tolerance: roughly the square root of machine epsilon.
    pub const DEFAULT_REL: f64 = 1.5e-8;

    /// Default tolerance for a geometry with the given length scale.
    pub fn from_default(length: f64) -> Result<Self, ToleranceError> {
        Self::from_relative(Self::DEFAULT_REL, length)
    }

    /// Tolerance used by the default soft-equality comparator.
    pub fn from_softequal() -> Self {
        let seq = SoftEqual::default();
        Self {
            rel: seq.rel,
            abs: seq.abs,
        }
    }

    /// Construct from a relative tolerance and a length scale.
    ///
    /// Values tighter than machine precision are clamped with a warning.
    pub fn from_relative(rel: f64, length: f64) -> Result<Self, ToleranceError> {
        if !(rel > 0.0 && rel < 1.0) {
            return Err(ToleranceError::Relative(rel));
        }
        if !(length > 0.0) {
            return Err(ToleranceError::Length(length));
        }

        let user = Self {
            rel,
            abs: rel * length,
        };
        let result = user.clamped();
        if result.rel != user.rel {
            log::warn!(
                "clamped relative tolerance {} to machine epsilon {}",
                user.rel,
                result.rel
            );
        }
        if result.abs != user.abs {
            log::warn!(
                "clamped absolute tolerance {} to minimum normal value {}",
                user.abs,
                result.abs
            );
        }
        Ok(result)
    }

    /// Copy clamped to machine epsilon (relative) and the minimum normal
    /// value (absolute).
    pub fn clamped(&self) -> Self {
        Self {
            rel: self.rel.max(f64::EPSILON),
            abs: self.abs.max(f64::MIN_POSITIVE),
        }
    }

    /// Whether both values are positive and the relative error is below one.
    pub fn is_valid(&self) -> bool {
        self.rel > 0.0 && self.rel < 1.0 && self.abs > 0.0
    }

    /// Soft-equality comparator using this tolerance.
    pub fn soft_equal(&self) -> SoftEqual {
        SoftEqual::new(self.rel, self.abs)
    }

    /// Soft-zero comparator using the absolute tolerance.
    pub fn soft_zero(&self) -> SoftZero {
        SoftZero::new(self.abs)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rel: Self::DEFAULT_REL,
            abs: Self::DEFAULT_REL,
        }
    }
}

/// Compare two values with a relative tolerance, falling back to an absolute
/// one near zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftEqual {
    rel: f64,
    abs: f64,
}

impl SoftEqual {
    /// Construct with relative and absolute thresholds.
    pub fn new(rel: f64, abs: f64) -> Self {
        debug_assert!(rel > 0.0 && abs > 0.0);
        Self { rel, abs }
    }

    /// Relative threshold.
    pub fn rel(&self) -> f64 {
        self.rel
    }

    /// Absolute threshold.
    pub fn abs(&self) -> f64 {
        self.abs
    }

    /// Whether `actual` is softly equal to `expected`.
    pub fn eq(&self, expected: f64, actual: f64) -> bool {
        let diff = (actual - expected).abs();
        if diff < self.rel * expected.abs() || diff < self.abs {
            return true;
        }
        // Equal infinities produce a NaN difference
        expected.is_infinite() && expected == actual
    }
}

impl Default for SoftEqual {
    fn default() -> Self {
        Self {
            rel: 1e-12,
            abs: 1e-14,
        }
    }
}

/// Compare a value against zero with an absolute tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftZero {
    abs: f64,
}

impl SoftZero {
    /// Construct with an absolute threshold.
    pub fn new(abs: f64) -> Self {
        debug_assert!(abs > 0.0);
        Self { abs }
    }

    /// Absolute threshold.
    pub fn abs(&self) -> f64 {
        self.abs
    }

    /// Whether the magnitude of `value` is within the threshold.
    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() <= self.abs
    }
}

impl Default for SoftZero {
    fn default() -> Self {
        Self { abs: 1e-14 }
    }
}
