//! Which side of a surface a point lies on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side of a surface: inside is the negative half-space of its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    /// Function value is negative.
    Inside,
    /// Function value is positive (or zero, when coerced).
    Outside,
}

impl Sense {
    /// The opposite side.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Sense::Inside => Sense::Outside,
            Sense::Outside => Sense::Inside,
        }
    }

    /// Construct from a boolean "is inside".
    #[inline]
    pub fn from_inside(inside: bool) -> Self {
        if inside {
            Sense::Inside
        } else {
            Sense::Outside
        }
    }

    /// Whether this is [`Sense::Inside`].
    #[inline]
    pub fn is_inside(self) -> bool {
        self == Sense::Inside
    }

    /// Single-character representation: `-` inside, `+` outside.
    pub fn as_char(self) -> char {
        match self {
            Sense::Inside => '-',
            Sense::Outside => '+',
        }
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sense::Inside => f.write_str("inside"),
            Sense::Outside => f.write_str("outside"),
        }
    }
}

/// Side of a surface, distinguishing points exactly on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignedSense {
    /// Function value is negative.
    Inside,
    /// Function value is exactly zero.
    On,
    /// Function value is positive.
    Outside,
}

impl SignedSense {
    /// Classify a surface function value.
    #[inline]
    pub fn from_value(value: f64) -> Self {
        if value < 0.0 {
            SignedSense::Inside
        } else if value > 0.0 {
            SignedSense::Outside
        } else {
            SignedSense::On
        }
    }

    /// Collapse to a [`Sense`]; points on the surface count as outside.
    #[inline]
    pub fn to_sense(self) -> Sense {
        match self {
            SignedSense::Inside => Sense::Inside,
            SignedSense::On | SignedSense::Outside => Sense::Outside,
        }
    }
}

impl From<Sense> for SignedSense {
    fn from(sense: Sense) -> Self {
        match sense {
            Sense::Inside => SignedSense::Inside,
            Sense::Outside => SignedSense::Outside,
        }
    }
}

/// Whether a ray starts exactly on the surface being intersected.
///
/// When `On`, the root at zero distance is removed analytically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceState {
    /// Starting point is not on the surface.
    #[default]
    Off,
    /// Starting point is on the surface.
    On,
}

impl SurfaceState {
    /// Whether this is [`SurfaceState::On`].
    #[inline]
    pub fn is_on(self) -> bool {
        self == SurfaceState::On
    }
}

impl From<bool> for SurfaceState {
    fn from(on: bool) -> Self {
        if on {
            SurfaceState::On
        } else {
            SurfaceState::Off
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_sense() {
        assert_eq!(SignedSense::from_value(-1e-300), SignedSense::Inside);
        assert_eq!(SignedSense::from_value(0.0), SignedSense::On);
        assert_eq!(SignedSense::from_value(-0.0), SignedSense::On);
        assert_eq!(SignedSense::from_value(2.0), SignedSense::Outside);
        assert_eq!(SignedSense::On.to_sense(), Sense::Outside);
        assert_eq!(SignedSense::Inside.to_sense(), Sense::Inside);
    }

    #[test]
    fn test_flip() {
        assert_eq!(Sense::Inside.flip(), Sense::Outside);
        assert_eq!(Sense::Outside.flip().flip(), Sense::Outside);
        assert!(Sense::from_inside(true).is_inside());
        assert_eq!(Sense::Inside.to_string(), "inside");
        assert_eq!(Sense::Outside.as_char(), '+');
    }
}
