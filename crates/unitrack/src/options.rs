//! Tracking options chosen when a unit is built.

use serde::{Deserialize, Serialize};
use unitrack_bih::BihBuilder;
use unitrack_csg::LogicNotation;
use unitrack_math::Tolerance;

/// How the tracker obtains face senses while evaluating volume logic.
///
/// The choice affects performance only; every policy gives the same result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensePolicy {
    /// Evaluate all faces before evaluating the logic.
    Eager,
    /// Evaluate faces as the logic queries them.
    #[default]
    Lazy,
    /// Evaluate faces as queried, at most once per evaluation.
    CachedLazy,
}

impl std::fmt::Display for SensePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SensePolicy::Eager => "eager",
            SensePolicy::Lazy => "lazy",
            SensePolicy::CachedLazy => "cached_lazy",
        })
    }
}

/// Options applied by [`UnitParams::from_input`](crate::UnitParams::from_input).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnitOptions {
    /// Overrides the tolerance given in the input.
    pub tol: Option<Tolerance>,
    /// Sense calculator used by the tracker.
    pub sense_policy: SensePolicy,
    /// Notation the volume logic is stored and evaluated in.
    pub logic_notation: LogicNotation,
    /// Largest number of volumes in a BIH leaf.
    pub max_leaf_size: usize,
}

impl Default for UnitOptions {
    fn default() -> Self {
        Self {
            tol: None,
            sense_policy: SensePolicy::default(),
            logic_notation: LogicNotation::default(),
            max_leaf_size: BihBuilder::DEFAULT_MAX_LEAF_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json() {
        let opts: UnitOptions =
            serde_json::from_str(r#"{"sense_policy": "cached_lazy", "logic_notation": "infix"}"#)
                .unwrap();
        assert_eq!(opts.sense_policy, SensePolicy::CachedLazy);
        assert_eq!(opts.logic_notation, LogicNotation::Infix);
        assert_eq!(opts.max_leaf_size, BihBuilder::DEFAULT_MAX_LEAF_SIZE);
        assert!(opts.tol.is_none());

        assert!(serde_json::from_str::<UnitOptions>(r#"{"policy": "lazy"}"#).is_err());
        assert_eq!(SensePolicy::CachedLazy.to_string(), "cached_lazy");
    }
}
