#![warn(missing_docs)]

//! Single-universe CSG ray tracker.
//!
//! A unit is a set of surfaces and of volumes defined by logic over those
//! surfaces. [`UnitParams`] validates a [`UnitInput`] once and is then
//! shared read-only by any number of tracks. Each track owns a
//! [`TrackScratch`] and asks a [`SimpleUnitTracker`] (or the higher level
//! [`Navigator`]) which volume contains a point, how far the next boundary
//! is, and which volume lies across it.
//!
//! # Example
//!
//! ```
//! use unitrack::{Navigator, UnitInput, UnitOptions, UnitParams};
//! use unitrack_math::{Point3, Vec3};
//!
//! let input = UnitInput::from_json(r#"{
//!     "surfaces": [{"type": "sphere_centered", "radius": 1.0}],
//!     "volumes": [
//!         {"label": "outside", "faces": [0], "logic": "0"},
//!         {"label": "inside", "faces": [0], "logic": "0 ~"}
//!     ]
//! }"#).unwrap();
//! let params = UnitParams::from_input(&input, &UnitOptions::default()).unwrap();
//!
//! let mut nav = Navigator::new(&params);
//! nav.initialize(Point3::origin(), Vec3::x());
//! assert_eq!(params.volume(nav.volume().unwrap()).label(), "inside");
//!
//! let step = nav.find_next_step();
//! assert!(step.boundary);
//! assert!((step.distance - 1.0).abs() < 1e-12);
//! nav.move_to_boundary();
//! nav.cross_boundary();
//! assert_eq!(params.volume(nav.volume().unwrap()).label(), "outside");
//! ```

mod evaluate;
mod input;
mod navigator;
mod options;
mod params;
mod senses;
mod tracker;
mod types;

#[cfg(test)]
mod testing;

pub use evaluate::{InfixEvaluator, LogicEvaluator, LogicStack, SenseSource};
pub use input::{BBoxInput, SurfaceInput, UnitInput, VolumeFlag, VolumeInput};
pub use navigator::{Navigator, Propagation};
pub use options::{SensePolicy, UnitOptions};
pub use params::{UnitParams, VolumeFlags, VolumeRecord};
pub use senses::{CachedLazySenseCalculator, LazySenseCalculator, SenseCalculator};
pub use tracker::SimpleUnitTracker;
pub use types::{Initialization, Intersection, LocalState, OnFace, OnSurface, TrackScratch};

use thiserror::Error;
use unitrack_bih::BihError;
use unitrack_csg::LogicError;
use unitrack_math::Tolerance;
use unitrack_surf::SurfaceError;

/// Errors from reading or validating a unit description.
#[derive(Debug, Error)]
pub enum InputError {
    /// Malformed JSON.
    #[error("failed to parse unit input: {0}")]
    Json(#[from] serde_json::Error),
    /// Tolerance outside its valid range.
    #[error("invalid tolerance (rel {}, abs {})", .0.rel, .0.abs)]
    Tolerance(Tolerance),
    /// Surface with invalid coefficients.
    #[error("surface {index}: {source}")]
    Surface {
        /// Surface index.
        index: usize,
        /// Underlying error.
        source: SurfaceError,
    },
    /// Face list not strictly increasing.
    #[error("volume {volume}: faces must be sorted and unique")]
    UnsortedFaces {
        /// Volume index.
        volume: usize,
    },
    /// Face referencing a surface that does not exist.
    #[error("volume {volume}: surface {surface} does not exist")]
    FaceOutOfRange {
        /// Volume index.
        volume: usize,
        /// Offending surface id.
        surface: u32,
    },
    /// Logic that does not parse, convert or balance.
    #[error("volume {volume}: {source}")]
    Logic {
        /// Volume index.
        volume: usize,
        /// Underlying error.
        source: LogicError,
    },
    /// Logic too deeply nested for the evaluator.
    #[error("volume {volume}: logic needs stack depth {depth}")]
    LogicTooDeep {
        /// Volume index.
        volume: usize,
        /// Required depth.
        depth: usize,
    },
    /// Implicit volume whose logic is not "nowhere".
    #[error("volume {volume}: implicit volume logic must be '* ~', not '{logic}'")]
    ImplicitLogic {
        /// Volume index.
        volume: usize,
        /// Logic as postfix text.
        logic: String,
    },
    /// Implicit volume other than the background.
    #[error("volume {0} is implicit but is not the background")]
    ImplicitNotBackground(usize),
    /// Background index beyond the volume list.
    #[error("background volume {0} does not exist")]
    BackgroundOutOfRange(u32),
    /// Background volume without the implicit flag.
    #[error("background volume {0} must be flagged implicit_vol")]
    BackgroundNotImplicit(u32),
    /// Background volume with faces.
    #[error("background volume {0} must not have faces")]
    BackgroundHasFaces(u32),
    /// Unit with no volumes.
    #[error("unit has no volumes")]
    NoVolumes,
    /// Invalid bounding boxes or BIH options.
    #[error(transparent)]
    Bih(#[from] BihError),
}

/// Result type for unit construction.
pub type Result<T> = std::result::Result<T, InputError>;
