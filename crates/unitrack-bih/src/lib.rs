#![warn(missing_docs)]

//! Bounding interval hierarchy (BIH) over volume bounding boxes.
//!
//! A BIH is a binary tree whose inner nodes split space along one axis with
//! two planes: the left child holds boxes that end before the left plane and
//! the right child boxes that start after the right plane. The planes may
//! overlap, so a point can fall in both children.
//!
//! Volumes without a finite extent are kept in a separate list and always
//! tested last.

mod builder;
mod finder;
mod tree;

pub use builder::BihBuilder;
pub use finder::Candidate;
pub use tree::{BihInnerNode, BihLeafNode, BihNode, BihTree};

use thiserror::Error;
use unitrack_math::LocalVolumeId;

/// Errors from building a BIH.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BihError {
    /// Leaves must hold at least one volume.
    #[error("maximum leaf size must be positive")]
    ZeroLeafSize,
    /// A box with a lower bound above its upper bound or a NaN bound.
    #[error("bounding box of volume {0} is invalid")]
    InvalidBBox(LocalVolumeId),
    /// A box infinite along some but not all bounds.
    #[error("bounding box of volume {0} is partially infinite")]
    HalfInfiniteBBox(LocalVolumeId),
}

/// Result type for BIH construction.
pub type Result<T> = std::result::Result<T, BihError>;
