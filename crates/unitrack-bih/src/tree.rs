//! BIH storage.

use unitrack_math::{Axis, BBox, LocalVolumeId};

/// Inner node with two overlapping half-spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct BihInnerNode {
    /// Partition axis.
    pub axis: Axis,
    /// Upper edge of the left child and lower edge of the right child.
    pub bounding_planes: [f64; 2],
    /// Indices of the left and right children.
    pub children: [u32; 2],
}

impl BihInnerNode {
    /// Whether a coordinate along the partition axis may lie in each child.
    #[inline]
    pub fn contains(&self, coord: f64) -> [bool; 2] {
        [coord <= self.bounding_planes[0], coord >= self.bounding_planes[1]]
    }
}

/// Leaf node listing volumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BihLeafNode {
    /// Volumes whose boxes overlap this leaf.
    pub vol_ids: Vec<LocalVolumeId>,
}

/// Node of a [`BihTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum BihNode {
    /// Partitioning node.
    Inner(BihInnerNode),
    /// Terminal node.
    Leaf(BihLeafNode),
}

/// Read-only BIH built by [`BihBuilder`](crate::BihBuilder).
///
/// Node 0 is the root when any volume has a finite box.
#[derive(Debug, Clone, Default)]
pub struct BihTree {
    pub(crate) nodes: Vec<BihNode>,
    pub(crate) bboxes: Vec<BBox>,
    pub(crate) inf_vols: Vec<LocalVolumeId>,
}

impl BihTree {
    /// All nodes, root first.
    pub fn nodes(&self) -> &[BihNode] {
        &self.nodes
    }

    /// Bounding box of every volume, indexed by volume id.
    pub fn bboxes(&self) -> &[BBox] {
        &self.bboxes
    }

    /// Volumes with infinite extent, tested after the tree.
    pub fn inf_vols(&self) -> &[LocalVolumeId] {
        &self.inf_vols
    }

    /// Number of leaf nodes.
    pub fn num_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, BihNode::Leaf(_)))
            .count()
    }

    /// Number of levels below and including the root.
    pub fn depth(&self) -> usize {
        fn depth_from(nodes: &[BihNode], index: usize) -> usize {
            match &nodes[index] {
                BihNode::Leaf(_) => 1,
                BihNode::Inner(inner) => {
                    1 + inner
                        .children
                        .iter()
                        .map(|&c| depth_from(nodes, c as usize))
                        .max()
                        .unwrap_or(0)
                }
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            depth_from(&self.nodes, 0)
        }
    }
}
