//! BIH construction using the surface area heuristic.

use unitrack_math::{Axis, BBox, LocalVolumeId, Point3};

use crate::tree::{BihInnerNode, BihLeafNode, BihNode, BihTree};
use crate::{BihError, Result};

/// Number of SAH buckets per axis.
const NUM_BUCKETS: usize = 12;

/// Relative cost of traversing an inner node.
const TRAVERSAL_COST: f64 = 0.125;

/// Volume being partitioned.
#[derive(Debug, Clone, Copy)]
struct Item {
    vol: LocalVolumeId,
    bbox: BBox,
    center: Point3,
}

/// Builds a [`BihTree`] from per-volume bounding boxes.
#[derive(Debug, Clone, Copy)]
pub struct BihBuilder {
    max_leaf_size: usize,
}

impl BihBuilder {
    /// Default number of volumes per leaf.
    pub const DEFAULT_MAX_LEAF_SIZE: usize = 2;

    /// Construct with the largest number of volumes a leaf may hold.
    pub fn new(max_leaf_size: usize) -> Result<Self> {
        if max_leaf_size == 0 {
            return Err(BihError::ZeroLeafSize);
        }
        Ok(Self { max_leaf_size })
    }

    /// Largest number of volumes per leaf.
    pub fn max_leaf_size(&self) -> usize {
        self.max_leaf_size
    }

    /// Build from boxes indexed by volume id.
    ///
    /// Implicit volumes are left out of the tree entirely. Fully infinite
    /// boxes go to the infinite-volume list.
    pub fn build(&self, bboxes: Vec<BBox>, implicit: &[LocalVolumeId]) -> Result<BihTree> {
        let mut items = Vec::with_capacity(bboxes.len());
        let mut inf_vols = Vec::new();

        for (i, bbox) in bboxes.iter().enumerate() {
            let vol = LocalVolumeId::new(i as u32);
            if implicit.contains(&vol) {
                continue;
            }
            if !bbox.is_valid() {
                return Err(BihError::InvalidBBox(vol));
            }
            if bbox.is_infinite() {
                inf_vols.push(vol);
            } else if bbox.is_half_infinite() {
                return Err(BihError::HalfInfiniteBBox(vol));
            } else {
                items.push(Item {
                    vol,
                    bbox: *bbox,
                    center: bbox.center(),
                });
            }
        }

        let mut nodes = Vec::new();
        if !items.is_empty() {
            self.build_node(&mut items, &mut nodes);
        }

        let tree = BihTree {
            nodes,
            bboxes,
            inf_vols,
        };
        log::debug!(
            "built BIH: {} nodes, {} leaves, depth {}, {} infinite volumes",
            tree.nodes.len(),
            tree.num_leaves(),
            tree.depth(),
            tree.inf_vols.len()
        );
        Ok(tree)
    }

    /// Recursively append the subtree for `items`, returning its index.
    fn build_node(&self, items: &mut [Item], nodes: &mut Vec<BihNode>) -> u32 {
        let index = nodes.len() as u32;

        if items.len() <= self.max_leaf_size {
            nodes.push(BihNode::Leaf(BihLeafNode {
                vol_ids: items.iter().map(|item| item.vol).collect(),
            }));
            return index;
        }

        let (axis, mid) = match find_best_split(items) {
            Some((axis, pos)) => {
                let mid = partition(items, axis, pos);
                if mid == 0 || mid == items.len() {
                    median_split(items)
                } else {
                    (axis, mid)
                }
            }
            None => median_split(items),
        };

        // Reserve this node's slot before the children
        nodes.push(BihNode::Leaf(BihLeafNode {
            vol_ids: Vec::new(),
        }));

        let (left, right) = items.split_at_mut(mid);
        let i = axis.index();
        let bounding_planes = [
            left.iter()
                .map(|item| item.bbox.upper[i])
                .fold(f64::NEG_INFINITY, f64::max),
            right
                .iter()
                .map(|item| item.bbox.lower[i])
                .fold(f64::INFINITY, f64::min),
        ];
        let children = [self.build_node(left, nodes), self.build_node(right, nodes)];

        nodes[index as usize] = BihNode::Inner(BihInnerNode {
            axis,
            bounding_planes,
            children,
        });
        index
    }
}

impl Default for BihBuilder {
    fn default() -> Self {
        Self {
            max_leaf_size: Self::DEFAULT_MAX_LEAF_SIZE,
        }
    }
}

/// Bounds of the item centers.
fn center_bounds(items: &[Item]) -> BBox {
    let mut bounds = BBox::empty();
    for item in items {
        bounds.include_point(&item.center);
    }
    bounds
}

/// Find the axis and center coordinate with the lowest SAH cost.
fn find_best_split(items: &[Item]) -> Option<(Axis, f64)> {
    let centers = center_bounds(items);
    let mut total = BBox::empty();
    for item in items {
        total = total.union(&item.bbox);
    }
    let total_area = total.surface_area();
    if total_area <= 0.0 {
        return None;
    }

    let mut best: Option<(Axis, f64)> = None;
    let mut best_cost = f64::INFINITY;

    for axis in Axis::ALL {
        let i = axis.index();
        let axis_min = centers.lower[i];
        let axis_extent = centers.upper[i] - axis_min;
        if axis_extent <= 0.0 {
            continue;
        }

        let mut counts = [0usize; NUM_BUCKETS];
        let mut bounds = [BBox::empty(); NUM_BUCKETS];
        for item in items {
            let b = ((item.center[i] - axis_min) / axis_extent * NUM_BUCKETS as f64) as usize;
            let b = b.min(NUM_BUCKETS - 1);
            counts[b] += 1;
            bounds[b] = bounds[b].union(&item.bbox);
        }

        for split in 1..NUM_BUCKETS {
            let (left_count, left_bounds) = accumulate(&counts[..split], &bounds[..split]);
            let (right_count, right_bounds) = accumulate(&counts[split..], &bounds[split..]);
            if left_count == 0 || right_count == 0 {
                continue;
            }

            let cost = TRAVERSAL_COST
                + left_bounds.surface_area() / total_area * left_count as f64
                + right_bounds.surface_area() / total_area * right_count as f64;
            if cost < best_cost {
                best_cost = cost;
                best = Some((axis, axis_min + split as f64 / NUM_BUCKETS as f64 * axis_extent));
            }
        }
    }
    best
}

fn accumulate(counts: &[usize], bounds: &[BBox]) -> (usize, BBox) {
    let mut total = BBox::empty();
    let mut count = 0;
    for (&c, b) in counts.iter().zip(bounds) {
        if c > 0 {
            count += c;
            total = total.union(b);
        }
    }
    (count, total)
}

/// Move items with centers below `pos` to the front, returning their count.
fn partition(items: &mut [Item], axis: Axis, pos: f64) -> usize {
    let i = axis.index();
    let mut left = 0;
    let mut right = items.len();
    while left < right {
        if items[left].center[i] < pos {
            left += 1;
        } else {
            right -= 1;
            items.swap(left, right);
        }
    }
    left
}

/// Split in half along the axis with the widest spread of centers.
fn median_split(items: &mut [Item]) -> (Axis, usize) {
    let extent = center_bounds(items).extent();
    let axis = Axis::ALL
        .into_iter()
        .fold(Axis::X, |best, ax| {
            if extent[ax.index()] > extent[best.index()] {
                ax
            } else {
                best
            }
        });
    let i = axis.index();
    items.sort_by(|a, b| {
        a.center[i]
            .total_cmp(&b.center[i])
            .then(a.vol.cmp(&b.vol))
    });
    (axis, items.len() / 2)
}
