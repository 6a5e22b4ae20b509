//! Point and ray queries on a [`BihTree`].

use unitrack_math::{inverse_direction, LocalVolumeId, Point3, Vec3};

use crate::tree::{BihNode, BihTree};

/// Volume whose bounding box a ray reaches, and the distance at which it
/// does so (or the accepted intersection distance in query results).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Distance along the ray.
    pub distance: f64,
    /// Volume id.
    pub vol: LocalVolumeId,
}

impl BihTree {
    /// First volume whose box contains `pos` and that `is_inside` accepts.
    ///
    /// Leaves are visited left to right, and volumes with infinite extent
    /// are tested after all of them.
    pub fn enclosing_volume<F>(&self, pos: &Point3, mut is_inside: F) -> Option<LocalVolumeId>
    where
        F: FnMut(LocalVolumeId) -> bool,
    {
        if !self.nodes.is_empty() {
            if let Some(vol) = self.enclose_node(0, pos, &mut is_inside) {
                return Some(vol);
            }
        }
        self.inf_vols.iter().copied().find(|&vol| is_inside(vol))
    }

    fn enclose_node<F>(
        &self,
        index: usize,
        pos: &Point3,
        is_inside: &mut F,
    ) -> Option<LocalVolumeId>
    where
        F: FnMut(LocalVolumeId) -> bool,
    {
        match &self.nodes[index] {
            BihNode::Inner(inner) => {
                let [left, right] = inner.contains(pos[inner.axis.index()]);
                if left {
                    let found = self.enclose_node(inner.children[0] as usize, pos, is_inside);
                    if found.is_some() {
                        return found;
                    }
                }
                if right {
                    return self.enclose_node(inner.children[1] as usize, pos, is_inside);
                }
                None
            }
            BihNode::Leaf(leaf) => leaf
                .vol_ids
                .iter()
                .copied()
                .find(|&vol| self.bboxes[vol.index()].contains(pos) && is_inside(vol)),
        }
    }

    /// Nearest volume the ray intersects within `max_dist`.
    ///
    /// Candidates are visited in order of increasing box entry distance.
    /// `visit` receives each volume and the nearest accepted distance so far,
    /// and returns the distance to the volume if it is hit at or before
    /// that limit. The search stops once the nearest hit is closer than the
    /// remaining entry distances.
    ///
    /// `candidates` is a reusable buffer; its contents are replaced.
    pub fn intersecting_volume<F>(
        &self,
        pos: &Point3,
        dir: &Vec3,
        max_dist: f64,
        candidates: &mut Vec<Candidate>,
        mut visit: F,
    ) -> Option<Candidate>
    where
        F: FnMut(LocalVolumeId, f64) -> Option<f64>,
    {
        candidates.clear();
        if !self.nodes.is_empty() {
            let inv_dir = inverse_direction(dir);
            self.collect_candidates(0, pos, dir, &inv_dir, max_dist, candidates);
        }
        candidates.extend(
            self.inf_vols
                .iter()
                .map(|&vol| Candidate { distance: 0.0, vol }),
        );
        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.vol.cmp(&b.vol)));

        let mut best: Option<Candidate> = None;
        let mut best_dist = max_dist;
        for candidate in candidates.iter() {
            if candidate.distance > best_dist {
                break;
            }
            if let Some(distance) = visit(candidate.vol, best_dist) {
                let nearer = match best {
                    Some(b) => distance < b.distance,
                    None => distance <= best_dist,
                };
                if nearer {
                    best_dist = distance;
                    best = Some(Candidate {
                        distance,
                        vol: candidate.vol,
                    });
                }
            }
        }
        best
    }

    fn collect_candidates(
        &self,
        index: usize,
        pos: &Point3,
        dir: &Vec3,
        inv_dir: &Vec3,
        max_dist: f64,
        out: &mut Vec<Candidate>,
    ) {
        match &self.nodes[index] {
            BihNode::Inner(inner) => {
                let i = inner.axis.index();
                let (lo, hi) = coord_range(pos[i], dir[i], max_dist);
                let [plane_left, plane_right] = inner.bounding_planes;
                if lo <= plane_left {
                    let child = inner.children[0] as usize;
                    self.collect_candidates(child, pos, dir, inv_dir, max_dist, out);
                }
                if hi >= plane_right {
                    let child = inner.children[1] as usize;
                    self.collect_candidates(child, pos, dir, inv_dir, max_dist, out);
                }
            }
            BihNode::Leaf(leaf) => {
                for &vol in &leaf.vol_ids {
                    if let Some((enter, _)) = self.bboxes[vol.index()].intersect_ray(pos, inv_dir) {
                        if enter <= max_dist {
                            out.push(Candidate {
                                distance: enter,
                                vol,
                            });
                        }
                    }
                }
            }
        }
    }
}

/// Range of one coordinate swept by the ray segment `[0, max_dist]`.
#[inline]
fn coord_range(pos: f64, dir: f64, max_dist: f64) -> (f64, f64) {
    if dir == 0.0 {
        return (pos, pos);
    }
    let end = pos + dir * max_dist;
    (pos.min(end), pos.max(end))
}
