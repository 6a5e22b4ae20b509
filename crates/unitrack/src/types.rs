//! Per-track state, query results and scratch buffers.

use unitrack_bih::Candidate;
use unitrack_math::{FaceId, LocalSurfaceId, LocalVolumeId, Point3, Vec3};
use unitrack_surf::{Sense, NO_INTERSECTION};

use crate::params::UnitParams;

/// A surface and the side of it a point is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OnSurface {
    /// Surface in the unit.
    pub id: LocalSurfaceId,
    /// Side of the surface.
    pub sense: Sense,
}

impl OnSurface {
    /// Construct from a surface and sense.
    pub fn new(id: LocalSurfaceId, sense: Sense) -> Self {
        Self { id, sense }
    }

    /// Same surface, other side.
    pub fn flipped(self) -> Self {
        Self {
            id: self.id,
            sense: self.sense.flip(),
        }
    }
}

/// A face of one volume and the side of it a point is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OnFace {
    /// Face index in the volume.
    pub id: FaceId,
    /// Side of the face.
    pub sense: Sense,
}

impl OnFace {
    /// Construct from a face and sense.
    pub fn new(id: FaceId, sense: Sense) -> Self {
        Self { id, sense }
    }
}

/// Position, direction and logical location of a track within a unit.
///
/// `surface` is set only while the track is exactly on a boundary, and its
/// sense is the side of the surface the track is on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalState {
    /// Position.
    pub pos: Point3,
    /// Unit direction.
    pub dir: Vec3,
    /// Current volume, if known.
    pub volume: Option<LocalVolumeId>,
    /// Current boundary surface, if any.
    pub surface: Option<OnSurface>,
}

impl LocalState {
    /// State at a position with no logical location yet.
    pub fn new(pos: Point3, dir: Vec3) -> Self {
        Self {
            pos,
            dir,
            volume: None,
            surface: None,
        }
    }
}

/// Result of locating a point or crossing a boundary.
///
/// A missing volume means the point could not be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Initialization {
    /// Volume containing the point.
    pub volume: Option<LocalVolumeId>,
    /// Surface the point is on, with the sense in the new volume.
    pub surface: Option<OnSurface>,
}

impl Initialization {
    /// Whether a volume was found.
    pub fn is_found(&self) -> bool {
        self.volume.is_some()
    }
}

/// Distance to the next boundary.
///
/// The surface sense is the one *before* crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Boundary that will be reached, if any.
    pub surface: Option<OnSurface>,
    /// Distance along the direction.
    pub distance: f64,
}

impl Intersection {
    /// No boundary within the search range.
    pub fn miss(distance: f64) -> Self {
        Self {
            surface: None,
            distance,
        }
    }

    /// Whether a boundary was found.
    pub fn is_hit(&self) -> bool {
        self.surface.is_some()
    }
}

impl Default for Intersection {
    fn default() -> Self {
        Self::miss(NO_INTERSECTION)
    }
}

/// Candidate boundary distances for one volume.
#[derive(Debug, Clone, Default)]
pub(crate) struct IsectScratch {
    pub distances: Vec<f64>,
    pub faces: Vec<FaceId>,
    /// Indices into `distances` sorted by distance.
    pub order: Vec<usize>,
}

/// Per-face sense storage for the eager and cached calculators.
#[derive(Debug, Clone, Default)]
pub(crate) struct SenseScratch {
    pub senses: Vec<Sense>,
    pub cache: Vec<Option<Sense>>,
}

/// Caller-owned working storage for one track.
///
/// Sized once from the unit so that queries never allocate. A scratch must
/// not be shared between concurrent queries.
#[derive(Debug, Clone, Default)]
pub struct TrackScratch {
    pub(crate) isect: IsectScratch,
    pub(crate) senses: SenseScratch,
    pub(crate) candidates: Vec<Candidate>,
}

impl TrackScratch {
    /// Allocate storage for the largest volume of a unit.
    pub fn new(params: &UnitParams) -> Self {
        let num_isect = params.max_intersections();
        let num_faces = params.max_faces();
        Self {
            isect: IsectScratch {
                distances: vec![NO_INTERSECTION; num_isect],
                faces: vec![FaceId::new(0); num_isect],
                order: vec![0; num_isect],
            },
            senses: SenseScratch {
                senses: vec![Sense::Outside; num_faces],
                cache: vec![None; num_faces],
            },
            candidates: Vec::with_capacity(params.num_volumes()),
        }
    }

    /// Number of intersections that fit.
    pub fn intersection_capacity(&self) -> usize {
        self.isect.distances.len()
    }

    /// Number of per-face senses that fit.
    pub fn face_capacity(&self) -> usize {
        self.senses.senses.len()
    }
}
