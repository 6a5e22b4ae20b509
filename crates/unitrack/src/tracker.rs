//! Point location and boundary search within one unit.

use unitrack_csg::{LogicInt, LogicNotation};
use unitrack_math::{is_soft_unit_vector, FaceId, LocalSurfaceId, LocalVolumeId, Point3, Vec3};
use unitrack_surf::{Sense, SignedSense, SurfaceState, NO_INTERSECTION};

use crate::evaluate::{InfixEvaluator, LogicEvaluator, SenseSource};
use crate::options::SensePolicy;
use crate::params::{UnitParams, VolumeRecord};
use crate::senses::{CachedLazySenseCalculator, LazySenseCalculator, SenseCalculator};
use crate::types::{
    Initialization, Intersection, IsectScratch, LocalState, OnFace, OnSurface, SenseScratch,
    TrackScratch,
};

/// Surfaces with fewer neighbors than this are searched linearly when
/// crossing; others use the BIH.
const LINEAR_NEIGHBOR_LIMIT: usize = 3;

/// Stateless tracking queries on a [`UnitParams`].
///
/// All per-track storage is passed in through [`TrackScratch`], so one
/// tracker may serve any number of tracks concurrently.
#[derive(Debug, Clone, Copy)]
pub struct SimpleUnitTracker<'a> {
    params: &'a UnitParams,
}

impl<'a> SimpleUnitTracker<'a> {
    /// Construct with a reference to the unit data.
    pub fn new(params: &'a UnitParams) -> Self {
        Self { params }
    }

    /// Unit data.
    pub fn params(&self) -> &'a UnitParams {
        self.params
    }

    /// Find the volume containing a point.
    ///
    /// A point lying exactly on a surface is not placed. A point no volume
    /// claims goes to the background volume, if there is one.
    ///
    /// # Panics
    ///
    /// In debug builds, if the state already has a volume or surface.
    pub fn initialize(&self, state: &LocalState, scratch: &mut TrackScratch) -> Initialization {
        debug_assert!(
            state.volume.is_none() && state.surface.is_none(),
            "initialize requires a state without a volume or surface"
        );

        // One slot for the whole search: touching a surface anywhere fails
        let mut on_face = None;
        let senses = &mut scratch.senses;
        let found = self.params.bih().enclosing_volume(&state.pos, |id| {
            self.is_inside(self.params.volume(id), &state.pos, &mut on_face, senses)
        });

        if on_face.is_some() {
            return Initialization::default();
        }
        Initialization {
            volume: found.or(self.params.background()),
            surface: None,
        }
    }

    /// Find the volume on the other side of the current surface.
    ///
    /// The state's surface sense must already be the post-crossing side.
    /// Volumes bounded by the surface are searched first; if none claims the
    /// point it goes to the background volume, still on the surface.
    ///
    /// # Panics
    ///
    /// If the state has no volume or no surface.
    pub fn cross_boundary(&self, state: &LocalState, scratch: &mut TrackScratch) -> Initialization {
        let (Some(current), Some(surface)) = (state.volume, state.surface) else {
            panic!("cross_boundary requires a state with a volume and a surface");
        };

        let mut on_surface = None;
        let senses = &mut scratch.senses;
        let mut is_inside = |id: LocalVolumeId| -> bool {
            if id == current {
                return false;
            }
            let vol = self.params.volume(id);
            let mut on_face = vol
                .find_face(surface.id)
                .map(|face| OnFace::new(face, surface.sense));
            if !self.is_inside(vol, &state.pos, &mut on_face, senses) {
                return false;
            }
            on_surface = on_face.map(|f| OnSurface::new(vol.get_surface(f.id), f.sense));
            true
        };

        let neighbors = self.params.neighbors(surface.id);
        let found = if neighbors.len() < LINEAR_NEIGHBOR_LIMIT {
            neighbors.iter().copied().find(|&id| is_inside(id))
        } else {
            self.params.bih().enclosing_volume(&state.pos, &mut is_inside)
        };

        match found {
            Some(volume) => Initialization {
                volume: Some(volume),
                surface: on_surface,
            },
            None => Initialization {
                volume: self.params.background(),
                surface: Some(surface),
            },
        }
    }

    /// Distance to the next boundary, or infinity with no surface.
    ///
    /// # Panics
    ///
    /// If the state has no volume, or if the scratch is smaller than the
    /// unit requires. In debug builds, if the direction is not a unit vector.
    pub fn intersect(&self, state: &LocalState, scratch: &mut TrackScratch) -> Intersection {
        self.intersect_impl(state, scratch, NO_INTERSECTION)
    }

    /// Distance to the next boundary no farther than `max_dist`.
    ///
    /// A miss reports `max_dist` with no surface.
    pub fn intersect_max(
        &self,
        state: &LocalState,
        scratch: &mut TrackScratch,
        max_dist: f64,
    ) -> Intersection {
        debug_assert!(max_dist > 0.0, "search distance must be positive");
        let result = self.intersect_impl(state, scratch, max_dist);
        if result.is_hit() {
            result
        } else {
            Intersection::miss(max_dist)
        }
    }

    /// Lower bound on the distance to any face of a volume.
    ///
    /// Zero unless every face of the volume has an exact safety distance.
    pub fn safety(&self, pos: &Point3, volume: LocalVolumeId) -> f64 {
        let vol = self.params.volume(volume);
        if !vol.flags().simple_safety {
            return 0.0;
        }
        vol.faces()
            .iter()
            .filter_map(|&s| self.params.surface(s).safety(pos))
            .fold(f64::INFINITY, f64::min)
    }

    /// Outward normal of a surface at a point on it.
    pub fn normal(&self, pos: &Point3, surface: LocalSurfaceId) -> Vec3 {
        self.params.surface(surface).normal(pos)
    }

    fn intersect_impl(
        &self,
        state: &LocalState,
        scratch: &mut TrackScratch,
        max_dist: f64,
    ) -> Intersection {
        let Some(volume) = state.volume else {
            panic!("intersect requires a state with a volume");
        };
        debug_assert!(is_soft_unit_vector(&state.dir), "direction must be a unit vector");
        let vol = self.params.volume(volume);
        if vol.flags().implicit_vol {
            return self.background_intersect(state, scratch, max_dist);
        }

        let TrackScratch { isect, senses, .. } = scratch;
        let num_isect = self.calc_intersections(vol, state, max_dist, isect);
        if num_isect == 0 {
            Intersection::default()
        } else if vol.simple_intersection() {
            self.simple_intersect(state, vol, num_isect, isect)
        } else {
            sort_intersections(isect, num_isect);
            self.complex_intersect(
                state,
                vol,
                num_isect,
                isect,
                senses,
                Sense::Outside,
                f64::INFINITY,
            )
            .unwrap_or_default()
        }
    }

    /// Store every valid face crossing of a volume, returning the count.
    fn calc_intersections(
        &self,
        vol: &VolumeRecord,
        state: &LocalState,
        max_dist: f64,
        isect: &mut IsectScratch,
    ) -> usize {
        assert!(
            isect.distances.len() >= vol.max_intersections(),
            "intersection scratch holds {} but the volume needs {}",
            isect.distances.len(),
            vol.max_intersections()
        );
        let on_face = state.surface.and_then(|s| vol.find_face(s.id));

        let mut count = 0;
        for (i, &surface) in vol.faces().iter().enumerate() {
            let face = FaceId::new(i as u32);
            let surf = self.params.surface(surface);
            let surf_state = SurfaceState::from(on_face == Some(face));
            let distances = surf.intersections(&state.pos, &state.dir, surf_state);
            for &distance in &distances[..surf.num_intersections()] {
                if distance < NO_INTERSECTION && distance <= max_dist {
                    isect.distances[count] = distance;
                    isect.faces[count] = face;
                    isect.order[count] = count;
                    count += 1;
                }
            }
        }
        count
    }

    /// Nearest crossing of a volume that any crossing leaves.
    fn simple_intersect(
        &self,
        state: &LocalState,
        vol: &VolumeRecord,
        num_isect: usize,
        isect: &IsectScratch,
    ) -> Intersection {
        let distances = &isect.distances[..num_isect];
        let mut nearest = 0;
        for (i, &d) in distances.iter().enumerate().skip(1) {
            if d < distances[nearest] {
                nearest = i;
            }
        }

        let surface = vol.get_surface(isect.faces[nearest]);
        let sense = match state.surface {
            // Other side of the surface the track is on
            Some(on) if on.id == surface => on.sense,
            _ => {
                let signed = self.params.surface(surface).sense(&state.pos);
                debug_assert_ne!(signed, SignedSense::On);
                signed.to_sense()
            }
        };
        Intersection {
            surface: Some(OnSurface::new(surface, sense)),
            distance: distances[nearest],
        }
    }

    /// Walk sorted crossings until the volume logic becomes `target`.
    ///
    /// Crossings at or beyond `max_search_dist` end the search.
    #[allow(clippy::too_many_arguments)]
    fn complex_intersect(
        &self,
        state: &LocalState,
        vol: &VolumeRecord,
        num_isect: usize,
        isect: &IsectScratch,
        senses: &mut SenseScratch,
        target: Sense,
        max_search_dist: f64,
    ) -> Option<Intersection> {
        let surfaces = self.params.surfaces();
        let mut pos = state.pos;
        let mut on_face = state
            .surface
            .and_then(|s| vol.find_face(s.id).map(|face| OnFace::new(face, s.sense)));
        let mut previous = 0.0;

        for &i in &isect.order[..num_isect] {
            let distance = isect.distances[i];
            if distance >= max_search_dist {
                return None;
            }

            // Side of the face before moving onto it
            let face = isect.faces[i];
            let before =
                LazySenseCalculator::new(surfaces, vol.faces(), &pos, &mut on_face).sense(face);
            on_face = Some(OnFace::new(face, before.flip()));
            pos += state.dir * (distance - previous);

            if self.is_inside(vol, &pos, &mut on_face, senses) == target.is_inside() {
                return Some(Intersection {
                    surface: Some(OnSurface::new(vol.get_surface(face), before)),
                    distance,
                });
            }
            previous = distance;
        }
        None
    }

    /// Nearest entry into any volume from the background.
    fn background_intersect(
        &self,
        state: &LocalState,
        scratch: &mut TrackScratch,
        max_dist: f64,
    ) -> Intersection {
        let TrackScratch {
            isect,
            senses,
            candidates,
        } = scratch;
        let mut best: Option<Intersection> = None;

        self.params.bih().intersecting_volume(
            &state.pos,
            &state.dir,
            max_dist,
            candidates,
            |id, _| {
                let vol = self.params.volume(id);
                let num_isect = self.calc_intersections(vol, state, max_dist, isect);
                if num_isect == 0 {
                    return None;
                }
                sort_intersections(isect, num_isect);
                let max_search = best.map_or(f64::INFINITY, |b| b.distance);
                let found = self.complex_intersect(
                    state,
                    vol,
                    num_isect,
                    isect,
                    senses,
                    Sense::Inside,
                    max_search,
                )?;
                best = Some(found);
                Some(found.distance)
            },
        );
        best.unwrap_or_default()
    }

    /// Whether a point is inside a volume, using the unit's sense policy.
    fn is_inside(
        &self,
        vol: &VolumeRecord,
        pos: &Point3,
        on_face: &mut Option<OnFace>,
        senses: &mut SenseScratch,
    ) -> bool {
        let surfaces = self.params.surfaces();
        let faces = vol.faces();
        match self.params.sense_policy() {
            SensePolicy::Eager => {
                let mut calc =
                    SenseCalculator::new(surfaces, faces, pos, &mut senses.senses, on_face);
                self.evaluate(vol.logic(), &mut calc)
            }
            SensePolicy::Lazy => {
                let mut calc = LazySenseCalculator::new(surfaces, faces, pos, on_face);
                self.evaluate(vol.logic(), &mut calc)
            }
            SensePolicy::CachedLazy => {
                let mut calc = CachedLazySenseCalculator::new(
                    surfaces,
                    faces,
                    pos,
                    &mut senses.cache,
                    on_face,
                );
                self.evaluate(vol.logic(), &mut calc)
            }
        }
    }

    #[inline]
    fn evaluate<S: SenseSource>(&self, logic: &[LogicInt], senses: &mut S) -> bool {
        match self.params.logic_notation() {
            LogicNotation::Postfix => LogicEvaluator::new(logic).evaluate(senses),
            LogicNotation::Infix => InfixEvaluator::new(logic).evaluate(senses),
        }
    }
}

/// Order the first `num_isect` crossings by distance.
fn sort_intersections(isect: &mut IsectScratch, num_isect: usize) {
    let IsectScratch {
        distances, order, ..
    } = isect;
    order[..num_isect].sort_unstable_by(|&a, &b| distances[a].total_cmp(&distances[b]));
}
