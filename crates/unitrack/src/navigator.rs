//! Single-track stepping on top of [`SimpleUnitTracker`].

use unitrack_math::{LocalVolumeId, Point3, Vec3};

use crate::params::UnitParams;
use crate::tracker::SimpleUnitTracker;
use crate::types::{Intersection, LocalState, OnSurface, TrackScratch};

/// Result of a step search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Propagation {
    /// Distance that may be moved.
    pub distance: f64,
    /// Whether a boundary lies at `distance`.
    pub boundary: bool,
}

/// One track moving through a unit.
///
/// Owns the track state, its scratch storage and the distance to the next
/// boundary, so a caller only deals with positions and steps.
#[derive(Debug, Clone)]
pub struct Navigator<'a> {
    tracker: SimpleUnitTracker<'a>,
    state: LocalState,
    next: Option<Intersection>,
    scratch: TrackScratch,
}

impl<'a> Navigator<'a> {
    /// Construct an uninitialized track for a unit.
    pub fn new(params: &'a UnitParams) -> Self {
        Self {
            tracker: SimpleUnitTracker::new(params),
            state: LocalState::new(Point3::origin(), Vec3::x()),
            next: None,
            scratch: TrackScratch::new(params),
        }
    }

    /// Underlying tracker.
    pub fn tracker(&self) -> &SimpleUnitTracker<'a> {
        &self.tracker
    }

    /// Current state.
    pub fn state(&self) -> &LocalState {
        &self.state
    }

    /// Place the track, locating its volume.
    ///
    /// Returns whether a volume was found; a point exactly on a surface or
    /// outside every volume is left without one.
    pub fn initialize(&mut self, pos: Point3, dir: Vec3) -> bool {
        self.state = LocalState::new(pos, dir);
        self.next = None;
        let init = self.tracker.initialize(&self.state, &mut self.scratch);
        self.state.volume = init.volume;
        self.state.surface = init.surface;
        init.is_found()
    }

    /// Current position.
    pub fn pos(&self) -> &Point3 {
        &self.state.pos
    }

    /// Current direction.
    pub fn dir(&self) -> &Vec3 {
        &self.state.dir
    }

    /// Volume containing the track, if any.
    pub fn volume(&self) -> Option<LocalVolumeId> {
        self.state.volume
    }

    /// Surface the track is on, if any.
    pub fn surface(&self) -> Option<OnSurface> {
        self.state.surface
    }

    /// Change direction, discarding the cached step.
    pub fn set_dir(&mut self, dir: Vec3) {
        self.state.dir = dir;
        self.next = None;
    }

    /// Distance to the next boundary.
    ///
    /// # Panics
    ///
    /// If the track is outside every volume.
    pub fn find_next_step(&mut self) -> Propagation {
        let next = match self.next {
            Some(next) if next.is_hit() || next.distance == f64::INFINITY => next,
            _ => {
                let next = self.tracker.intersect(&self.state, &mut self.scratch);
                self.next = Some(next);
                next
            }
        };
        to_propagation(next)
    }

    /// Distance to the next boundary, moving at most `max_dist`.
    pub fn find_next_step_max(&mut self, max_dist: f64) -> Propagation {
        if let Some(next) = self.next {
            if next.is_hit() && next.distance <= max_dist {
                return to_propagation(next);
            }
            if !next.is_hit() && next.distance >= max_dist {
                return Propagation {
                    distance: max_dist,
                    boundary: false,
                };
            }
        }
        let next = self.tracker.intersect_max(&self.state, &mut self.scratch, max_dist);
        self.next = Some(next);
        to_propagation(next)
    }

    /// Move onto the boundary found by the last step search.
    ///
    /// # Panics
    ///
    /// If no boundary was found.
    pub fn move_to_boundary(&mut self) {
        let Some(Intersection {
            surface: Some(surface),
            distance,
        }) = self.next
        else {
            panic!("move_to_boundary requires a boundary from find_next_step");
        };
        self.state.pos += self.state.dir * distance;
        self.state.surface = Some(surface);
        self.next = Some(Intersection {
            surface: Some(surface),
            distance: 0.0,
        });
    }

    /// Move along the direction without reaching a boundary.
    ///
    /// # Panics
    ///
    /// If the distance reaches the cached boundary or passes the end of a
    /// limited step search.
    pub fn move_internal(&mut self, distance: f64) {
        if let Some(next) = self.next.as_mut() {
            assert!(
                distance < next.distance || (distance == next.distance && !next.is_hit()),
                "internal move of {distance} reaches the next boundary at {}",
                next.distance
            );
            next.distance -= distance;
        }
        self.state.pos += self.state.dir * distance;
        self.state.surface = None;
    }

    /// Move to a nearby point in the same volume.
    pub fn move_internal_to(&mut self, pos: Point3) {
        self.state.pos = pos;
        self.state.surface = None;
        self.next = None;
    }

    /// Cross the current boundary into the neighboring volume.
    ///
    /// # Panics
    ///
    /// If the track is not on a boundary.
    pub fn cross_boundary(&mut self) {
        let Some(surface) = self.state.surface else {
            panic!("cross_boundary requires the track to be on a boundary");
        };
        self.state.surface = Some(surface.flipped());
        let init = self.tracker.cross_boundary(&self.state, &mut self.scratch);
        log::trace!("crossed surface {} into {:?}", surface.id, init.volume);
        self.state.volume = init.volume;
        self.state.surface = init.surface;
        self.next = None;
    }

    /// Distance that can be moved in any direction without crossing a face.
    ///
    /// Zero on a boundary or outside every volume.
    pub fn safety(&self) -> f64 {
        match self.state.volume {
            Some(volume) if self.state.surface.is_none() => {
                self.tracker.safety(&self.state.pos, volume)
            }
            _ => 0.0,
        }
    }

    /// Outward normal of the current boundary.
    ///
    /// # Panics
    ///
    /// If the track is not on a boundary.
    pub fn normal(&self) -> Vec3 {
        let Some(surface) = self.state.surface else {
            panic!("normal requires the track to be on a boundary");
        };
        self.tracker.normal(&self.state.pos, surface.id)
    }

    /// Whether the track is on a surface.
    pub fn is_on_boundary(&self) -> bool {
        self.state.surface.is_some()
    }

    /// Whether the track is outside every volume.
    pub fn is_outside(&self) -> bool {
        self.state.volume.is_none()
    }
}

fn to_propagation(next: Intersection) -> Propagation {
    Propagation {
        distance: next.distance,
        boundary: next.is_hit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::UnitOptions;
    use crate::testing::{sphere_in_box, two_spheres};
    use approx::assert_relative_eq;

    fn label<'p>(params: &'p UnitParams, nav: &Navigator) -> &'p str {
        params.volume(nav.volume().unwrap()).label()
    }

    #[test]
    fn test_nested_walk() {
        let params = UnitParams::from_input(&sphere_in_box(), &UnitOptions::default()).unwrap();
        let mut nav = Navigator::new(&params);
        assert!(nav.initialize(Point3::origin(), Vec3::x()));
        assert_eq!(label(&params, &nav), "ball");
        assert!(!nav.is_on_boundary());

        let mut visited = vec![label(&params, &nav).to_string()];
        let mut distances = Vec::new();
        loop {
            let step = nav.find_next_step();
            if !step.boundary {
                assert_eq!(step.distance, f64::INFINITY);
                break;
            }
            distances.push(step.distance);
            nav.move_to_boundary();
            assert!(nav.is_on_boundary());
            assert_eq!(nav.safety(), 0.0);
            assert_relative_eq!(nav.normal(), Vec3::x());
            nav.cross_boundary();
            visited.push(label(&params, &nav).to_string());
        }
        assert_eq!(visited, ["ball", "shell", "exterior"]);
        assert_eq!(distances, [1.0, 1.0]);
        assert_relative_eq!(nav.pos().x, 2.0);
    }

    #[test]
    fn test_internal_moves() {
        let params = UnitParams::from_input(&sphere_in_box(), &UnitOptions::default()).unwrap();
        let mut nav = Navigator::new(&params);
        nav.initialize(Point3::origin(), Vec3::x());

        assert_eq!(nav.find_next_step().distance, 1.0);
        nav.move_internal(0.25);
        assert_relative_eq!(nav.find_next_step().distance, 0.75);
        assert_relative_eq!(nav.safety(), 0.75);

        // Limited search reuses the cached boundary
        let step = nav.find_next_step_max(0.5);
        assert_eq!(
            step,
            Propagation {
                distance: 0.5,
                boundary: false
            }
        );
        let step = nav.find_next_step_max(2.0);
        assert!(step.boundary);
        assert_relative_eq!(step.distance, 0.75);

        nav.set_dir(Vec3::new(0.0, -1.0, 0.0));
        nav.move_internal_to(Point3::new(0.0, 0.5, 0.0));
        assert_relative_eq!(nav.find_next_step().distance, 1.5);
        assert_eq!(nav.volume(), Some(LocalVolumeId::new(2)));
    }

    #[test]
    fn test_move_to_step_limit() {
        let params = UnitParams::from_input(&sphere_in_box(), &UnitOptions::default()).unwrap();
        let mut nav = Navigator::new(&params);
        nav.initialize(Point3::origin(), Vec3::x());

        let step = nav.find_next_step_max(0.5);
        assert!(!step.boundary);
        nav.move_internal(step.distance);
        assert_eq!(*nav.pos(), Point3::new(0.5, 0.0, 0.0));
        assert_eq!(nav.surface(), None);
        assert_eq!(nav.volume(), Some(LocalVolumeId::new(2)));

        // Moving exactly the remaining miss distance is also allowed
        let step = nav.find_next_step_max(0.25);
        nav.move_internal(step.distance);
        assert_relative_eq!(nav.find_next_step().distance, 0.25);
    }

    #[test]
    #[should_panic(expected = "reaches the next boundary")]
    fn test_move_onto_boundary() {
        let params = UnitParams::from_input(&sphere_in_box(), &UnitOptions::default()).unwrap();
        let mut nav = Navigator::new(&params);
        nav.initialize(Point3::origin(), Vec3::x());
        let step = nav.find_next_step();
        nav.move_internal(step.distance);
    }

    #[test]
    fn test_background_walk() {
        let params = UnitParams::from_input(&two_spheres(), &UnitOptions::default()).unwrap();
        let mut nav = Navigator::new(&params);
        nav.initialize(Point3::new(-4.0, 0.0, 0.0), Vec3::x());
        assert_eq!(params.background(), nav.volume());

        let mut visited = Vec::new();
        while nav.find_next_step().boundary {
            nav.move_to_boundary();
            nav.cross_boundary();
            visited.push(label(&params, &nav).to_string());
        }
        assert_eq!(visited, ["left", "background", "right", "background"]);
        assert!(!nav.is_outside());
    }

    #[test]
    fn test_on_surface_start() {
        let params = UnitParams::from_input(&sphere_in_box(), &UnitOptions::default()).unwrap();
        let mut nav = Navigator::new(&params);
        assert!(!nav.initialize(Point3::new(1.0, 0.0, 0.0), Vec3::x()));
        assert!(nav.is_outside());
        assert_eq!(nav.safety(), 0.0);
    }

    #[test]
    #[should_panic(expected = "requires a boundary")]
    fn test_move_without_boundary() {
        let params = UnitParams::from_input(&sphere_in_box(), &UnitOptions::default()).unwrap();
        let mut nav = Navigator::new(&params);
        nav.initialize(Point3::new(5.0, 0.0, 0.0), Vec3::x());
        nav.find_next_step();
        nav.move_to_boundary();
    }
}
