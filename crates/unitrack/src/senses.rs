//! Sources of per-face senses for a volume at a point.
//!
//! All three calculators give identical answers. They differ in when the
//! surface functions are evaluated:
//!
//! - [`SenseCalculator`] evaluates every face up front into a buffer.
//! - [`LazySenseCalculator`] evaluates a face each time it is queried.
//! - [`CachedLazySenseCalculator`] evaluates a face the first time it is
//!   queried and remembers the result.
//!
//! Each takes an "on face" slot. If the slot is preset, that face reports
//! the preset sense without evaluating its surface. Otherwise the first face
//! found with the point exactly on it is recorded there and treated as
//! outside.

use unitrack_math::{FaceId, LocalSurfaceId, Point3};
use unitrack_surf::{Sense, SignedSense, Surface};

use crate::evaluate::SenseSource;
use crate::types::OnFace;

/// Sense of one face, honoring and updating the on-face slot.
#[inline]
fn calc_face_sense(
    surfaces: &[Surface],
    faces: &[LocalSurfaceId],
    pos: &Point3,
    face: FaceId,
    on_face: &mut Option<OnFace>,
) -> Sense {
    if let Some(on) = on_face {
        if on.id == face {
            return on.sense;
        }
    }
    let signed = surfaces[faces[face.index()].index()].sense(pos);
    if signed == SignedSense::On && on_face.is_none() {
        *on_face = Some(OnFace::new(face, Sense::Outside));
    }
    signed.to_sense()
}

/// Evaluates every face of a volume when constructed.
#[derive(Debug)]
pub struct SenseCalculator<'a> {
    senses: &'a [Sense],
}

impl<'a> SenseCalculator<'a> {
    /// Fill `storage` with the sense of each face.
    ///
    /// # Panics
    ///
    /// If `storage` is shorter than the face list.
    pub fn new(
        surfaces: &[Surface],
        faces: &[LocalSurfaceId],
        pos: &Point3,
        storage: &'a mut [Sense],
        on_face: &mut Option<OnFace>,
    ) -> Self {
        assert!(
            storage.len() >= faces.len(),
            "sense storage holds {} faces but the volume has {}",
            storage.len(),
            faces.len()
        );
        let senses = &mut storage[..faces.len()];
        for (i, sense) in senses.iter_mut().enumerate() {
            *sense = calc_face_sense(surfaces, faces, pos, FaceId::new(i as u32), on_face);
        }
        Self { senses }
    }

    /// Precomputed senses, indexed by face.
    pub fn senses(&self) -> &[Sense] {
        self.senses
    }
}

impl SenseSource for SenseCalculator<'_> {
    #[inline]
    fn sense(&mut self, face: FaceId) -> Sense {
        self.senses[face.index()]
    }
}

/// Evaluates a face's surface every time it is queried.
#[derive(Debug)]
pub struct LazySenseCalculator<'a> {
    surfaces: &'a [Surface],
    faces: &'a [LocalSurfaceId],
    pos: Point3,
    on_face: &'a mut Option<OnFace>,
}

impl<'a> LazySenseCalculator<'a> {
    /// Construct for the faces of one volume at a point.
    pub fn new(
        surfaces: &'a [Surface],
        faces: &'a [LocalSurfaceId],
        pos: &Point3,
        on_face: &'a mut Option<OnFace>,
    ) -> Self {
        Self {
            surfaces,
            faces,
            pos: *pos,
            on_face,
        }
    }
}

impl SenseSource for LazySenseCalculator<'_> {
    #[inline]
    fn sense(&mut self, face: FaceId) -> Sense {
        calc_face_sense(self.surfaces, self.faces, &self.pos, face, self.on_face)
    }
}

/// Evaluates each face at most once, remembering results in a
/// caller-owned cache.
#[derive(Debug)]
pub struct CachedLazySenseCalculator<'a> {
    lazy: LazySenseCalculator<'a>,
    cache: &'a mut [Option<Sense>],
}

impl<'a> CachedLazySenseCalculator<'a> {
    /// Construct with a cache that is cleared for the volume's faces.
    ///
    /// # Panics
    ///
    /// If `cache` is shorter than the face list.
    pub fn new(
        surfaces: &'a [Surface],
        faces: &'a [LocalSurfaceId],
        pos: &Point3,
        cache: &'a mut [Option<Sense>],
        on_face: &'a mut Option<OnFace>,
    ) -> Self {
        assert!(
            cache.len() >= faces.len(),
            "sense cache holds {} faces but the volume has {}",
            cache.len(),
            faces.len()
        );
        let cache = &mut cache[..faces.len()];
        cache.fill(None);
        Self {
            lazy: LazySenseCalculator::new(surfaces, faces, pos, on_face),
            cache,
        }
    }
}

impl SenseSource for CachedLazySenseCalculator<'_> {
    #[inline]
    fn sense(&mut self, face: FaceId) -> Sense {
        let slot = &mut self.cache[face.index()];
        if let Some(sense) = *slot {
            return sense;
        }
        let sense = self.lazy.sense(face);
        *slot = Some(sense);
        sense
    }
}
