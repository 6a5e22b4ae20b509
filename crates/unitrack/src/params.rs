//! Read-only arena of surfaces, volumes, connectivity and the BIH.

use unitrack_bih::{BihBuilder, BihTree};
use unitrack_csg::{
    convert_logic, format_logic, is_operator_token, logic_depth, parse_logic, LogicError,
    LogicInt, LogicNotation, LNOT, LTRUE,
};
use unitrack_math::{BBox, FaceId, LocalSurfaceId, LocalVolumeId, Tolerance};
use unitrack_surf::Surface;

use crate::evaluate::LogicStack;
use crate::input::{UnitInput, VolumeFlag, VolumeInput};
use crate::options::{SensePolicy, UnitOptions};
use crate::{InputError, Result};

/// Tracking properties of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VolumeFlags {
    /// Crossing a face may leave the track inside the volume.
    pub internal_surfaces: bool,
    /// Background volume located by exclusion.
    pub implicit_vol: bool,
    /// Every face has an exact safety distance.
    pub simple_safety: bool,
}

/// One volume of a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeRecord {
    label: String,
    faces: Vec<LocalSurfaceId>,
    logic: Vec<LogicInt>,
    max_intersections: usize,
    flags: VolumeFlags,
}

impl VolumeRecord {
    /// Name from the input.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Bounding surfaces, sorted by id. Face `i` is `faces()[i]`.
    pub fn faces(&self) -> &[LocalSurfaceId] {
        &self.faces
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Logic over face indices, in the unit's tracking notation.
    pub fn logic(&self) -> &[LogicInt] {
        &self.logic
    }

    /// Largest number of surface crossings along one ray.
    pub fn max_intersections(&self) -> usize {
        self.max_intersections
    }

    /// Tracking flags.
    pub fn flags(&self) -> VolumeFlags {
        self.flags
    }

    /// Whether the nearest face crossing always leaves the volume.
    pub fn simple_intersection(&self) -> bool {
        !self.flags.internal_surfaces && !self.flags.implicit_vol
    }

    /// Face index of a surface, if it bounds this volume.
    #[inline]
    pub fn find_face(&self, surface: LocalSurfaceId) -> Option<FaceId> {
        self.faces
            .binary_search(&surface)
            .ok()
            .map(|i| FaceId::new(i as u32))
    }

    /// Surface of a face.
    #[inline]
    pub fn get_surface(&self, face: FaceId) -> LocalSurfaceId {
        self.faces[face.index()]
    }
}

/// Immutable description of one universe, shared by every track.
#[derive(Debug, Clone)]
pub struct UnitParams {
    label: String,
    tol: Tolerance,
    logic_notation: LogicNotation,
    sense_policy: SensePolicy,
    surfaces: Vec<Surface>,
    volumes: Vec<VolumeRecord>,
    connectivity: Vec<Vec<LocalVolumeId>>,
    bih: BihTree,
    background: Option<LocalVolumeId>,
    max_faces: usize,
    max_intersections: usize,
}

impl UnitParams {
    /// Validate an input description and build the tracking data.
    pub fn from_input(input: &UnitInput, options: &UnitOptions) -> Result<Self> {
        let tol = options.tol.or(input.tol).unwrap_or_default();
        if !tol.is_valid() {
            return Err(InputError::Tolerance(tol));
        }

        let surfaces = input
            .surfaces
            .iter()
            .enumerate()
            .map(|(index, s)| {
                Surface::try_from(s).map_err(|source| InputError::Surface { index, source })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut volumes = Vec::with_capacity(input.volumes.len());
        let mut bboxes = Vec::with_capacity(input.volumes.len());
        for (index, vol) in input.volumes.iter().enumerate() {
            let record = build_volume(index, vol, &surfaces, input.logic_notation, options)?;
            let bbox = match (&vol.bbox, record.flags.implicit_vol) {
                (Some(bbox), false) => BBox::from(bbox),
                _ => BBox::infinite(),
            };
            bboxes.push(if bbox.is_valid() { bbox.bumped(&tol) } else { bbox });
            volumes.push(record);
        }
        if volumes.is_empty() {
            return Err(InputError::NoVolumes);
        }

        let background = check_background(input, &volumes)?;

        let mut connectivity = vec![Vec::new(); surfaces.len()];
        let mut implicit = Vec::new();
        for (i, vol) in volumes.iter().enumerate() {
            let id = LocalVolumeId::new(i as u32);
            if vol.flags.implicit_vol {
                implicit.push(id);
                continue;
            }
            for surface in &vol.faces {
                connectivity[surface.index()].push(id);
            }
        }
        for (i, neighbors) in connectivity.iter().enumerate() {
            if neighbors.is_empty() {
                log::warn!("surface {i} of unit '{}' bounds no volume", input.label);
            }
        }

        let bih = BihBuilder::new(options.max_leaf_size)?.build(bboxes, &implicit)?;

        let max_faces = volumes.iter().map(VolumeRecord::num_faces).max().unwrap_or(0);
        let max_intersections = volumes
            .iter()
            .map(VolumeRecord::max_intersections)
            .max()
            .unwrap_or(0);

        log::debug!(
            "built unit '{}': {} surfaces, {} volumes, at most {} faces and {} intersections \
             per volume",
            input.label,
            surfaces.len(),
            volumes.len(),
            max_faces,
            max_intersections
        );

        Ok(Self {
            label: input.label.clone(),
            tol,
            logic_notation: options.logic_notation,
            sense_policy: options.sense_policy,
            surfaces,
            volumes,
            connectivity,
            bih,
            background,
            max_faces,
            max_intersections,
        })
    }

    /// Name from the input.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Comparison tolerance.
    pub fn tolerance(&self) -> &Tolerance {
        &self.tol
    }

    /// Notation of every volume's logic.
    pub fn logic_notation(&self) -> LogicNotation {
        self.logic_notation
    }

    /// Sense calculator used by trackers of this unit.
    pub fn sense_policy(&self) -> SensePolicy {
        self.sense_policy
    }

    /// All surfaces.
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// One surface.
    pub fn surface(&self, id: LocalSurfaceId) -> &Surface {
        &self.surfaces[id.index()]
    }

    /// Number of surfaces.
    pub fn num_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    /// All volumes.
    pub fn volumes(&self) -> &[VolumeRecord] {
        &self.volumes
    }

    /// One volume.
    pub fn volume(&self, id: LocalVolumeId) -> &VolumeRecord {
        &self.volumes[id.index()]
    }

    /// Number of volumes.
    pub fn num_volumes(&self) -> usize {
        self.volumes.len()
    }

    /// First volume with the given label.
    pub fn find_volume(&self, label: &str) -> Option<LocalVolumeId> {
        self.volumes
            .iter()
            .position(|v| v.label == label)
            .map(|i| LocalVolumeId::new(i as u32))
    }

    /// Non-implicit volumes bounded by a surface, in increasing order.
    pub fn neighbors(&self, surface: LocalSurfaceId) -> &[LocalVolumeId] {
        &self.connectivity[surface.index()]
    }

    /// Acceleration structure over volume bounding boxes.
    pub fn bih(&self) -> &BihTree {
        &self.bih
    }

    /// Volume claiming points no other volume encloses.
    pub fn background(&self) -> Option<LocalVolumeId> {
        self.background
    }

    /// Largest face count of any volume.
    pub fn max_faces(&self) -> usize {
        self.max_faces
    }

    /// Largest intersection count of any volume.
    pub fn max_intersections(&self) -> usize {
        self.max_intersections
    }
}

/// Validate one volume and convert its logic to the tracking notation.
fn build_volume(
    index: usize,
    vol: &VolumeInput,
    surfaces: &[Surface],
    notation: LogicNotation,
    options: &UnitOptions,
) -> Result<VolumeRecord> {
    if vol.faces.windows(2).any(|w| w[0] >= w[1]) {
        return Err(InputError::UnsortedFaces { volume: index });
    }
    if let Some(&surface) = vol.faces.iter().find(|&&s| s as usize >= surfaces.len()) {
        return Err(InputError::FaceOutOfRange {
            volume: index,
            surface,
        });
    }
    let faces: Vec<LocalSurfaceId> = vol.faces.iter().copied().map(LocalSurfaceId::new).collect();

    let logic_error = |source: LogicError| InputError::Logic {
        volume: index,
        source,
    };
    let logic = parse_logic(&vol.logic).map_err(logic_error)?;
    let postfix = convert_logic(&logic, notation, LogicNotation::Postfix).map_err(logic_error)?;
    if let Some(&face) = postfix
        .iter()
        .find(|&&t| !is_operator_token(t) && t as usize >= faces.len())
    {
        return Err(logic_error(LogicError::FaceNotInList {
            face,
            num_faces: faces.len(),
        }));
    }
    let depth = logic_depth(&postfix).map_err(logic_error)?;
    if depth > LogicStack::MAX_DEPTH {
        return Err(InputError::LogicTooDeep {
            volume: index,
            depth,
        });
    }

    let implicit_vol = vol.has_flag(VolumeFlag::ImplicitVol);
    if implicit_vol && postfix != [LTRUE, LNOT] {
        return Err(InputError::ImplicitLogic {
            volume: index,
            logic: format_logic(&postfix),
        });
    }

    let logic = match (notation, options.logic_notation) {
        (from, to) if from == to => logic,
        (LogicNotation::Postfix, to) => {
            convert_logic(&postfix, LogicNotation::Postfix, to).map_err(logic_error)?
        }
        (LogicNotation::Infix, _) => postfix,
    };

    let face_surfaces = || faces.iter().map(|s| &surfaces[s.index()]);
    let flags = VolumeFlags {
        internal_surfaces: vol.has_flag(VolumeFlag::InternalSurfaces),
        implicit_vol,
        simple_safety: !implicit_vol && face_surfaces().all(Surface::simple_safety),
    };
    let max_intersections = face_surfaces().map(Surface::num_intersections).sum();

    Ok(VolumeRecord {
        label: vol.label.clone(),
        faces,
        logic,
        max_intersections,
        flags,
    })
}

/// Check that the background, if any, is the only implicit volume.
fn check_background(input: &UnitInput, volumes: &[VolumeRecord]) -> Result<Option<LocalVolumeId>> {
    let background = match input.background {
        Some(index) if index as usize >= volumes.len() => {
            return Err(InputError::BackgroundOutOfRange(index));
        }
        Some(index) => {
            let vol = &volumes[index as usize];
            if !vol.flags.implicit_vol {
                return Err(InputError::BackgroundNotImplicit(index));
            }
            if !vol.faces.is_empty() {
                return Err(InputError::BackgroundHasFaces(index));
            }
            Some(LocalVolumeId::new(index))
        }
        None => None,
    };

    if let Some(i) = volumes
        .iter()
        .enumerate()
        .position(|(i, v)| v.flags.implicit_vol && Some(LocalVolumeId::new(i as u32)) != background)
    {
        return Err(InputError::ImplicitNotBackground(i));
    }
    Ok(background)
}
