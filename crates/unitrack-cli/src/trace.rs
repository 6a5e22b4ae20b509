//! Ray walks and the `trace` command.

use anyhow::Result;
use serde::Serialize;
use unitrack::{Navigator, OnSurface, UnitParams};
use unitrack_math::{LocalVolumeId, Point3, Vec3};

/// Path through one volume.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub volume: LocalVolumeId,
    /// Infinite for the last segment of an escaping ray.
    pub length: f64,
    /// Boundary at the end of the segment.
    pub exit: Option<OnSurface>,
}

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkEnd {
    /// No boundary ahead.
    Escaped,
    /// Started on a surface or left every volume.
    Lost,
    /// Crossing limit reached.
    StepLimit,
}

/// Walk a ray from `pos`, reporting each volume it passes through.
pub fn walk<F>(
    nav: &mut Navigator,
    pos: Point3,
    dir: Vec3,
    max_steps: usize,
    mut visit: F,
) -> WalkEnd
where
    F: FnMut(&Navigator, &Segment),
{
    if !nav.initialize(pos, dir) {
        return WalkEnd::Lost;
    }
    for _ in 0..max_steps {
        let Some(volume) = nav.volume() else {
            return WalkEnd::Lost;
        };
        let step = nav.find_next_step();
        if !step.boundary {
            visit(
                nav,
                &Segment {
                    volume,
                    length: step.distance,
                    exit: None,
                },
            );
            return WalkEnd::Escaped;
        }
        nav.move_to_boundary();
        let segment = Segment {
            volume,
            length: step.distance,
            exit: nav.surface(),
        };
        visit(nav, &segment);
        nav.cross_boundary();
    }
    WalkEnd::StepLimit
}

#[derive(Debug, Serialize)]
struct SegmentReport {
    volume: String,
    start: f64,
    length: Option<f64>,
    surface: Option<u32>,
    sense: Option<String>,
    normal: Option<[f64; 3]>,
}

#[derive(Debug, Serialize)]
struct TraceReport {
    pos: [f64; 3],
    dir: [f64; 3],
    segments: Vec<SegmentReport>,
    end: WalkEnd,
}

/// Walk one ray and print every crossing.
pub fn run(
    params: &UnitParams,
    pos: Point3,
    dir: Vec3,
    max_steps: usize,
    json: bool,
) -> Result<()> {
    let mut nav = Navigator::new(params);
    let mut segments = Vec::new();
    let mut traveled = 0.0;

    let end = walk(&mut nav, pos, dir, max_steps, |nav, seg| {
        segments.push(SegmentReport {
            volume: params.volume(seg.volume).label().to_string(),
            start: traveled,
            length: seg.length.is_finite().then_some(seg.length),
            surface: seg.exit.map(|s| s.id.get()),
            sense: seg.exit.map(|s| s.sense.to_string()),
            normal: seg.exit.map(|_| nav.normal().into()),
        });
        traveled += seg.length;
    });

    let report = TraceReport {
        pos: pos.into(),
        dir: dir.into(),
        segments,
        end,
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{:>4}  {:<20} {:>12} {:>12}  exit", "step", "volume", "start", "length");
    for (i, seg) in report.segments.iter().enumerate() {
        let length = seg.length.map_or("inf".to_string(), |l| format!("{l:.6}"));
        let exit = match (seg.surface, &seg.sense) {
            (Some(surface), Some(sense)) => format!("surface {surface} ({sense})"),
            _ => "-".to_string(),
        };
        println!(
            "{:>4}  {:<20} {:>12.6} {:>12}  {}",
            i, seg.volume, seg.start, length, exit
        );
    }
    println!("end: {:?}", report.end);
    Ok(())
}
