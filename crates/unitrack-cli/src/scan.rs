//! The `scan` command: a parallel grid of parallel rays.

use std::collections::BTreeMap;

use anyhow::{ensure, Result};
use rayon::prelude::*;
use serde::Serialize;
use unitrack::{Navigator, UnitParams};
use unitrack_math::{Axis, Point3, Vec3};

use crate::trace::{walk, WalkEnd};

/// Square grid of rays travelling along +`axis`.
#[derive(Debug, Clone, Copy)]
pub struct ScanGrid {
    pub axis: Axis,
    /// Coordinate along `axis` where every ray starts.
    pub start: f64,
    /// Half-width of the grid in the other two axes.
    pub half_width: f64,
    /// Rays per side.
    pub resolution: usize,
}

impl ScanGrid {
    /// Starting point of ray `(i, j)`, at the center of its grid cell.
    fn origin(&self, i: usize, j: usize) -> Point3 {
        let cell = 2.0 * self.half_width / self.resolution as f64;
        let u = -self.half_width + (i as f64 + 0.5) * cell;
        let v = -self.half_width + (j as f64 + 0.5) * cell;
        let (a, b) = match self.axis {
            Axis::X => (1, 2),
            Axis::Y => (2, 0),
            Axis::Z => (0, 1),
        };
        let mut pos = Point3::origin();
        pos[self.axis.index()] = self.start;
        pos[a] = u;
        pos[b] = v;
        pos
    }

    fn direction(&self) -> Vec3 {
        let mut dir = Vec3::zeros();
        dir[self.axis.index()] = 1.0;
        dir
    }
}

/// Totals over some rays.
#[derive(Debug, Clone, Default)]
struct Tally {
    crossings: usize,
    escaped: usize,
    lost: usize,
    step_limit: usize,
    /// Finite path length per volume id.
    path_length: Vec<f64>,
}

impl Tally {
    fn merge(mut self, other: Tally) -> Tally {
        self.crossings += other.crossings;
        self.escaped += other.escaped;
        self.lost += other.lost;
        self.step_limit += other.step_limit;
        if self.path_length.len() < other.path_length.len() {
            self.path_length.resize(other.path_length.len(), 0.0);
        }
        for (total, length) in self.path_length.iter_mut().zip(other.path_length) {
            *total += length;
        }
        self
    }
}

#[derive(Debug, Serialize)]
struct ScanReport {
    rays: usize,
    crossings: usize,
    escaped: usize,
    lost: usize,
    step_limit: usize,
    path_length: BTreeMap<String, f64>,
}

fn scan(params: &UnitParams, grid: &ScanGrid, max_steps: usize) -> Tally {
    let dir = grid.direction();
    let num_volumes = params.num_volumes();

    (0..grid.resolution * grid.resolution)
        .into_par_iter()
        .map_init(
            || Navigator::new(params),
            |nav, index| {
                let mut tally = Tally {
                    path_length: vec![0.0; num_volumes],
                    ..Default::default()
                };
                let pos = grid.origin(index / grid.resolution, index % grid.resolution);
                let end = walk(nav, pos, dir, max_steps, |_, seg| {
                    if seg.exit.is_some() {
                        tally.crossings += 1;
                    }
                    if seg.length.is_finite() {
                        tally.path_length[seg.volume.index()] += seg.length;
                    }
                });
                match end {
                    WalkEnd::Escaped => tally.escaped += 1,
                    WalkEnd::Lost => tally.lost += 1,
                    WalkEnd::StepLimit => tally.step_limit += 1,
                }
                tally
            },
        )
        .reduce(Tally::default, Tally::merge)
}

/// Trace the grid and print summary statistics.
pub fn run(params: &UnitParams, grid: &ScanGrid, max_steps: usize, json: bool) -> Result<()> {
    ensure!(grid.resolution > 0, "scan resolution must be positive");
    ensure!(grid.half_width > 0.0, "scan half-width must be positive");

    let tally = scan(params, grid, max_steps);
    let mut path_length = BTreeMap::new();
    for (vol, &length) in params.volumes().iter().zip(&tally.path_length) {
        if length > 0.0 {
            *path_length.entry(vol.label().to_string()).or_insert(0.0) += length;
        }
    }
    let report = ScanReport {
        rays: grid.resolution * grid.resolution,
        crossings: tally.crossings,
        escaped: tally.escaped,
        lost: tally.lost,
        step_limit: tally.step_limit,
        path_length,
    };
    if report.lost > 0 || report.step_limit > 0 {
        log::warn!(
            "{} rays lost and {} stopped at the step limit",
            report.lost,
            report.step_limit
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("rays:       {}", report.rays);
    println!("crossings:  {}", report.crossings);
    println!("escaped:    {}", report.escaped);
    println!("lost:       {}", report.lost);
    println!("step limit: {}", report.step_limit);
    println!("path length per volume:");
    for (label, length) in &report.path_length {
        println!("  {label:<20} {length:>14.6}");
    }
    Ok(())
}
