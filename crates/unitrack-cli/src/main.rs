//! unitrack CLI - inspect units and trace rays through them.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use serde::Serialize;
use unitrack::{Navigator, SensePolicy, UnitInput, UnitOptions, UnitParams};
use unitrack_csg::{
    build_tree_from_postfix, convert_logic, format_logic, logic_depth, parse_logic, LogicNotation,
};
use unitrack_math::{Axis, Point3, Vec3};

mod config;
mod scan;
mod trace;

use config::CliConfig;
use scan::ScanGrid;

#[derive(Parser)]
#[command(name = "unitrack")]
#[command(about = "Locate points and trace rays through a CSG unit", long_about = None)]
struct Cli {
    /// TOML file with tracking options
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Override the sense policy
    #[arg(long, global = true)]
    sense_policy: Option<PolicyArg>,
    /// Override the tracking logic notation
    #[arg(long, global = true)]
    notation: Option<NotationArg>,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a unit
    Info {
        /// Unit JSON file
        file: PathBuf,
    },
    /// Find the volume containing a point
    Locate {
        /// Unit JSON file
        file: PathBuf,
        /// Point coordinates
        #[arg(
            required = true,
            num_args = 3,
            value_names = ["X", "Y", "Z"],
            allow_negative_numbers = true
        )]
        point: Vec<f64>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Walk a ray through a unit, printing each crossing
    Trace {
        /// Unit JSON file
        file: PathBuf,
        /// Starting point
        #[arg(
            long,
            required = true,
            num_args = 3,
            value_names = ["X", "Y", "Z"],
            allow_negative_numbers = true
        )]
        pos: Vec<f64>,
        /// Direction (normalized before tracing)
        #[arg(
            long,
            required = true,
            num_args = 3,
            value_names = ["U", "V", "W"],
            allow_negative_numbers = true
        )]
        dir: Vec<f64>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Trace a square grid of parallel rays in parallel
    Scan {
        /// Unit JSON file
        file: PathBuf,
        /// Direction of travel
        #[arg(long, default_value = "z")]
        axis: AxisArg,
        /// Starting coordinate along the axis
        #[arg(long, allow_negative_numbers = true)]
        start: f64,
        /// Half-width of the grid
        #[arg(long)]
        half_width: f64,
        /// Rays per side
        #[arg(long, default_value_t = 64)]
        resolution: usize,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert logic text between notations
    Logic {
        /// Logic expression, such as "0 1 ~ &"
        expr: String,
        /// Notation of the input
        #[arg(long, default_value = "postfix")]
        from: NotationArg,
        /// Notation of the output
        #[arg(long, default_value = "infix")]
        to: NotationArg,
        /// Also print the simplified CSG tree
        #[arg(long)]
        tree: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Eager,
    Lazy,
    CachedLazy,
}

impl From<PolicyArg> for SensePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Eager => SensePolicy::Eager,
            PolicyArg::Lazy => SensePolicy::Lazy,
            PolicyArg::CachedLazy => SensePolicy::CachedLazy,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NotationArg {
    Postfix,
    Infix,
}

impl From<NotationArg> for LogicNotation {
    fn from(arg: NotationArg) -> Self {
        match arg {
            NotationArg::Postfix => LogicNotation::Postfix,
            NotationArg::Infix => LogicNotation::Infix,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AxisArg {
    X,
    Y,
    Z,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::X => Axis::X,
            AxisArg::Y => Axis::Y,
            AxisArg::Z => Axis::Z,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(policy) = cli.sense_policy {
        config.tracking.sense_policy = policy.into();
    }
    if let Some(notation) = cli.notation {
        config.tracking.logic_notation = notation.into();
    }

    match cli.command {
        Commands::Info { file } => {
            let params = load_unit(&file, &config.tracking)?;
            show_info(&file, &params);
        }
        Commands::Locate { file, point, json } => {
            let params = load_unit(&file, &config.tracking)?;
            locate(&params, to_point(&point), json)?;
        }
        Commands::Trace {
            file,
            pos,
            dir,
            json,
        } => {
            let params = load_unit(&file, &config.tracking)?;
            let dir = to_direction(&dir)?;
            trace::run(&params, to_point(&pos), dir, config.trace.max_steps, json)?;
        }
        Commands::Scan {
            file,
            axis,
            start,
            half_width,
            resolution,
            json,
        } => {
            let params = load_unit(&file, &config.tracking)?;
            let grid = ScanGrid {
                axis: axis.into(),
                start,
                half_width,
                resolution,
            };
            scan::run(&params, &grid, config.trace.max_steps, json)?;
        }
        Commands::Logic {
            expr,
            from,
            to,
            tree,
        } => {
            convert(&expr, from.into(), to.into(), tree)?;
        }
    }

    Ok(())
}

fn load_unit(path: &Path, options: &UnitOptions) -> Result<UnitParams> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let input = UnitInput::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to read unit {}", path.display()))?;
    let params = UnitParams::from_input(&input, options)
        .with_context(|| format!("invalid unit {}", path.display()))?;
    log::info!(
        "loaded unit '{}' with {} surfaces and {} volumes",
        params.label(),
        params.num_surfaces(),
        params.num_volumes()
    );
    Ok(params)
}

fn to_point(coords: &[f64]) -> Point3 {
    Point3::new(coords[0], coords[1], coords[2])
}

fn to_direction(coords: &[f64]) -> Result<Vec3> {
    let dir = Vec3::new(coords[0], coords[1], coords[2]);
    let norm = dir.norm();
    ensure!(norm > 0.0 && norm.is_finite(), "direction must be a nonzero vector");
    Ok(dir / norm)
}

fn show_info(path: &Path, params: &UnitParams) {
    let label = if params.label().is_empty() {
        "unnamed"
    } else {
        params.label()
    };
    println!("unit: {} ({})", label, path.display());
    println!("  Tolerance: rel {:e}, abs {:e}", params.tolerance().rel, params.tolerance().abs);
    println!("  Logic notation: {}", params.logic_notation());
    println!("  Sense policy: {}", params.sense_policy());
    println!("  Surfaces: {}", params.num_surfaces());
    for (i, surface) in params.surfaces().iter().enumerate() {
        println!("    {i}: {}", surface.kind());
    }

    println!("  Volumes: {}", params.num_volumes());
    for (i, vol) in params.volumes().iter().enumerate() {
        let flags = vol.flags();
        let mut notes = Vec::new();
        if flags.implicit_vol {
            notes.push("implicit");
        }
        if flags.internal_surfaces {
            notes.push("internal surfaces");
        }
        if flags.simple_safety {
            notes.push("simple safety");
        }
        if params.background().is_some_and(|bg| bg.index() == i) {
            notes.push("background");
        }
        println!(
            "    {i}: {} - {} faces, up to {} intersections, logic '{}' [{}]",
            vol.label(),
            vol.num_faces(),
            vol.max_intersections(),
            format_logic(vol.logic()),
            notes.join(", ")
        );
    }

    let bih = params.bih();
    println!("\nBIH:");
    println!("  Nodes: {}", bih.nodes().len());
    println!("  Leaves: {}", bih.num_leaves());
    println!("  Depth: {}", bih.depth());
    println!("  Infinite volumes: {}", bih.inf_vols().len());
}

#[derive(Debug, Serialize)]
struct LocateReport {
    pos: [f64; 3],
    volume: Option<u32>,
    label: Option<String>,
    safety: f64,
}

fn locate(params: &UnitParams, pos: Point3, json: bool) -> Result<()> {
    let mut nav = Navigator::new(params);
    nav.initialize(pos, Vec3::x());
    let report = LocateReport {
        pos: pos.into(),
        volume: nav.volume().map(|v| v.get()),
        label: nav.volume().map(|v| params.volume(v).label().to_string()),
        safety: nav.safety(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match (&report.volume, &report.label) {
            (Some(id), Some(label)) => {
                println!("volume {id} ({label}), safety {:.6}", report.safety)
            }
            _ => println!("no volume (outside the unit or on a surface)"),
        }
    }
    Ok(())
}

fn convert(expr: &str, from: LogicNotation, to: LogicNotation, show_tree: bool) -> Result<()> {
    let logic = parse_logic(expr).context("failed to parse logic")?;
    let converted = convert_logic(&logic, from, to).context("failed to convert logic")?;
    println!("{}", format_logic(&converted));

    if show_tree {
        let postfix = convert_logic(&logic, from, LogicNotation::Postfix)?;
        let depth = logic_depth(&postfix)?;
        let tree = build_tree_from_postfix(&postfix)?;
        println!("depth: {depth}");
        println!("tree: {tree}");
    }
    Ok(())
}
