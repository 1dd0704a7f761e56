use crate::config::{Config, load_config};
use crate::ir::{Division, Point, Rect};
use crate::layout::{Floorplan, PlacementStrategy};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::parser::{parse_division_spec, parse_point, parse_size};
use crate::source::{DivisionSource, FileSource, default_office};
use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fplan", version, about = "Division layout engine for office floor plans")]
pub struct Args {
    /// Layout file (.json/.json5) or '-' for stdin. Defaults to the built-in office floor.
    #[arg(short = 'i', long = "input", global = true)]
    pub input: Option<PathBuf>,

    /// Output file for the JSON layout dump. Defaults to stdout.
    #[arg(short = 'o', long = "output", global = true)]
    pub output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile", global = true)]
    pub config: Option<PathBuf>,

    /// Single-line JSON output
    #[arg(long = "compact", global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve overlaps and print the resulting layout
    Resolve,
    /// Add one division and print the resulting layout
    Place {
        /// Compact form ID@X,Y:WxH, instead of --id/--size/--at
        #[arg(conflicts_with_all = ["id", "size", "at"])]
        spec: Option<String>,
        #[arg(long, required_unless_present = "spec")]
        id: Option<String>,
        /// Display name (defaults to the id)
        #[arg(long)]
        name: Option<String>,
        /// Size as WIDTHxHEIGHT
        #[arg(long, value_parser = parse_size_arg, required_unless_present = "spec")]
        size: Option<(f32, f32)>,
        /// Declared default position as X,Y
        #[arg(long, value_parser = parse_point_arg)]
        at: Option<(f32, f32)>,
        #[arg(long, value_enum, default_value_t = PlacementStrategy::Auto)]
        strategy: PlacementStrategy,
    },
    /// Drop a division at X,Y (as a drag would) and resolve around it
    Move {
        #[arg(long)]
        id: String,
        #[arg(long, value_parser = parse_point_arg)]
        to: (f32, f32),
    },
    /// List overlapping divisions; fails when any exist
    Check,
    /// Resolve and print the built-in office floor
    Demo,
}

fn parse_size_arg(raw: &str) -> Result<(f32, f32), String> {
    parse_size(raw).map_err(|err| err.to_string())
}

fn parse_point_arg(raw: &str) -> Result<(f32, f32), String> {
    parse_point(raw)
        .map(|point| (point.x, point.y))
        .map_err(|err| err.to_string())
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if args.compact {
        config.output.pretty = false;
    }

    let document = match (&args.command, args.input.as_deref()) {
        (Command::Demo, _) | (_, None) => default_office().load()?,
        (_, Some(path)) => FileSource::new(path).load()?,
    };
    let mut plan = Floorplan::new(document, config.layout.clone())?;

    match args.command {
        Command::Resolve | Command::Demo => {
            let resolution = plan.resolve()?;
            emit(&plan, Some(&resolution), &config, &args.output)
        }
        Command::Place {
            spec,
            id,
            name,
            size,
            at,
            strategy,
        } => {
            let mut division = match (spec, id, size) {
                (Some(spec), _, _) => parse_division_spec(&spec)?,
                (None, Some(id), Some((width, height))) => {
                    let (x, y) = at.unwrap_or((0.0, 0.0));
                    Division::new(id, Rect::new(x, y, width, height))
                }
                _ => bail!("place needs either SPEC or --id and --size"),
            };
            if let Some(name) = name {
                division = division.with_name(name);
            }
            plan.add_division(division, strategy)?;
            emit(&plan, None, &config, &args.output)
        }
        Command::Move { id, to } => {
            let resolution = plan.move_division(&id, Point::new(to.0, to.1))?;
            emit(&plan, Some(&resolution), &config, &args.output)
        }
        Command::Check => {
            let pairs = plan.overlapping_pairs();
            emit(&plan, None, &config, &args.output)?;
            if !pairs.is_empty() {
                let listed: Vec<String> = pairs.iter().map(|(a, b)| format!("{a}/{b}")).collect();
                return Err(anyhow::anyhow!(
                    "{} overlapping pair(s): {}",
                    pairs.len(),
                    listed.join(", ")
                ));
            }
            Ok(())
        }
    }
}

fn emit(
    plan: &Floorplan,
    resolution: Option<&crate::layout::Resolution>,
    config: &Config,
    output: &Option<PathBuf>,
) -> Result<()> {
    let dump = LayoutDump::from_floorplan(plan, resolution, config.output.include_overlaps);
    write_layout_dump(&dump, output.as_deref(), config.output.pretty)
}

/// Logs go to stderr so the JSON on stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
