//! vizseg - Segment rendered pages into visual areas
//!
//! Reads rendered box trees stored as JSON, runs the segmentation pipeline
//! on every page and writes the resulting area trees as JSON or as an
//! indented text dump.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;
use vizseg_core::segm::{FindLineParams, SortMode, SortParams, SuperAreaParams};
use vizseg_core::{AreaSnapshot, AreaTree, Page, SegmParams, Segmenter, TextDump};

/// Output type for the area trees.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum, Default)]
enum OutputType {
    /// Indented text, one area per line (default)
    #[default]
    Text,
    /// JSON snapshot of the area tree
    Json,
}

/// Final ordering of the areas.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum SortArg {
    /// Keep the order of the grouping
    None,
    /// Sort by position
    Position,
    /// Sort by position keeping text lines together (default)
    #[default]
    Lines,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::None => SortMode::None,
            SortArg::Position => SortMode::Position,
            SortArg::Lines => SortMode::Lines,
        }
    }
}

/// Segments rendered web pages into a tree of visual areas.
#[derive(Parser, Debug)]
#[command(name = "vizseg")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more JSON files with rendered pages
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Segmentation options ===
    /// Do not join the areas forming text lines
    #[arg(long = "no-lines", action = ArgAction::SetTrue)]
    no_lines: bool,

    /// Join only the line parts with a consistent font style
    #[arg(long = "consistent-style", action = ArgAction::SetTrue)]
    consistent_style: bool,

    /// Maximal gap between the parts of a line (relative to font size)
    #[arg(long = "max-line-em-space", default_value = "1.5")]
    max_line_em_space: f32,

    /// Maximal number of grouping passes per area
    #[arg(long = "depth-limit", default_value = "2")]
    depth_limit: u32,

    /// Group the children of a similar font style
    #[arg(long, action = ArgAction::SetTrue)]
    homogeneous: bool,

    /// Keep only the root and the leaf areas
    #[arg(long, action = ArgAction::SetTrue)]
    flatten: bool,

    /// Final ordering of the areas
    #[arg(long, value_enum, default_value = "lines")]
    sort: SortArg,

    /// Sort by columns instead of rows (position sort only)
    #[arg(long = "column-first", action = ArgAction::SetTrue)]
    column_first: bool,

    // === Output options ===
    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Type of output to generate
    #[arg(long = "output", value_enum, default_value = "text")]
    output_type: OutputType,
}

/// Guess the output type from the output file extension.
fn infer_output_type(path: &str) -> Option<OutputType> {
    match Path::new(path).extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "json" => Some(OutputType::Json),
        "txt" => Some(OutputType::Text),
        _ => None,
    }
}

fn build_params(args: &Args) -> Result<SegmParams> {
    let lines = FindLineParams::new(args.consistent_style, args.max_line_em_space)
        .context("invalid line options")?;
    Ok(SegmParams {
        find_lines: !args.no_lines,
        lines,
        super_areas: SuperAreaParams::new(args.depth_limit),
        homogeneous_leaves: args.homogeneous,
        flatten: args.flatten,
        sort: args.sort.into(),
        sort_params: SortParams {
            column_first: args.column_first,
        },
        ..SegmParams::default()
    })
}

fn write_tree<W: Write>(
    out: &mut W,
    path: &Path,
    tree: &AreaTree,
    output_type: OutputType,
    many: bool,
) -> Result<()> {
    match output_type {
        OutputType::Text => {
            if many {
                writeln!(out, "== {}", path.display())?;
            }
            write!(out, "{}", TextDump::new(tree))?;
        }
        OutputType::Json => {
            serde_json::to_writer_pretty(&mut *out, &AreaSnapshot::of(tree, tree.root()))
                .context("failed to write JSON")?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();

    let params = build_params(&args)?;

    let output_type = if args.output_type == OutputType::Text && args.outfile != "-" {
        infer_output_type(&args.outfile).unwrap_or(args.output_type)
    } else {
        args.output_type
    };

    let pages = args
        .files
        .iter()
        .map(|path| {
            Page::from_path(path).with_context(|| format!("failed to read {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let segmenter = Segmenter::new(params);
    let trees = segmenter.segment_all(&pages);

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    let many = args.files.len() > 1;
    for (path, tree) in args.files.iter().zip(trees) {
        let tree = tree.with_context(|| format!("failed to segment {}", path.display()))?;
        info!("{}: {} areas", path.display(), tree.len());
        write_tree(&mut output, path, &tree, output_type, many)?;
    }
    output.flush()?;
    Ok(())
}
