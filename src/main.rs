//! Order detector output from the command line.
//!
//! ```bash
//! ocr-region-order polygons.json --proximity 30 --row-tolerance 20 --pretty
//! ocr-region-order polygons.json --config pipeline.json
//! ```
//!
//! The input file holds a JSON array of 4-point polygons,
//! `[[[x, y], [x, y], [x, y], [x, y]], ...]`. The merged regions are printed
//! in reading order as JSON on stdout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ocr_region_order::{PipelineConfig, Polygon, RegionPipeline};
use tracing::info;

#[derive(Parser)]
#[command(name = "ocr-region-order")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Merge OCR text detections into blocks in reading order", long_about = None)]
struct Cli {
    /// JSON file with detector polygons
    input: PathBuf,

    /// JSON pipeline config; flags below override its fields
    #[arg(long, env = "OCR_REGION_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum edge gap for merging (pixels)
    #[arg(long, env = "OCR_REGION_PROXIMITY")]
    proximity: Option<f32>,

    /// Row clustering tolerance (pixels)
    #[arg(long = "row-tolerance", env = "OCR_REGION_ROW_TOLERANCE")]
    row_tolerance: Option<f32>,

    /// Minimum box width and height (pixels)
    #[arg(long = "min-box-size", env = "OCR_REGION_MIN_BOX_SIZE")]
    min_box_size: Option<f32>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => read_json::<PipelineConfig>(path).context("loading pipeline config")?,
        None => PipelineConfig::default(),
    };

    if let Some(v) = cli.proximity {
        config.proximity_threshold = v;
    }
    if let Some(v) = cli.row_tolerance {
        config.row_tolerance = v;
    }
    if let Some(v) = cli.min_box_size {
        config.min_box_size = v;
    }

    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let pipeline = RegionPipeline::new(config)?;

    let polygons: Vec<Polygon> = read_json(&cli.input)?;
    info!("Loaded {} polygons from {}", polygons.len(), cli.input.display());

    let layout = pipeline.layout(&polygons)?;
    info!(
        "{} detections -> {} regions in {} merge passes",
        layout.metadata.regions_detected, layout.metadata.regions_merged, layout.metadata.merge_passes
    );

    let json = if cli.pretty {
        serde_json::to_string_pretty(&layout)?
    } else {
        serde_json::to_string(&layout)?
    };
    println!("{json}");

    Ok(())
}
