//! cloudsampler CLI - voxel-grid and stride subsampling of point clouds

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, info_span, Level};
use tracing_subscriber::FmtSubscriber;

use cloudsampler_core::SamplingType;
use cloudsampler_io::Delimiter;
use cloudsampler_pipeline::{PointCloudSource, SamplerConfig};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "cloudsampler")]
#[command(author, version, about = "Voxel-grid and stride subsampling of point clouds", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a point cloud file
    Info {
        /// Input point cloud (.las, .laz, .xyz, .txt, .csv)
        input: PathBuf,
    },
    /// Subsample a point cloud and write `{output}_{sampling}_sampled.xyz`
    Sample {
        /// Input point cloud (.las, .laz, .xyz, .txt, .csv)
        input: PathBuf,
        /// Sampling: closest, barycenter or factor
        #[arg(short, long, default_value = "closest")]
        sampling: String,
        /// Voxel edge length for grid samplings
        #[arg(long)]
        voxel_size: Option<f64>,
        /// Keep every N-th point (factor sampling)
        #[arg(short, long)]
        factor: Option<usize>,
        /// Output base path (defaults to the input path without extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Field delimiter: semicolon, comma, space or tab
        #[arg(short, long)]
        delimiter: Option<String>,
        /// Decimals written per coordinate
        #[arg(short, long)]
        precision: Option<usize>,
        /// Drop colors from the output
        #[arg(long)]
        no_colors: bool,
        /// JSON sampler configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List the available samplings
    Types,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")
}

fn load(input: &Path) -> Result<PointCloudSource> {
    let span = info_span!("source", input = %input.display());
    let source = PointCloudSource::from_file(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    Ok(source.with_span(span))
}

fn parse_delimiter(value: &str) -> Result<Delimiter> {
    let delimiter = match value.to_lowercase().as_str() {
        "semicolon" => Some(Delimiter::Semicolon),
        "comma" => Some(Delimiter::Comma),
        "space" => Some(Delimiter::Space),
        "tab" => Some(Delimiter::Tab),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Delimiter::from_char(c),
                _ => None,
            }
        }
    };
    delimiter.with_context(|| format!("Unknown delimiter: {}", value))
}

fn default_base(input: &Path) -> PathBuf {
    input.with_extension("")
}

fn print_info(input: &Path) -> Result<()> {
    let source = load(input)?;

    println!("File: {}", input.display());
    println!("Points: {}", source.len());
    println!("Colors: {}", if source.colors().is_some() { "yes" } else { "no" });
    if let Ok((min, max)) = source.bounds() {
        println!(
            "Bounds: ({:.6}, {:.6}, {:.6}) - ({:.6}, {:.6}, {:.6})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_sample(
    input: &Path,
    sampling: &str,
    voxel_size: Option<f64>,
    factor: Option<usize>,
    output: Option<PathBuf>,
    delimiter: Option<String>,
    precision: Option<usize>,
    no_colors: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let sampling: SamplingType = sampling.parse().context("Invalid --sampling")?;

    let mut config = match config {
        Some(path) => SamplerConfig::from_json_file(&path).context("Failed to load configuration")?,
        None => SamplerConfig::default(),
    };
    if let Some(delimiter) = delimiter {
        config.output.delimiter = parse_delimiter(&delimiter)?;
    }
    if precision.is_some() {
        config.output.precision = precision;
    }
    if no_colors {
        config.carry_colors = false;
        config.output.include_colors = false;
    }

    let mut source = load(input)?.with_config(config);

    let start = Instant::now();
    let sample = match (sampling, voxel_size, factor) {
        (SamplingType::Factor, _, Some(factor)) => source.factor_sample(factor),
        (SamplingType::Factor, _, None) => bail!("factor sampling needs --factor"),
        (grid, Some(voxel_size), _) => source.grid_sample(voxel_size, grid),
        (grid, None, _) => bail!("{} sampling needs --voxel-size", grid),
    }
    .with_context(|| format!("Failed to compute {} sample", sampling))?;
    let elapsed = start.elapsed();
    info!(input = source.len(), output = sample.len(), "sampled {}", sample.key());

    let base = output.unwrap_or_else(|| default_base(input));
    let path = source.save(sampling, &base).context("Failed to write output")?;

    println!("{} sample saved to: {}", sampling, path.display());
    println!("  Points: {} -> {}", source.len(), sample.len());
    println!("  Processing time: {:.2?}", elapsed);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input } => print_info(&input)?,
        Commands::Sample {
            input,
            sampling,
            voxel_size,
            factor,
            output,
            delimiter,
            precision,
            no_colors,
            config,
        } => run_sample(
            &input, &sampling, voxel_size, factor, output, delimiter, precision, no_colors, config,
        )?,
        Commands::Types => {
            for sampling in SamplingType::ALL {
                println!("{}", sampling);
            }
        }
    }

    Ok(())
}
