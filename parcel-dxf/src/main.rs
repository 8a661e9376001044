//! CLI entry point for parcel-dxf

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use parcel_dxf::config::DrawConfig;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

/// Draw cadastral parcels from the ULDK registry as a DXF file
#[derive(Parser)]
#[command(name = "parcel-dxf")]
#[command(author, version)]
#[command(about = "Draw cadastral parcels from the ULDK registry as a DXF file")]
#[command(
    long_about = "Fetches parcel geometries from the Polish ULDK registry by identifier and \
draws them into a DXF file, as closed polygons or open line work, with optional labels and \
PUWG 2000 conversion."
)]
struct Cli {
    /// Parcel identifiers, separated by commas or newlines
    identifiers: Option<String>,

    /// Read identifiers from a file instead
    #[arg(short, long, conflicts_with = "identifiers")]
    input: Option<PathBuf>,

    /// Output DXF path
    #[arg(short, long, default_value = "parcels.dxf")]
    output: PathBuf,

    /// Draw open line work instead of closed polygons
    #[arg(long)]
    lines: bool,

    /// Label each parcel with its short identifier
    #[arg(long)]
    labels: bool,

    /// Convert coordinates from PUWG 1992 to the matching PUWG 2000 zone
    #[arg(long)]
    to_puwg2000: bool,

    /// AutoCAD color index for the polygon layer
    #[arg(long, default_value_t = 2)]
    polygon_color: u8,

    /// AutoCAD color index for the lines layer
    #[arg(long, default_value_t = 1)]
    line_color: u8,

    /// AutoCAD color index for the label layer
    #[arg(long, default_value_t = 3)]
    label_color: u8,

    /// Label text height in drawing units (default depends on target system)
    #[arg(long)]
    text_height: Option<f64>,

    /// Path to a JSON config file; flags above are ignored when set
    #[arg(long)]
    config: Option<PathBuf>,

    /// Registry base URL
    #[arg(long, default_value = uldk::DEFAULT_BASE_URL)]
    base_url: String,

    /// Maximum number of parcels fetched concurrently
    #[arg(long, alias = "threads")]
    jobs: Option<usize>,

    /// Write failed identifiers (comma-joined) to this file
    #[arg(long)]
    failed_log: Option<PathBuf>,

    /// Write the run report as JSON to this file
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => DrawConfig::load(path)?,
        None => DrawConfig {
            draw_as_lines: cli.lines,
            add_labels: cli.labels,
            convert_to_puwg2000: cli.to_puwg2000,
            polygon_color: cli.polygon_color,
            line_color: cli.line_color,
            label_color: cli.label_color,
            text_height: cli.text_height,
            output: None,
        },
    };

    let raw = match (&cli.identifiers, &cli.input) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?,
        (None, None) => {
            anyhow::bail!("no identifiers given; pass them inline or with --input")
        }
    };

    // A config file may pin the output path; the CLI flag is the fallback
    let output = config.output.clone().unwrap_or_else(|| cli.output.clone());

    info!(output = %output.display(), "starting batch");
    cli::cmd_draw(
        &raw,
        &config,
        &output,
        &cli.base_url,
        cli.jobs,
        cli.failed_log.as_deref(),
        cli.report_json.as_deref(),
    )
    .await?;

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
