//! imgcurate: turn a raw folder of images into a clean training corpus.
//!
//! A curation run walks an input directory, decides for every file whether
//! it belongs in the corpus (with a stable rejection code when it does not),
//! and copies accepted files under sequential names next to a label table.
//! The normalization chain then turns any accepted image into a fixed-size
//! grayscale canvas for training.
//!
//! # Modules
//!
//! - [`scan`]: recursive, deterministically sorted file discovery
//! - [`decode`]: decoder seam, decoded pixel arrays, content hashes
//! - [`gate`]: the six ordered validation rules and the dedup index
//! - [`curate`]: end-to-end curation runs and their reports
//! - [`normalize`]: grayscale conversion, canvas resize, subarea extraction
//! - [`dataset`]: sample access, batching and inspection of curated output
//! - [`error`]: error types for imgcurate operations

pub mod curate;
pub mod dataset;
pub mod decode;
pub mod error;
pub mod gate;
pub mod normalize;
pub mod preview;
pub mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub use error::{CurateError, DecodeFailure};

/// The imgcurate CLI application.
#[derive(Parser)]
#[command(name = "imgcurate")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate, deduplicate and copy images into a curated directory.
    Curate(CurateArgs),
    /// Load a curated directory and summarize its samples.
    Inspect(InspectArgs),
    /// Normalize one image and write PNG previews of each stage.
    Prepare(PrepareArgs),
}

/// Arguments for the curate subcommand.
#[derive(clap::Args)]
struct CurateArgs {
    /// Directory searched recursively for candidate images.
    input_dir: PathBuf,

    /// Directory that receives accepted images and the label table.
    output_dir: PathBuf,

    /// Rejection log path (truncated on every run).
    #[arg(long, env = "IMGCURATE_LOG_FILE")]
    log_file: PathBuf,

    /// Zero-padded width of output file names.
    #[arg(long, default_value_t = curate::DEFAULT_NAME_WIDTH)]
    name_width: usize,

    /// Largest accepted file size in bytes.
    #[arg(long, default_value_t = gate::DEFAULT_MAX_FILE_SIZE, env = "IMGCURATE_MAX_FILE_SIZE")]
    max_file_size: u64,

    /// Smallest accepted width and height in pixels.
    #[arg(long, default_value_t = gate::DEFAULT_MIN_DIMENSION, env = "IMGCURATE_MIN_DIMENSION")]
    min_dimension: usize,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Curated directory (as written by `curate`).
    dataset_dir: PathBuf,

    /// Canvas width samples are normalized to.
    #[arg(long, default_value_t = dataset::MIN_DATASET_SIDE)]
    width: usize,

    /// Canvas height samples are normalized to.
    #[arg(long, default_value_t = dataset::MIN_DATASET_SIDE)]
    height: usize,

    /// Samples per batch.
    #[arg(long, default_value_t = 32)]
    batch_size: usize,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the prepare subcommand.
#[derive(clap::Args)]
struct PrepareArgs {
    /// Image to normalize.
    image: PathBuf,

    /// Target canvas width.
    #[arg(long)]
    width: usize,

    /// Target canvas height.
    #[arg(long)]
    height: usize,

    /// Left edge of the subarea.
    #[arg(long, default_value_t = 0)]
    x: usize,

    /// Top edge of the subarea.
    #[arg(long, default_value_t = 0)]
    y: usize,

    /// Side length of the subarea.
    #[arg(long, default_value_t = normalize::MIN_CANVAS_SIDE)]
    size: usize,

    /// Directory receiving grayscale.png, canvas.png and subarea.png.
    #[arg(long)]
    out_dir: PathBuf,
}

/// Run the imgcurate CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), CurateError> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Curate(args)) => run_curate(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        Some(Commands::Prepare(args)) => run_prepare(args),
        None => {
            println!("imgcurate {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Curate raw image folders into clean training corpora.");
            println!();
            println!("Run 'imgcurate --help' for usage information.");
            Ok(())
        }
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Execute the curate subcommand.
fn run_curate(args: CurateArgs) -> Result<(), CurateError> {
    check_output_format(&args.output)?;

    let opts = curate::CurateOptions {
        gate: gate::GateOptions {
            max_file_size: args.max_file_size,
            min_dimension: args.min_dimension,
            ..Default::default()
        },
        name_width: args.name_width,
        ..Default::default()
    };

    let report = curate::curate_images(&args.input_dir, &args.output_dir, &args.log_file, &opts)?;

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", report),
    }
    Ok(())
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), CurateError> {
    check_output_format(&args.output)?;

    let options = dataset::DatasetOptions {
        width: args.width,
        height: args.height,
    };
    let images = dataset::ImagesDataset::open(&args.dataset_dir, options)?;
    let report = dataset::inspect_dataset(&images, args.batch_size)?;

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", report),
    }
    Ok(())
}

/// Execute the prepare subcommand.
fn run_prepare(args: PrepareArgs) -> Result<(), CurateError> {
    use decode::ImageDecoder;

    let decoded = decode::ImageCrateDecoder.decode(&args.image)?;
    let pixels = decoded.pixels.mapv(|v| v as f64);
    let mut gray = normalize::to_grayscale(pixels.view())?;
    // Grayscale input passes through unscaled; previews expect [0, 1].
    if decoded.pixels.ndim() == 2 {
        gray.mapv_inplace(|v| v / 255.0);
    }
    let (canvas, window) = normalize::prepare_image(
        gray.view().into_dyn(),
        args.width,
        args.height,
        normalize::Subarea::new(args.x, args.y, args.size),
    )?;

    std::fs::create_dir_all(&args.out_dir)?;
    for (name, array) in [
        ("grayscale.png", &gray),
        ("canvas.png", &canvas),
        ("subarea.png", &window),
    ] {
        let path = args.out_dir.join(name);
        preview::save_unit_gray_png(array, &path)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn check_output_format(output: &str) -> Result<(), CurateError> {
    match output {
        "text" | "json" => Ok(()),
        other => Err(CurateError::UnsupportedFormat(format!(
            "'{}' (supported: text, json)",
            other
        ))),
    }
}
