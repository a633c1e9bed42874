//! cropscan - Automatic crop-box detection for scanned images
//!
//! CLI entry point

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use cropscan::{
    exit_codes, CliOverrides, Config, CropBoxDetector, CropBoxResult, CropError, RayOptions,
};

/// Recognized input file extensions
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

#[derive(Parser)]
#[command(name = "cropscan", version, about = "Detect crop boxes in scanned images")]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect crop boxes for one or more images
    Detect(DetectArgs),
    /// Print version and default detection parameters
    Info,
}

#[derive(Args)]
struct DetectArgs {
    /// Image files or directories to process
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Target aspect ratio of the visible image (width over height)
    #[arg(long)]
    ratio: Option<f64>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit machine-readable JSON
    #[arg(long)]
    json: bool,

    /// Brightness threshold override (0-255)
    #[arg(long)]
    threshold: Option<f64>,

    /// Inward search depth override, as a fraction of the canvas (max 0.5)
    #[arg(long)]
    max_depth: Option<f64>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Info => run_info(),
    };

    std::process::exit(match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::GENERAL_ERROR
        }
    });
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ============ Detect Command ============

fn run_detect(args: &DetectArgs) -> anyhow::Result<i32> {
    let start_time = Instant::now();

    let files = collect_image_files(&args.inputs)?;
    if files.is_empty() {
        eprintln!("Error: No image files found in input paths");
        return Ok(exit_codes::INPUT_NOT_FOUND);
    }

    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load().unwrap_or_default(),
    };
    config.apply_overrides(&CliOverrides {
        target_ratio: args.ratio,
        ray_threshold: args.threshold,
        ray_max_depth: args.max_depth,
        json: args.json,
    });

    let options = config.ray_options();
    let detector = match config.detection.target_ratio {
        Some(ratio) => CropBoxDetector::with_target_ratio(ratio),
        None => CropBoxDetector::new(),
    }
    .options(options);

    let bar = progress_bar(files.len() as u64, config.output.json);
    let outcomes: Vec<(PathBuf, Result<CropBoxResult, CropError>)> = files
        .par_iter()
        .map(|path| {
            let outcome = detector
                .load_file(path)
                .and_then(|loaded| loaded.detect_crop_box());
            bar.inc(1);
            (path.clone(), outcome)
        })
        .collect();
    bar.finish_and_clear();

    let mut failures = 0;
    for (path, outcome) in &outcomes {
        if outcome.is_err() {
            failures += 1;
        }
        if config.output.json {
            println!("{}", json_report(path, outcome));
        } else {
            print_report(path, outcome);
        }
    }

    if !config.output.json {
        println!(
            "Processed {} file(s) in {:.2}s ({} failed)",
            outcomes.len(),
            start_time.elapsed().as_secs_f64(),
            failures
        );
    }

    Ok(if failures > 0 {
        exit_codes::GENERAL_ERROR
    } else {
        exit_codes::SUCCESS
    })
}

/// Expand directories into their image files, pass files through as-is
fn collect_image_files(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in std::fs::read_dir(input)? {
                let path = entry?.path();
                if path.is_file() && has_image_extension(&path) {
                    files.push(path);
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
}

fn progress_bar(len: u64, quiet: bool) -> ProgressBar {
    if quiet || len < 2 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

fn print_report(path: &Path, outcome: &Result<CropBoxResult, CropError>) {
    match outcome {
        Ok(result) => {
            let e = &result.cropped.edges;
            println!(
                "{}: edges top={:.2} right={:.2} bottom={:.2} left={:.2} -> {:.0}x{:.0} (ratio {:.3})",
                path.display(),
                e.top,
                e.right,
                e.bottom,
                e.left,
                result.cropped.width,
                result.cropped.height,
                result.cropped.aspect_ratio,
            );
        }
        Err(e) => {
            println!("{}: FAILED ({e})", path.display());
        }
    }
}

fn json_report(path: &Path, outcome: &Result<CropBoxResult, CropError>) -> String {
    let value = match outcome {
        Ok(result) => serde_json::json!({
            "file": path.display().to_string(),
            "ok": true,
            "result": result,
        }),
        Err(e) => serde_json::json!({
            "file": path.display().to_string(),
            "ok": false,
            "error": e.to_string(),
        }),
    };
    value.to_string()
}

// ============ Info Command ============

fn run_info() -> anyhow::Result<i32> {
    let defaults = RayOptions::default();
    println!("cropscan {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Default detection parameters:");
    println!("  ray_amount:     {}", defaults.ray_amount);
    println!("  ray_amount_min: {}", defaults.ray_amount_min);
    println!("  ray_margin:     {}", defaults.ray_margin);
    println!("  ray_max_depth:  {}", defaults.ray_max_depth);
    println!("  ray_threshold:  {}", defaults.ray_threshold);
    println!("  ray_black:      {}", defaults.ray_black);
    println!("  ray_white:      {}", defaults.ray_white);
    println!("  ray_gamma:      {}", defaults.ray_gamma);
    if let Some(path) = Config::default_path() {
        println!();
        println!("Config file: {}", path.display());
    }
    Ok(exit_codes::SUCCESS)
}
