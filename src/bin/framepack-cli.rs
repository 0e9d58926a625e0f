use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use framepack::{
    EncodePool, ExtractOptions, ExtractionMode, FfmpegLogLevel, FrameSource, extract,
    set_ffmpeg_log_level,
};
use indicatif::ProgressBar;
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framepack probe input.mp4 --json\n  framepack extract input.mp4 --skip-frames 1 --quality 85 --progress\n  framepack extract-fast input.mp4 --max-frames 50 --out sample.zip";

#[derive(Debug, Parser)]
#[command(
    name = "framepack",
    version,
    about = "Extract video frames into a zip archive",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Show a spinner while extracting.
    #[arg(long)]
    progress: bool,

    /// FFmpeg log level (quiet, error, warning, info, debug).
    #[arg(long)]
    ffmpeg_log_level: Option<String>,

    /// Number of encode worker threads.
    #[arg(long, default_value_t = framepack::DEFAULT_WORKERS)]
    workers: usize,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print video metadata (alias: info).
    #[command(visible_alias = "info")]
    Probe {
        /// Input video path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Extract every frame (optionally skipping) into a zip archive.
    #[command(
        after_help = "Examples:\n  framepack extract input.mp4\n  framepack extract input.mp4 --skip-frames 4 --quality 90 --out frames.zip"
    )]
    Extract {
        /// Input video path.
        input: PathBuf,

        /// Output archive path. Defaults to `<stem>_frames.zip` next to the input.
        #[arg(long)]
        out: Option<PathBuf>,

        /// JPEG quality (1-100).
        #[arg(long, default_value_t = framepack::DEFAULT_QUALITY as i64)]
        quality: i64,

        /// Number of frames to skip between kept frames.
        #[arg(long, default_value_t = 0)]
        skip_frames: u64,
    },

    /// Extract a bounded, evenly spread sample of frames.
    #[command(
        after_help = "Examples:\n  framepack extract-fast input.mp4\n  framepack extract-fast input.mp4 --max-frames 25"
    )]
    ExtractFast {
        /// Input video path.
        input: PathBuf,

        /// Output archive path. Defaults to `<stem>_frames_fast.zip` next to the input.
        #[arg(long)]
        out: Option<PathBuf>,

        /// JPEG quality (1-100).
        #[arg(long, default_value_t = framepack::DEFAULT_FAST_QUALITY as i64)]
        quality: i64,

        /// Maximum number of frames to keep.
        #[arg(long, default_value_t = 100)]
        max_frames: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        if cli.global.verbose { "info" } else { "warn" },
    ))
    .init();

    if let Err(message) = apply_ffmpeg_log_level(&cli.global) {
        eprintln!("{} {message}", "error:".red().bold());
        std::process::exit(2);
    }

    if let Err(error) = run(&cli) {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn apply_ffmpeg_log_level(global: &GlobalOptions) -> Result<(), String> {
    let level = match global.ffmpeg_log_level.as_deref() {
        Some(raw) => raw.parse()?,
        None => FfmpegLogLevel::Error,
    };
    set_ffmpeg_log_level(level);
    Ok(())
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Commands::Probe { input, json } => probe(input, *json),
        Commands::Extract {
            input,
            out,
            quality,
            skip_frames,
        } => run_extraction(
            cli,
            input,
            out.as_deref(),
            *quality,
            ExtractionMode::Exhaustive {
                skip_frames: *skip_frames,
            },
            "_frames.zip",
        ),
        Commands::ExtractFast {
            input,
            out,
            quality,
            max_frames,
        } => run_extraction(
            cli,
            input,
            out.as_deref(),
            *quality,
            ExtractionMode::Fast {
                max_frames: *max_frames,
            },
            "_frames_fast.zip",
        ),
    }
}

fn probe(input: &Path, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = FrameSource::open(input)?;
    let metadata = source.metadata();

    if as_json {
        let value = json!({
            "width": metadata.width,
            "height": metadata.height,
            "fps": metadata.frames_per_second,
            "total_frames": metadata.frame_count,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", input.display().to_string().bold());
        println!("  resolution   {}x{}", metadata.width, metadata.height);
        println!("  frame rate   {:.3} fps", metadata.frames_per_second);
        println!("  total frames {}", metadata.frame_count);
    }
    Ok(())
}

fn run_extraction(
    cli: &Cli,
    input: &Path,
    out: Option<&Path>,
    quality: i64,
    mode: ExtractionMode,
    suffix: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let pool = EncodePool::new(cli.global.workers)?;
    let options = ExtractOptions::new().with_quality(quality);
    let source = FrameSource::open(input)?;

    let spinner = if cli.global.progress {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message(format!("extracting {}", input.display()));
        spinner.enable_steady_tick(Duration::from_millis(120));
        Some(spinner)
    } else {
        None
    };

    let result = extract(source, mode, &options, &pool);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let extraction = result?;

    let out_path = match out {
        Some(path) => path.to_path_buf(),
        None => default_out_path(input, suffix),
    };
    std::fs::write(&out_path, extraction.archive.as_bytes())?;

    println!(
        "{} {} frames, {} bytes {} {}",
        "Packed".green().bold(),
        extraction.metadata.extracted_frames,
        extraction.archive.len(),
        "->".dimmed(),
        out_path.display().to_string().cyan(),
    );
    Ok(())
}

/// `<stem><suffix>` next to the input file.
fn default_out_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("video");
    input.with_file_name(format!("{stem}{suffix}"))
}
