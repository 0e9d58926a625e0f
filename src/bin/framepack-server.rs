use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use framepack::server::AppState;
use framepack::{DEFAULT_WORKERS, EncodePool, FfmpegLogLevel, set_ffmpeg_log_level};

#[derive(Debug, Parser)]
#[command(
    name = "framepack-server",
    version,
    about = "HTTP service that turns video uploads into zip archives of frames"
)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Number of encode worker threads, shared by all requests.
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// FFmpeg log level (quiet, error, warning, info, debug).
    #[arg(long, default_value = "error")]
    ffmpeg_log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = run().await {
        log::error!("{error}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level: FfmpegLogLevel = args.ffmpeg_log_level.parse()?;
    set_ffmpeg_log_level(level);

    // The encode pool exists once per process; every request borrows it.
    let pool = EncodePool::new(args.workers)?;
    log::info!("encode pool ready with {} workers", pool.workers());

    let state = Arc::new(AppState::new(pool));
    framepack::server::serve(args.bind, state).await?;
    Ok(())
}
