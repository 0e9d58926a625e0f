//! FFmpeg log verbosity control.
//!
//! FFmpeg has its own logging system, separate from the Rust [`log`] crate,
//! and prints warnings to stderr by default. That is noisy for a service that
//! decodes arbitrary user uploads, so both binaries quiet it at startup and
//! expose a flag to turn it back up.

use std::str::FromStr;

use ffmpeg_next::util::log::Level;

/// FFmpeg internal log verbosity, most quiet first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FfmpegLogLevel {
    /// Print nothing at all.
    Quiet,
    /// Unrecoverable errors only.
    #[default]
    Error,
    /// Warnings and above (FFmpeg's own default).
    Warning,
    /// Informational messages and above.
    Info,
    /// Full debugging output.
    Debug,
}

impl FfmpegLogLevel {
    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Debug => Level::Debug,
        }
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" => Ok(FfmpegLogLevel::Quiet),
            "error" => Ok(FfmpegLogLevel::Error),
            "warning" => Ok(FfmpegLogLevel::Warning),
            "info" => Ok(FfmpegLogLevel::Info),
            "debug" => Ok(FfmpegLogLevel::Debug),
            other => Err(format!(
                "unknown FFmpeg log level '{other}' (expected quiet, error, warning, info, or debug)"
            )),
        }
    }
}

/// Set FFmpeg's internal log verbosity.
///
/// Controls what FFmpeg itself prints to stderr. Rust-side diagnostics go
/// through the `log` crate and are configured separately (e.g. `env_logger`).
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}
