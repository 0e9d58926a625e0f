//! Error types for the `framepack` crate.
//!
//! This module defines [`FramepackError`], the unified error type returned by
//! all fallible operations in the crate. The variants are grouped by who is
//! at fault: a handful describe bad caller input (unreadable video, parameter
//! out of range) and the rest describe internal failures. The HTTP layer
//! relies on that split to choose between a 400 and a 500 response.
//!
//! Failure to remove the transient on-disk copy of an upload has no variant
//! here: it is logged as a warning and never surfaced to the caller.

use std::io::Error as IoError;

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;
use zip::result::ZipError;

/// The unified error type for all `framepack` operations.
///
/// Every public method that can fail returns `Result<T, FramepackError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramepackError {
    /// The video could not be opened for decoding (malformed or unreadable
    /// container). Terminal and non-retryable.
    #[error("Failed to open video for decoding: {reason}")]
    VideoOpen {
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The input contains no video stream.
    #[error("No video stream found in input")]
    NoVideoStream,

    /// JPEG quality outside the accepted `1..=100` range.
    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(i64),

    /// `max_frames` must be at least 1 in bounded mode.
    #[error("max_frames must be at least 1, got {0}")]
    InvalidMaxFrames(u64),

    /// A frame failed to JPEG-encode. Aborts the whole request; no partial
    /// archive is produced.
    #[error("Failed to encode frame {kept_index}: {reason}")]
    FrameEncode {
        /// Output position of the frame that failed.
        kept_index: u64,
        /// Underlying encoder error.
        reason: String,
    },

    /// The encode worker pool could not be constructed.
    #[error("Failed to build encode worker pool: {0}")]
    WorkerPool(String),

    /// Writing or sealing the zip archive failed.
    #[error("Archive error: {0}")]
    Archive(#[from] ZipError),

    /// The metadata entry could not be serialized.
    #[error("Metadata serialization error: {0}")]
    Metadata(#[from] serde_json::Error),

    /// An I/O error occurred while spilling or reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// The request was cancelled between batches via a
    /// [`CancellationToken`](crate::CancellationToken).
    #[error("Extraction cancelled")]
    Cancelled,
}

impl FramepackError {
    /// `true` for errors caused by the caller's input rather than by the
    /// service: unopenable video, missing video stream, or a parameter out
    /// of its documented range.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FramepackError::VideoOpen { .. }
                | FramepackError::NoVideoStream
                | FramepackError::InvalidQuality(_)
                | FramepackError::InvalidMaxFrames(_)
        )
    }
}

impl From<FfmpegError> for FramepackError {
    fn from(error: FfmpegError) -> Self {
        FramepackError::VideoOpen {
            reason: error.to_string(),
        }
    }
}
