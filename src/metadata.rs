//! Stream and archive metadata types.
//!
//! [`VideoMetadata`] is captured once when a [`FrameSource`](crate::FrameSource)
//! is opened and cached for the lifetime of the extraction.
//! [`ArchiveMetadata`] is the serde model for the `metadata.json` entry that
//! terminates every produced archive.

use serde::Serialize;

/// Metadata for the video stream of an input, captured at open time.
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second (may be approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Total number of source frames. Taken from the container when it
    /// reports one, otherwise estimated from duration and frame rate.
    pub frame_count: u64,
}

/// One row of the `frames` table in `metadata.json`.
#[derive(Debug, Clone, Serialize)]
pub struct FrameEntry {
    /// Output position of the frame (0-based, contiguous).
    pub frame_index: u64,
    /// Presentation time of the frame in seconds. `0.0` when the source
    /// frame rate is unknown.
    pub timestamp: f64,
    /// Name of the frame's entry inside the archive.
    pub filename: String,
}

/// The `metadata.json` payload written as the final archive entry.
///
/// `skip_frames` is present only for exhaustive extractions; bounded ("fast")
/// extractions omit the field. The `frames` table is emitted in both modes.
#[derive(Debug, Clone, Serialize)]
#[must_use]
pub struct ArchiveMetadata {
    /// Source frames per second.
    pub fps: f64,
    /// Total number of frames in the source video.
    pub total_frames: u64,
    /// Number of frames actually written to the archive.
    pub extracted_frames: u64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Caller-supplied skip factor (exhaustive mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_frames: Option<u64>,
    /// Per-frame index, timestamp, and filename.
    pub frames: Vec<FrameEntry>,
}
