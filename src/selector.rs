//! Frame selection policies.
//!
//! The selector decides, per decoded frame, whether the frame is kept. Two
//! policies exist: a caller-supplied skip factor for exhaustive extraction,
//! and a computed stride for bounded ("fast") extraction that caps the total
//! number of kept frames. The policy also owns the per-mode output filename
//! format and timestamp rule, so everything downstream of selection is
//! mode-agnostic.

use image::RgbImage;

use crate::error::FramepackError;
use crate::source::RawFrame;

/// A frame selected for output.
#[derive(Debug)]
pub struct Frame {
    /// 0-based position in the original, unskipped decode order.
    pub source_index: u64,
    /// 0-based position among kept frames. Contiguous across the whole run.
    pub kept_index: u64,
    /// Presentation time in seconds (`0.0` when the frame rate is unknown).
    pub timestamp: f64,
    /// Decoded pixels, owned exclusively by the stage processing them.
    pub image: RgbImage,
}

/// Which frames to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Keep every `(skip_frames + 1)`-th frame. `skip_frames == 0` keeps all.
    SkipFactor {
        /// Number of frames skipped between kept frames.
        skip_frames: u64,
    },
    /// Keep every `skip_factor`-th frame, and at most `max_frames` in total.
    Budget {
        /// Hard cap on kept frames.
        max_frames: u64,
        /// Stride computed from the source length and the cap.
        skip_factor: u64,
    },
}

impl SelectionPolicy {
    /// Policy for exhaustive extraction with an optional skip factor.
    pub fn exhaustive(skip_frames: u64) -> Self {
        SelectionPolicy::SkipFactor { skip_frames }
    }

    /// Policy for bounded extraction: spread at most `max_frames` kept frames
    /// evenly over a source of `total_frames`.
    ///
    /// The stride is `max(1, total_frames / max_frames)`. When the container
    /// reports no frame count, the stride degrades to 1 and the cap alone
    /// bounds the output.
    ///
    /// # Errors
    ///
    /// [`FramepackError::InvalidMaxFrames`] when `max_frames` is zero.
    pub fn budget(max_frames: u64, total_frames: u64) -> Result<Self, FramepackError> {
        if max_frames == 0 {
            return Err(FramepackError::InvalidMaxFrames(max_frames));
        }
        Ok(SelectionPolicy::Budget {
            max_frames,
            skip_factor: (total_frames / max_frames).max(1),
        })
    }

    /// Distance between consecutive kept source indices.
    pub fn stride(&self) -> u64 {
        match *self {
            SelectionPolicy::SkipFactor { skip_frames } => skip_frames.saturating_add(1),
            SelectionPolicy::Budget { skip_factor, .. } => skip_factor,
        }
    }

    /// Whether the frame at `source_index` is kept.
    pub fn keeps(&self, source_index: u64) -> bool {
        source_index % self.stride() == 0
    }

    /// Maximum number of kept frames, if this policy imposes one.
    pub fn cap(&self) -> Option<u64> {
        match *self {
            SelectionPolicy::SkipFactor { .. } => None,
            SelectionPolicy::Budget { max_frames, .. } => Some(max_frames),
        }
    }

    /// Presentation time of a kept frame, in seconds.
    pub fn timestamp(&self, source_index: u64, kept_index: u64, fps: f64) -> f64 {
        if fps <= 0.0 {
            return 0.0;
        }
        match *self {
            SelectionPolicy::SkipFactor { .. } => source_index as f64 / fps,
            SelectionPolicy::Budget { skip_factor, .. } => {
                (kept_index * skip_factor) as f64 / fps
            }
        }
    }

    /// Archive entry name for the kept frame at `kept_index`.
    ///
    /// Exhaustive extractions use six digits, bounded ones four.
    pub fn frame_filename(&self, kept_index: u64) -> String {
        match *self {
            SelectionPolicy::SkipFactor { .. } => format!("frame_{kept_index:06}.jpg"),
            SelectionPolicy::Budget { .. } => format!("frame_{kept_index:04}.jpg"),
        }
    }

    /// `skip_frames` as recorded in archive metadata; `None` in budget mode.
    pub(crate) fn metadata_skip_frames(&self) -> Option<u64> {
        match *self {
            SelectionPolicy::SkipFactor { skip_frames } => Some(skip_frames),
            SelectionPolicy::Budget { .. } => None,
        }
    }
}

/// Applies a [`SelectionPolicy`] to the decode stream, assigning contiguous
/// kept indices and timestamps.
#[derive(Debug)]
pub struct FrameSelector {
    policy: SelectionPolicy,
    fps: f64,
    kept: u64,
}

impl FrameSelector {
    /// Create a selector for one extraction run.
    pub fn new(policy: SelectionPolicy, fps: f64) -> Self {
        Self {
            policy,
            fps,
            kept: 0,
        }
    }

    /// Decide on one decoded frame. Returns the tagged frame when kept.
    pub fn select(&mut self, raw: RawFrame) -> Option<Frame> {
        if !self.policy.keeps(raw.source_index) {
            return None;
        }
        let kept_index = self.kept;
        self.kept += 1;
        Some(Frame {
            source_index: raw.source_index,
            kept_index,
            timestamp: self.policy.timestamp(raw.source_index, kept_index, self.fps),
            image: raw.image,
        })
    }

    /// `true` once a budget policy has kept its full allowance. The pipeline
    /// stops pulling from the decoder at this point.
    pub fn satisfied(&self) -> bool {
        self.policy.cap().is_some_and(|cap| self.kept >= cap)
    }

    /// Number of frames kept so far.
    pub fn kept_count(&self) -> u64 {
        self.kept
    }

    /// The policy driving this selector.
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }
}
