//! Extraction options.
//!
//! [`ExtractOptions`] threads tuning knobs and an optional cancellation
//! token through [`extract`](crate::extract) without growing its signature.
//! Values that only trade performance for memory (batch size, compression
//! level) are clamped to sane ranges; values with documented caller-facing
//! ranges (JPEG quality) are validated instead, and rejected with an error
//! when out of range.
//!
//! # Example
//!
//! ```
//! use framepack::ExtractOptions;
//!
//! let options = ExtractOptions::new()
//!     .with_quality(85)
//!     .with_batch_size(32)
//!     .with_compression_level(9);
//! assert!(options.validate().is_ok());
//! ```

use crate::cancel::CancellationToken;
use crate::error::FramepackError;

/// Default JPEG quality for exhaustive extraction.
pub const DEFAULT_QUALITY: u8 = 70;
/// Default JPEG quality for bounded ("fast") extraction.
pub const DEFAULT_FAST_QUALITY: u8 = 60;
/// Default number of kept frames per encode batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;
/// Default deflate level for the output archive.
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 6;
/// Default size of the chunks a sealed archive is streamed in; see
/// [`SealedArchive::chunks`](crate::SealedArchive::chunks).
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Tuning and control options for a single extraction.
///
/// Construct with [`ExtractOptions::new`], adjust with the `with_*` builders,
/// and pass by reference to [`extract`](crate::extract). Validation runs at
/// pipeline entry, not in the builders.
#[derive(Debug, Clone)]
#[must_use]
pub struct ExtractOptions {
    pub(crate) quality: i64,
    pub(crate) batch_size: usize,
    pub(crate) compression_level: i64,
    pub(crate) cancellation: Option<CancellationToken>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Create options with the defaults: quality 70, batches of 50 frames,
    /// deflate level 6, no cancellation.
    pub fn new() -> Self {
        Self {
            quality: DEFAULT_QUALITY as i64,
            batch_size: DEFAULT_BATCH_SIZE,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            cancellation: None,
        }
    }

    /// Set the JPEG quality (1 to 100, higher is larger and better).
    ///
    /// Out-of-range values are not clamped; [`validate`](ExtractOptions::validate)
    /// rejects them with [`FramepackError::InvalidQuality`].
    pub fn with_quality(mut self, quality: i64) -> Self {
        self.quality = quality;
        self
    }

    /// Set how many kept frames are encoded per parallel batch.
    /// Clamped to a minimum of 1.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the deflate level of the output archive (0 to 9). Independent of
    /// JPEG quality: it trades CPU time for archive size. Clamped.
    pub fn with_compression_level(mut self, level: i64) -> Self {
        self.compression_level = level.clamp(0, 9);
        self
    }

    /// Attach a cancellation token, checked between encode batches.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Check the caller-facing ranges.
    ///
    /// # Errors
    ///
    /// [`FramepackError::InvalidQuality`] when quality is outside `1..=100`.
    pub fn validate(&self) -> Result<(), FramepackError> {
        if !(1..=100).contains(&self.quality) {
            return Err(FramepackError::InvalidQuality(self.quality));
        }
        Ok(())
    }

    /// The validated quality as the byte the JPEG encoder expects.
    pub(crate) fn quality_u8(&self) -> u8 {
        self.quality as u8
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
