//! Parallel JPEG encoding.
//!
//! [`EncodePool`] owns a fixed-size rayon thread pool that JPEG-encodes all
//! frames of one batch in parallel. The pool is constructed once at process
//! start and passed by reference into each extraction, so concurrent requests
//! share the same bounded set of workers rather than spawning their own.
//!
//! The batch's internal order is preserved: results are re-sorted by
//! `kept_index` before they are returned, so worker completion order is never
//! observable downstream.

use image::codecs::jpeg::JpegEncoder;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::FramepackError;
use crate::selector::{Frame, SelectionPolicy};

/// Default number of encode workers.
pub const DEFAULT_WORKERS: usize = 4;

/// A JPEG-encoded frame ready to be appended to the archive.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    /// Output position of the frame.
    pub kept_index: u64,
    /// Archive entry name, derived from `kept_index` by the selection policy.
    pub filename: String,
    /// The JPEG bytes.
    pub data: Vec<u8>,
}

/// Fixed-size worker pool for batch JPEG encoding.
///
/// Safe to share between concurrent extractions; the pool holds no
/// per-request state.
///
/// # Example
///
/// ```
/// use framepack::EncodePool;
///
/// let pool = EncodePool::new(4)?;
/// assert_eq!(pool.workers(), 4);
/// # Ok::<(), framepack::FramepackError>(())
/// ```
pub struct EncodePool {
    pool: rayon::ThreadPool,
}

impl EncodePool {
    /// Build a pool with a fixed number of worker threads.
    ///
    /// # Errors
    ///
    /// [`FramepackError::WorkerPool`] if the underlying thread pool cannot
    /// be created.
    pub fn new(workers: usize) -> Result<Self, FramepackError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|index| format!("framepack-encode-{index}"))
            .build()
            .map_err(|error| FramepackError::WorkerPool(error.to_string()))?;
        Ok(Self { pool })
    }

    /// Number of worker threads in the pool.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// JPEG-encode every frame of one batch in parallel.
    ///
    /// `quality` is in `1..=100` (validated upstream) and passes straight
    /// through to the encoder. The returned frames are in `kept_index`
    /// order regardless of which worker finished first.
    ///
    /// # Errors
    ///
    /// [`FramepackError::FrameEncode`] if any single frame fails to encode.
    /// The whole batch (and therefore the whole request) is abandoned; no
    /// partial output is produced.
    pub fn encode_batch(
        &self,
        batch: Vec<Frame>,
        quality: u8,
        policy: &SelectionPolicy,
    ) -> Result<Vec<EncodedFrame>, FramepackError> {
        let mut encoded = self.pool.install(|| {
            batch
                .into_par_iter()
                .map(|frame| encode_frame(frame, quality, policy))
                .collect::<Result<Vec<_>, FramepackError>>()
        })?;

        // Restore batch order before returning.
        encoded.sort_by_key(|frame| frame.kept_index);
        Ok(encoded)
    }
}

fn encode_frame(
    frame: Frame,
    quality: u8,
    policy: &SelectionPolicy,
) -> Result<EncodedFrame, FramepackError> {
    let mut data = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut data, quality);
    encoder
        .encode_image(&frame.image)
        .map_err(|error| FramepackError::FrameEncode {
            kept_index: frame.kept_index,
            reason: error.to_string(),
        })?;

    Ok(EncodedFrame {
        kept_index: frame.kept_index,
        filename: policy.frame_filename(frame.kept_index),
        data,
    })
}
