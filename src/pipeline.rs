//! The extraction pipeline.
//!
//! [`extract`] drives the whole run: Frame Source, Selector, Batcher, Encode
//! Pool, Archive Writer. One single-threaded control flow decodes and selects
//! frames; only JPEG encoding fans out, one batch at a time, and the control
//! flow waits for each batch's results before decoding the next. There is no
//! cross-batch overlap, so at most one batch of decoded frames is resident at
//! any moment.
//!
//! Per request the pipeline moves through
//! `SourceOpened -> {Extracting <-> Encoding} -> Sealed`, with any fatal
//! error short-circuiting out. The transient on-disk input copy is removed
//! by the source's drop on every one of those paths.

use crate::archive::ArchiveWriter;
use crate::batch::Batcher;
use crate::encode::EncodePool;
use crate::error::FramepackError;
use crate::metadata::{ArchiveMetadata, FrameEntry, VideoMetadata};
use crate::options::ExtractOptions;
use crate::selector::{Frame, FrameSelector, SelectionPolicy};
use crate::source::FrameSource;
use crate::stream::SealedArchive;

/// What to extract: every frame (optionally skipping), or a bounded sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Keep every `(skip_frames + 1)`-th frame of the whole video.
    Exhaustive {
        /// Frames skipped between kept frames; 0 keeps everything.
        skip_frames: u64,
    },
    /// Keep at most `max_frames`, spread evenly across the video.
    Fast {
        /// Hard cap on kept frames. Must be at least 1.
        max_frames: u64,
    },
}

/// The result of a completed extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The sealed zip archive, ready for streaming.
    pub archive: SealedArchive,
    /// A copy of the metadata written into the archive's final entry.
    pub metadata: ArchiveMetadata,
}

/// Run the full extract-encode-archive pipeline over one video source.
///
/// Consumes the source; its transient on-disk copy (if any) is removed
/// before the archive is sealed. The encode `pool` is shared, injected
/// state; the pipeline only borrows it.
///
/// # Errors
///
/// - [`FramepackError::InvalidQuality`] / [`FramepackError::InvalidMaxFrames`]
///   for out-of-range parameters (checked before any work).
/// - [`FramepackError::FrameEncode`] if any frame fails to encode; the
///   partial archive is discarded.
/// - [`FramepackError::Cancelled`] if the options' token fires; encode work
///   already dispatched finishes first.
///
/// # Example
///
/// ```no_run
/// use framepack::{extract, EncodePool, ExtractOptions, ExtractionMode, FrameSource};
///
/// let pool = EncodePool::new(4)?;
/// let source = FrameSource::open("input.mp4")?;
/// let extraction = extract(
///     source,
///     ExtractionMode::Exhaustive { skip_frames: 1 },
///     &ExtractOptions::new(),
///     &pool,
/// )?;
/// std::fs::write("input_frames.zip", extraction.archive.as_bytes())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn extract(
    source: FrameSource,
    mode: ExtractionMode,
    options: &ExtractOptions,
    pool: &EncodePool,
) -> Result<Extraction, FramepackError> {
    options.validate()?;

    let video = source.metadata().clone();
    let policy = match mode {
        ExtractionMode::Exhaustive { skip_frames } => SelectionPolicy::exhaustive(skip_frames),
        ExtractionMode::Fast { max_frames } => {
            SelectionPolicy::budget(max_frames, video.frame_count)?
        }
    };

    log::info!(
        "extracting {}x{} video, {} source frames at {:.3} fps, stride {}",
        video.width,
        video.height,
        video.frame_count,
        video.frames_per_second,
        policy.stride(),
    );

    let mut selector = FrameSelector::new(policy, video.frames_per_second);
    let mut batcher = Batcher::new(options.batch_size);
    let mut writer = ArchiveWriter::new(options.compression_level);
    let mut frames: Vec<FrameEntry> = Vec::new();

    for raw in source {
        if let Some(frame) = selector.select(raw) {
            frames.push(FrameEntry {
                frame_index: frame.kept_index,
                timestamp: frame.timestamp,
                filename: policy.frame_filename(frame.kept_index),
            });
            if let Some(batch) = batcher.push(frame) {
                encode_and_append(&mut writer, pool, batch, options, &policy)?;
            }
        }
        // Budget reached: stop asking the decoder for more data. The source
        // is dropped by the loop, which also removes the temp copy.
        if selector.satisfied() {
            break;
        }
    }

    if let Some(batch) = batcher.flush() {
        encode_and_append(&mut writer, pool, batch, options, &policy)?;
    }

    let extracted = selector.kept_count();
    let metadata = build_metadata(&video, &policy, extracted, frames);
    writer.append_metadata(&metadata)?;

    let archive = writer.seal()?;
    log::info!(
        "sealed archive: {} entries, {} bytes",
        extracted + 1,
        archive.len(),
    );

    Ok(Extraction { archive, metadata })
}

/// Fan one batch out to the pool, wait for all results, and append them in
/// kept-index order. Checked for cancellation before the batch is scheduled;
/// a batch already dispatched always runs to completion.
fn encode_and_append(
    writer: &mut ArchiveWriter,
    pool: &EncodePool,
    batch: Vec<Frame>,
    options: &ExtractOptions,
    policy: &SelectionPolicy,
) -> Result<(), FramepackError> {
    if options.is_cancelled() {
        return Err(FramepackError::Cancelled);
    }
    let encoded = pool.encode_batch(batch, options.quality_u8(), policy)?;
    for frame in &encoded {
        writer.append_frame(frame)?;
    }
    Ok(())
}

fn build_metadata(
    video: &VideoMetadata,
    policy: &SelectionPolicy,
    extracted: u64,
    frames: Vec<FrameEntry>,
) -> ArchiveMetadata {
    ArchiveMetadata {
        fps: video.frames_per_second,
        total_frames: video.frame_count,
        extracted_frames: extracted,
        width: video.width,
        height: video.height,
        skip_frames: policy.metadata_skip_frames(),
        frames,
    }
}
