//! # framepack
//!
//! Extract still frames from a video, JPEG-encode them on a bounded worker
//! pool, and pack them with a `metadata.json` into a zip archive, powered by
//! FFmpeg via the [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next)
//! crate.
//!
//! The pipeline is a fixed chain: a sequential [`FrameSource`] decodes, a
//! [`SelectionPolicy`] decides which frames are kept, kept frames are grouped
//! into batches, each batch is JPEG-encoded in parallel on an [`EncodePool`],
//! and an archive writer appends the results in output order. The sealed
//! archive streams out in fixed-size chunks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use framepack::{extract, EncodePool, ExtractOptions, ExtractionMode, FrameSource};
//!
//! // One pool per process, shared by every extraction.
//! let pool = EncodePool::new(4)?;
//!
//! let source = FrameSource::open("input.mp4")?;
//! let extraction = extract(
//!     source,
//!     ExtractionMode::Fast { max_frames: 100 },
//!     &ExtractOptions::new().with_quality(60),
//!     &pool,
//! )?;
//!
//! std::fs::write("input_frames_fast.zip", extraction.archive.as_bytes())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Modes
//!
//! - **Exhaustive**: keep every `(skip_frames + 1)`-th frame of the whole
//!   video; entry names are `frame_%06d.jpg`.
//! - **Fast**: keep at most `max_frames`, spread evenly by a stride computed
//!   from the source length; entry names are `frame_%04d.jpg` and decoding
//!   stops as soon as the budget is met.
//!
//! In both modes kept frames get contiguous output indices, and the archive
//! order matches those indices exactly no matter how many encode workers run.
//!
//! ## HTTP server
//!
//! With the `server` feature (on by default) the crate ships an axum router
//! exposing the two modes as `POST /extract_frames` and
//! `POST /extract_frames_fast` multipart upload endpoints, plus the
//! `framepack-server` binary. See [`server`].
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod archive;
pub mod batch;
pub mod cancel;
pub mod encode;
pub mod error;
pub mod ffmpeg;
pub mod metadata;
pub mod options;
pub mod pipeline;
pub mod selector;
#[cfg(feature = "server")]
pub mod server;
pub mod source;
pub mod stream;

pub use archive::{ArchiveWriter, METADATA_ENTRY};
pub use batch::Batcher;
pub use cancel::CancellationToken;
pub use encode::{DEFAULT_WORKERS, EncodePool, EncodedFrame};
pub use error::FramepackError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use metadata::{ArchiveMetadata, FrameEntry, VideoMetadata};
pub use options::{
    DEFAULT_BATCH_SIZE, DEFAULT_CHUNK_SIZE, DEFAULT_COMPRESSION_LEVEL, DEFAULT_FAST_QUALITY,
    DEFAULT_QUALITY, ExtractOptions,
};
pub use pipeline::{Extraction, ExtractionMode, extract};
pub use selector::{Frame, FrameSelector, SelectionPolicy};
pub use source::{FrameSource, RawFrame};
pub use stream::{ArchiveChunks, SealedArchive};
