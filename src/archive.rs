//! Zip archive assembly.
//!
//! [`ArchiveWriter`] accumulates encoded frame entries and a single
//! `metadata.json` entry into a deflate-compressed zip built in memory.
//! Sealing the writer closes the zip central directory and yields a
//! [`SealedArchive`](crate::SealedArchive), the only form that can be
//! streamed to a caller.
//!
//! Frames must be appended in non-decreasing `kept_index` order; that is the
//! pipeline's contract with this writer, not something enforced here. The
//! metadata entry is always written last. An extraction that kept zero
//! frames still seals into a valid archive with just the metadata entry.

use std::io::{Cursor, Write};

use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::encode::EncodedFrame;
use crate::error::FramepackError;
use crate::metadata::ArchiveMetadata;
use crate::stream::SealedArchive;

/// Name of the metadata entry, always the final entry in the archive.
pub const METADATA_ENTRY: &str = "metadata.json";

/// Append-only builder for the output archive.
pub struct ArchiveWriter {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: u64,
}

impl ArchiveWriter {
    /// Create an empty archive.
    ///
    /// `compression_level` is the deflate level (0 to 9); it trades CPU time
    /// for archive size and is independent of JPEG quality.
    pub fn new(compression_level: i64) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level.clamp(0, 9)));
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options,
            entries: 0,
        }
    }

    /// Append one encoded frame entry.
    pub fn append_frame(&mut self, frame: &EncodedFrame) -> Result<(), FramepackError> {
        self.writer.start_file(frame.filename.as_str(), self.options)?;
        self.writer.write_all(&frame.data)?;
        self.entries += 1;
        Ok(())
    }

    /// Append the `metadata.json` entry. Call once, after all frames.
    ///
    /// Serialized pretty-printed, matching what downstream consumers of the
    /// archive already parse.
    pub fn append_metadata(&mut self, metadata: &ArchiveMetadata) -> Result<(), FramepackError> {
        let json = serde_json::to_vec_pretty(metadata)?;
        self.writer.start_file(METADATA_ENTRY, self.options)?;
        self.writer.write_all(&json)?;
        self.entries += 1;
        Ok(())
    }

    /// Number of entries written so far, metadata included.
    pub fn entry_count(&self) -> u64 {
        self.entries
    }

    /// Close the archive and hand back the finished bytes.
    pub fn seal(self) -> Result<SealedArchive, FramepackError> {
        let cursor = self.writer.finish()?;
        Ok(SealedArchive::new(cursor.into_inner()))
    }
}
