//! Sequential video frame source.
//!
//! [`FrameSource`] wraps an FFmpeg demuxer and decoder and exposes the video
//! as an ordered, finite, non-restartable sequence of raw RGB frames plus the
//! stream metadata captured at open time. It is the first stage of the
//! extraction pipeline.
//!
//! Two constructors cover the two ways input arrives: [`FrameSource::open`]
//! for a file already on disk (the CLI), and [`FrameSource::from_bytes`] for
//! an in-memory upload, which spills the bytes to a named temporary file for
//! the demuxer and removes it again when the source is dropped, on every
//! exit path.
//!
//! Only open-time failures are errors. A packet read or decode failure in the
//! middle of the stream ends the iteration as if the file had ended there,
//! and the pipeline finalizes with the frames collected so far.

use std::io::Write;
use std::path::Path;

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;
use tempfile::NamedTempFile;

use crate::error::FramepackError;
use crate::metadata::VideoMetadata;

/// A decoded frame, tagged with its position in the unskipped decode order.
#[derive(Debug)]
pub struct RawFrame {
    /// 0-based position in the original decode order.
    pub source_index: u64,
    /// Decoded pixels in RGB8.
    pub image: RgbImage,
}

/// Sequential decoder over a single video input.
///
/// Implements [`Iterator`]; each call to `next()` reads just enough packets
/// to decode one more frame. The sequence is finite and cannot be restarted.
///
/// # Example
///
/// ```no_run
/// use framepack::FrameSource;
///
/// let source = FrameSource::open("input.mp4")?;
/// println!("{} frames expected", source.metadata().frame_count);
/// for frame in source.take(3) {
///     println!("frame {} is {}x{}", frame.source_index, frame.image.width(), frame.image.height());
/// }
/// # Ok::<(), framepack::FramepackError>(())
/// ```
pub struct FrameSource {
    input: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    stream_index: usize,
    metadata: VideoMetadata,
    /// Decode-order index of the next frame to be yielded.
    next_index: u64,
    decoded: VideoFrame,
    scaled: VideoFrame,
    eof_sent: bool,
    done: bool,
    /// On-disk copy of an in-memory input; removed on drop.
    spill: Option<NamedTempFile>,
}

impl FrameSource {
    /// Open a video file for sequential decoding.
    ///
    /// # Errors
    ///
    /// [`FramepackError::VideoOpen`] if the container cannot be opened or
    /// decoded, [`FramepackError::NoVideoStream`] if it holds no video.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FramepackError> {
        Self::open_inner(path.as_ref(), None)
    }

    /// Spill an in-memory video to a temporary file and open it.
    ///
    /// The temporary file lives exactly as long as the source and is removed
    /// when the source is dropped, whether decoding completed, stopped early,
    /// or failed.
    ///
    /// # Errors
    ///
    /// [`FramepackError::Io`] if the spill fails, otherwise as
    /// [`FrameSource::open`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, FramepackError> {
        let mut spill = NamedTempFile::new()?;
        spill.write_all(data)?;
        spill.flush()?;
        let path = spill.path().to_path_buf();
        Self::open_inner(&path, Some(spill))
    }

    fn open_inner(path: &Path, spill: Option<NamedTempFile>) -> Result<Self, FramepackError> {
        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| FramepackError::VideoOpen {
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input = ffmpeg_next::format::input(&path).map_err(|error| {
            FramepackError::VideoOpen {
                reason: error.to_string(),
            }
        })?;

        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or(FramepackError::NoVideoStream)?;
        let stream_index = stream.index();

        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                FramepackError::VideoOpen {
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| FramepackError::VideoOpen {
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        let width = decoder.width();
        let height = decoder.height();

        // Frames per second from the stream's average frame rate, falling
        // back to the raw rate field.
        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        // Container-reported frame count when available, else estimated.
        let reported = stream.frames();
        let frame_count = if reported > 0 {
            reported as u64
        } else {
            let duration_microseconds = input.duration();
            if duration_microseconds > 0 && frames_per_second > 0.0 {
                (duration_microseconds as f64 / 1_000_000.0 * frames_per_second) as u64
            } else {
                0
            }
        };

        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| FramepackError::VideoOpen {
            reason: format!("Failed to create scaler: {error}"),
        })?;

        let metadata = VideoMetadata {
            width,
            height,
            frames_per_second,
            frame_count,
        };

        Ok(Self {
            input,
            decoder,
            scaler,
            stream_index,
            metadata,
            next_index: 0,
            decoded: VideoFrame::empty(),
            scaled: VideoFrame::empty(),
            eof_sent: false,
            done: false,
            spill,
        })
    }

    /// The stream metadata captured when the source was opened.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Convert the current `decoded` frame to a tightly-packed [`RgbImage`].
    ///
    /// FFmpeg frames frequently carry per-row padding (stride > width * 3);
    /// the padding is stripped here so the buffer can be handed to
    /// `RgbImage::from_raw` directly.
    fn convert_current_frame(&mut self) -> Result<RgbImage, FfmpegError> {
        self.scaler.run(&self.decoded, &mut self.scaled)?;

        let width = self.metadata.width;
        let height = self.metadata.height;
        let stride = self.scaled.stride(0);
        let row_bytes = (width as usize) * 3;
        let data = self.scaled.data(0);

        let buffer = if stride == row_bytes {
            data[..row_bytes * (height as usize)].to_vec()
        } else {
            let mut buffer = Vec::with_capacity(row_bytes * (height as usize));
            for row in 0..(height as usize) {
                let start = row * stride;
                buffer.extend_from_slice(&data[start..start + row_bytes]);
            }
            buffer
        };

        RgbImage::from_raw(width, height, buffer).ok_or(FfmpegError::InvalidData)
    }

    /// Stop iterating. A mid-stream failure is end-of-stream, not an error.
    fn finish(&mut self, why: &str) -> Option<RawFrame> {
        log::debug!("frame source ended after {} frames: {why}", self.next_index);
        self.done = true;
        None
    }
}

impl Iterator for FrameSource {
    type Item = RawFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            // Drain any frame the decoder has already produced.
            if self.decoder.receive_frame(&mut self.decoded).is_ok() {
                match self.convert_current_frame() {
                    Ok(image) => {
                        let source_index = self.next_index;
                        self.next_index += 1;
                        return Some(RawFrame {
                            source_index,
                            image,
                        });
                    }
                    Err(error) => return self.finish(&format!("frame conversion failed: {error}")),
                }
            }

            // Decoder is empty. Feed it more packets.
            if self.eof_sent {
                self.done = true;
                return None;
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => {
                    if packet.stream() == self.stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            // A corrupt packet mid-stream: drain and stop.
                            log::debug!("send_packet failed, draining decoder: {error}");
                            let _ = self.decoder.send_eof();
                            self.eof_sent = true;
                        }
                    }
                    // Non-video packets are silently skipped.
                }
                Err(FfmpegError::Eof) => {
                    let _ = self.decoder.send_eof();
                    self.eof_sent = true;
                }
                Err(error) => {
                    // A read failure mid-stream is normal end-of-stream.
                    log::debug!("packet read failed, draining decoder: {error}");
                    let _ = self.decoder.send_eof();
                    self.eof_sent = true;
                }
            }
        }
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        if let Some(spill) = self.spill.take() {
            if let Err(error) = spill.close() {
                log::warn!("failed to remove temporary video copy: {error}");
            }
        }
    }
}
