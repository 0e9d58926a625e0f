//! Kept-frame batching.
//!
//! The batcher groups kept frames into fixed-size ordered batches. A batch is
//! the unit of parallelism for the encode pool and the unit of memory the
//! pipeline holds decoded at any one time: one batch is decoded, encoded, and
//! written to the archive before the next is started.

use crate::selector::Frame;

/// Accumulates kept frames in arrival order into batches of a fixed capacity.
///
/// Batches are non-overlapping, ordered, and collectively exhaustive over all
/// kept frames; the final batch may be shorter than the capacity.
#[derive(Debug)]
pub struct Batcher {
    capacity: usize,
    pending: Vec<Frame>,
}

impl Batcher {
    /// Create a batcher. `capacity` is clamped to a minimum of 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            pending: Vec::with_capacity(capacity),
        }
    }

    /// Add a kept frame. Returns a full batch once `capacity` is reached.
    pub fn push(&mut self, frame: Frame) -> Option<Vec<Frame>> {
        self.pending.push(frame);
        if self.pending.len() >= self.capacity {
            let full = std::mem::replace(&mut self.pending, Vec::with_capacity(self.capacity));
            Some(full)
        } else {
            None
        }
    }

    /// Take the final, possibly short batch. `None` when nothing is pending.
    pub fn flush(&mut self) -> Option<Vec<Frame>> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }
}
