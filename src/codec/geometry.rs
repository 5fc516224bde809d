//! Frame geometry planning.

use std::ops::Range;

use crate::schema::FrameSpec;

/// Split of a payload of known length into fixed-capacity frames.
///
/// Every frame is full-size; the final frame's unused capacity is zero-filled
/// by the packer. A zero-length payload still plans exactly one (all-padding)
/// frame so that the encoded output is always a decodable sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePlan {
    payload_len: usize,
    capacity: usize,
    frame_count: usize,
}

impl FramePlan {
    /// Plan frames for `payload_len` bytes.
    ///
    /// `spec` must already be validated; a zero-capacity geometry is a
    /// configuration error caught upstream.
    pub fn new(payload_len: usize, spec: &FrameSpec) -> Self {
        let capacity = spec.capacity();
        debug_assert!(capacity > 0, "FramePlan requires a validated FrameSpec");

        Self {
            payload_len,
            capacity,
            frame_count: payload_len.div_ceil(capacity).max(1),
        }
    }

    /// Number of frames in the sequence.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Payload capacity of one frame in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total payload length being framed.
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// Byte range of the payload carried by frame `index`.
    ///
    /// The final frame's range is shorter than `capacity` unless the payload
    /// divides evenly; the packer zero-fills the remainder.
    pub fn byte_range(&self, index: usize) -> Range<usize> {
        assert!(index < self.frame_count, "frame index out of range");
        let start = index * self.capacity;
        let end = (start + self.capacity).min(self.payload_len);
        start..end
    }

    /// Iterate over all per-frame byte ranges in order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.frame_count).map(|i| self.byte_range(i))
    }
}
