//! Frame packing and unpacking.
//!
//! Single source of truth for byte order and channel order: payload bytes map
//! to the pixel buffer row-major, `channel_depth` consecutive bytes per
//! pixel, in encounter order. No byte-order reversal anywhere.

use crate::schema::FrameSpec;

use super::Frame;

/// Pack a payload chunk into a full-size pixel buffer.
///
/// `chunk` must not exceed the frame capacity. Unused capacity is zero-filled;
/// the zero fill is the sole padding mechanism (there is no sentinel byte).
/// Pure and deterministic: equal inputs always produce equal buffers.
pub fn pack_frame(chunk: &[u8], spec: &FrameSpec) -> Vec<u8> {
    let capacity = spec.capacity();
    assert!(
        chunk.len() <= capacity,
        "chunk of {} bytes exceeds frame capacity {}",
        chunk.len(),
        capacity
    );

    let mut pixels = vec![0u8; capacity];
    pixels[..chunk.len()].copy_from_slice(chunk);
    pixels
}

/// Read back the raw bytes of a frame.
///
/// Exact inverse of [`pack_frame`]: returns all capacity bytes in the same
/// row-major order, padding included. Stripping padding is the framing
/// discipline's job, not the unpacker's.
pub fn unpack_frame(frame: &Frame) -> &[u8] {
    &frame.pixels
}
