//! Codec module - The byte-to-raster framing codec.
//!
//! This is the part of the crate with a correctness argument. Bytes flow
//! through three pure stages:
//!
//! - `geometry`: split a payload of known length into per-frame byte ranges.
//! - `packer`: map a byte range to a row-major pixel buffer and back.
//! - `framing`: mark (and later recover) the true payload length within the
//!   zero-padded frame capacity.
//!
//! `pipeline` composes the stages into whole-stream encode/decode drivers.

mod framing;
mod geometry;
mod packer;
mod pipeline;

pub use framing::*;
pub use geometry::*;
pub use packer::*;
pub use pipeline::*;

/// One raster frame's worth of packed bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Position in the sequence, 0-based. Order is significant.
    pub index: u32,
    /// Row-major pixel buffer, `width * height * channel_depth` bytes.
    pub pixels: Vec<u8>,
}

/// Codec errors. All of these abort the operation; none are recoverable.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Config(#[from] crate::schema::ConfigError),
    #[error("payload of {len} bytes exceeds the 32-bit bit-length header range")]
    PayloadTooLarge { len: usize },
    #[error(
        "declared payload of {declared_bits} bits exceeds the {available_bits} bits recovered from frames"
    )]
    LengthOutOfRange {
        declared_bits: u64,
        available_bits: u64,
    },
    #[error("declared payload length of {declared_bits} bits is not a whole number of bytes")]
    MisalignedLength { declared_bits: u64 },
    #[error("recovered stream of {available_bytes} byte(s) is shorter than the length header")]
    TruncatedHeader { available_bytes: usize },
    #[error("frame sequence is empty")]
    EmptySequence,
    #[error("frame {index} holds {found} bytes, expected the frame capacity of {expected}")]
    FrameSizeMismatch {
        index: u32,
        expected: usize,
        found: usize,
    },
    #[error("frame {found} found where frame {expected} was expected; sequence is out of order")]
    OutOfOrder { expected: u32, found: u32 },
}
