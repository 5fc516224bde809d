//! pixelpack - Pack arbitrary files into lossless raster frames and back.
//!
//! A byte stream is split across fixed-geometry frames (row-major pixels,
//! channel bytes in encounter order), the final frame is zero-padded to full
//! capacity, and a framing discipline marks where the real data ends so the
//! decoder can reverse the process bit-for-bit. Frame sequences persist as a
//! directory of PNGs or as a lossless FFV1 video.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration types (frame geometry, framing discipline)
//! - `codec`: The pure byte-to-raster codec (planner, packer, framing)
//! - `io`: Frame-sequence persistence (PNG directory, video container)
//!
//! # Example
//!
//! ```rust,no_run
//! use pixelpack::{
//!     codec::{decode, encode},
//!     io::{read_frames, write_frames},
//!     schema::CodecConfig,
//! };
//!
//! let config = CodecConfig::default();
//! let data = std::fs::read("archive.zip").unwrap();
//!
//! // Encode to a directory of PNG frames.
//! let frames = encode(&data, &config).unwrap();
//! write_frames("frames".as_ref(), &config.spec, frames).unwrap();
//!
//! // Decode it back, byte for byte.
//! let frames = read_frames("frames".as_ref(), &config.spec).unwrap();
//! let report = decode(&frames, &config).unwrap();
//! assert_eq!(report.bytes, data);
//! ```

pub mod codec;
pub mod io;
pub mod schema;

// Re-export commonly used types
pub use codec::{CodecError, CorruptionWarning, DecodeReport, Encoder, Frame};
pub use io::FrameIoError;
pub use schema::{CodecConfig, ConfigError, FrameSpec, FramingDiscipline, PixelFormat};
