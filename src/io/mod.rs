//! Frame-sequence persistence.
//!
//! Two interchangeable containers, both lossless:
//!
//! - `frames`: one PNG file per frame in a directory, named
//!   `frame_<index>.png`. Indices are parsed numerically on read, so the
//!   decode order never depends on directory-listing order.
//! - `video`: the same frames muxed into an FFV1 (lossless) Matroska video at
//!   a fixed frame rate by driving an external `ffmpeg` binary through a
//!   scoped temporary directory.
//!
//! Exact pixel values must survive the container; anything lossy (JPEG,
//! H.264 with chroma subsampling, ...) would silently corrupt the payload and
//! is never produced here.

mod frames;
mod video;

pub use frames::*;
pub use video::*;

use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors from reading or writing frame sequences.
#[derive(Debug, thiserror::Error)]
pub enum FrameIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("no frame files found in {}", path.display())]
    NoFrames { path: PathBuf },
    #[error("frame {index} is missing from the sequence")]
    MissingFrame { index: u32 },
    #[error("duplicate frame index {index}")]
    DuplicateFrame { index: u32 },
    #[error("frame {index}: expected {expected}, found {found}")]
    GeometryMismatch {
        index: u32,
        expected: String,
        found: String,
    },
    #[error("ffmpeg not found on PATH; video mode requires an ffmpeg installation")]
    FfmpegMissing,
    #[error("ffmpeg exited with {status}: {stderr}")]
    FfmpegFailed { status: ExitStatus, stderr: String },
}
