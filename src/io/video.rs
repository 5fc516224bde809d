//! Lossless video muxing and demuxing via an external `ffmpeg` binary.
//!
//! Frames pass through a scoped temporary directory as PNGs and are muxed
//! into FFV1 (a lossless intra-frame codec) in a Matroska container. FFV1
//! cannot store `rgb24` directly, so RGB sequences go through `bgr0`, a
//! byte-exact superset; gray sequences use `gray`. Both survive the
//! PNG -> FFV1 -> PNG trip bit-for-bit.
//!
//! The temporary directory is owned by a [`tempfile::TempDir`] guard, so it
//! is removed on every exit path, including errors and unwinds.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::codec::Frame;
use crate::schema::{FrameSpec, PixelFormat};

use super::{FrameIoError, frames};

fn locate_ffmpeg() -> Result<PathBuf, FrameIoError> {
    which::which("ffmpeg").map_err(|_| FrameIoError::FfmpegMissing)
}

fn run_ffmpeg(command: &mut Command) -> Result<(), FrameIoError> {
    debug!("running {command:?}");
    let output = command.output()?;
    if !output.status.success() {
        return Err(FrameIoError::FfmpegFailed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

fn ffv1_pixel_format(format: PixelFormat) -> &'static str {
    match format {
        PixelFormat::Gray => "gray",
        PixelFormat::Rgb => "bgr0",
    }
}

/// Mux a frame sequence into a lossless video at `path`.
///
/// Frames are staged as PNGs in a scoped temp directory, then muxed at the
/// given frame rate. Returns the number of frames muxed.
pub fn write_video(
    path: &Path,
    spec: &FrameSpec,
    frame_rate: u32,
    frames: impl IntoIterator<Item = Frame>,
) -> Result<usize, FrameIoError> {
    let ffmpeg = locate_ffmpeg()?;
    let staging = tempfile::tempdir()?;
    let count = frames::write_frames(staging.path(), spec, frames)?;

    run_ffmpeg(
        Command::new(&ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-y"])
            .args(["-framerate", &frame_rate.to_string()])
            .args(["-start_number", "0"])
            .arg("-i")
            .arg(staging.path().join("frame_%06d.png"))
            .args(["-c:v", "ffv1"])
            .args(["-pix_fmt", ffv1_pixel_format(spec.pixel_format)])
            .arg(path),
    )?;

    info!(
        "muxed {count} frame(s) at {frame_rate} fps into {}",
        path.display()
    );
    Ok(count)
}

/// Demux a video back into its frame sequence, in presentation order.
pub fn read_video(path: &Path, spec: &FrameSpec) -> Result<Vec<Frame>, FrameIoError> {
    let ffmpeg = locate_ffmpeg()?;
    // Fail with a plain I/O error before involving ffmpeg.
    std::fs::metadata(path)?;

    let staging = tempfile::tempdir()?;
    run_ffmpeg(
        Command::new(&ffmpeg)
            .args(["-hide_banner", "-loglevel", "error"])
            .arg("-i")
            .arg(path)
            .args(["-start_number", "0"])
            .arg(staging.path().join("frame_%06d.png")),
    )?;

    frames::read_frames(staging.path(), spec)
}
