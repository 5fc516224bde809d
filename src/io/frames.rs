//! PNG-per-frame directory persistence.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ExtendedColorType, GenericImageView};
use log::{debug, info};

use crate::codec::Frame;
use crate::schema::{FrameSpec, PixelFormat};

use super::FrameIoError;

/// File name for frame `index` within a sequence directory.
pub fn frame_path(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("frame_{index:06}.png"))
}

/// Parse the embedded frame index out of a file name, if it has one.
fn parse_frame_index(name: &str) -> Option<u32> {
    name.strip_prefix("frame_")?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

fn color_type(format: PixelFormat) -> ExtendedColorType {
    match format {
        PixelFormat::Gray => ExtendedColorType::L8,
        PixelFormat::Rgb => ExtendedColorType::Rgb8,
    }
}

/// Write a frame sequence to `dir`, one PNG per frame, streaming.
///
/// Frames are consumed in order and written as they arrive, so memory use is
/// bounded by a single frame regardless of sequence length. Returns the
/// number of frames written. Any write failure aborts the operation; a
/// partially written directory is not a valid decode input.
pub fn write_frames(
    dir: &Path,
    spec: &FrameSpec,
    frames: impl IntoIterator<Item = Frame>,
) -> Result<usize, FrameIoError> {
    fs::create_dir_all(dir)?;
    let color = color_type(spec.pixel_format);

    let mut count = 0;
    for frame in frames {
        let path = frame_path(dir, frame.index);
        image::save_buffer(&path, &frame.pixels, spec.width, spec.height, color)?;
        count += 1;
    }

    info!("wrote {count} frame(s) to {}", dir.display());
    Ok(count)
}

/// Read a complete frame sequence from `dir`.
///
/// Files are matched by the `frame_<index>.png` pattern, sorted by their
/// embedded numeric index, and required to form a contiguous 0..N set. A gap
/// or duplicate aborts: a missing frame would corrupt every downstream byte
/// offset, so there is no partial recovery.
pub fn read_frames(dir: &Path, spec: &FrameSpec) -> Result<Vec<Frame>, FrameIoError> {
    let mut entries: Vec<(u32, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(index) = parse_frame_index(name) {
            entries.push((index, entry.path()));
        }
    }

    if entries.is_empty() {
        return Err(FrameIoError::NoFrames {
            path: dir.to_path_buf(),
        });
    }

    // Numeric sort on the embedded index, never directory-listing order.
    entries.sort_by_key(|(index, _)| *index);
    for (position, (index, _)) in entries.iter().enumerate() {
        if (*index as usize) < position {
            return Err(FrameIoError::DuplicateFrame { index: *index });
        }
        if (*index as usize) > position {
            return Err(FrameIoError::MissingFrame {
                index: position as u32,
            });
        }
    }

    debug!("reading {} frame(s) from {}", entries.len(), dir.display());

    let mut frames = Vec::with_capacity(entries.len());
    for (index, path) in entries {
        frames.push(load_frame(&path, index, spec)?);
    }
    Ok(frames)
}

fn load_frame(path: &Path, index: u32, spec: &FrameSpec) -> Result<Frame, FrameIoError> {
    let image = image::open(path)?;
    let (width, height) = image.dimensions();
    if width != spec.width || height != spec.height {
        return Err(FrameIoError::GeometryMismatch {
            index,
            expected: format!("{}x{}", spec.width, spec.height),
            found: format!("{width}x{height}"),
        });
    }

    let pixels = match (spec.pixel_format, image) {
        (PixelFormat::Gray, DynamicImage::ImageLuma8(buf)) => buf.into_raw(),
        (PixelFormat::Rgb, DynamicImage::ImageRgb8(buf)) => buf.into_raw(),
        (format, other) => {
            return Err(FrameIoError::GeometryMismatch {
                index,
                expected: format.to_string(),
                found: format!("{:?}", other.color()),
            });
        }
    };

    Ok(Frame { index, pixels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode};
    use crate::schema::{CodecConfig, FramingDiscipline};
    use tempfile::tempdir;

    fn small_config() -> CodecConfig {
        CodecConfig {
            spec: FrameSpec {
                width: 4,
                height: 4,
                pixel_format: PixelFormat::Gray,
            },
            discipline: FramingDiscipline::Metadata,
            frame_rate: 30,
        }
    }

    #[test]
    fn write_then_read_roundtrips() {
        let dir = tempdir().unwrap();
        let config = small_config();
        let data: Vec<u8> = (0..=255).collect();

        let frames = encode(&data, &config).unwrap();
        let written = write_frames(dir.path(), &config.spec, frames.clone()).unwrap();
        assert_eq!(written, frames.len());

        let read = read_frames(dir.path(), &config.spec).unwrap();
        assert_eq!(read, frames);

        let report = decode(&read, &config).unwrap();
        assert_eq!(report.bytes, data);
    }

    #[test]
    fn indices_sort_numerically_not_lexicographically() {
        // Unpadded names: lexicographic order would be 0, 1, 10, 11, 2, ...
        let dir = tempdir().unwrap();
        let config = small_config();
        let data: Vec<u8> = (0..16 * 12).map(|i| (i % 251) as u8).collect();

        let frames = encode(&data, &config).unwrap();
        assert!(frames.len() > 10);
        for frame in &frames {
            let path = dir.path().join(format!("frame_{}.png", frame.index));
            image::save_buffer(
                &path,
                &frame.pixels,
                config.spec.width,
                config.spec.height,
                ExtendedColorType::L8,
            )
            .unwrap();
        }

        let read = read_frames(dir.path(), &config.spec).unwrap();
        let report = decode(&read, &config).unwrap();
        assert_eq!(report.bytes, data);
    }

    #[test]
    fn unrelated_files_are_ignored() {
        let dir = tempdir().unwrap();
        let config = small_config();

        let frames = encode(&[1, 2, 3], &config).unwrap();
        write_frames(dir.path(), &config.spec, frames.clone()).unwrap();
        fs::write(dir.path().join("notes.txt"), b"not a frame").unwrap();
        fs::write(dir.path().join("frame_.png"), b"bad name").unwrap();

        let read = read_frames(dir.path(), &config.spec).unwrap();
        assert_eq!(read, frames);
    }

    #[test]
    fn gap_in_sequence_is_an_error() {
        let dir = tempdir().unwrap();
        let config = small_config();
        let data = vec![7u8; 100];

        let frames = encode(&data, &config).unwrap();
        write_frames(dir.path(), &config.spec, frames).unwrap();
        fs::remove_file(frame_path(dir.path(), 1)).unwrap();

        assert!(matches!(
            read_frames(dir.path(), &config.spec),
            Err(FrameIoError::MissingFrame { index: 1 })
        ));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_frames(dir.path(), &small_config().spec),
            Err(FrameIoError::NoFrames { .. })
        ));
    }

    #[test]
    fn geometry_mismatch_is_an_error() {
        let dir = tempdir().unwrap();
        let config = small_config();

        // 2x2 where 4x4 is expected.
        image::save_buffer(
            frame_path(dir.path(), 0),
            &[0u8; 4],
            2,
            2,
            ExtendedColorType::L8,
        )
        .unwrap();

        assert!(matches!(
            read_frames(dir.path(), &config.spec),
            Err(FrameIoError::GeometryMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn wrong_color_type_is_an_error() {
        let dir = tempdir().unwrap();
        let config = small_config();

        // RGB where gray is expected.
        image::save_buffer(
            frame_path(dir.path(), 0),
            &[0u8; 4 * 4 * 3],
            4,
            4,
            ExtendedColorType::Rgb8,
        )
        .unwrap();

        assert!(matches!(
            read_frames(dir.path(), &config.spec),
            Err(FrameIoError::GeometryMismatch { index: 0, .. })
        ));
    }
}
