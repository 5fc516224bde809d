//! Configuration types for frame geometry and framing behaviour.

use serde::{Deserialize, Serialize};

/// Default frame rate for video output (frames per second).
fn default_frame_rate() -> u32 {
    30
}

/// Bytes per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// Single-channel, 1 byte per pixel.
    Gray,
    /// Three-channel, 3 bytes per pixel.
    #[default]
    Rgb,
}

impl PixelFormat {
    /// Number of payload bytes carried by one pixel.
    pub fn channel_depth(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelFormat::Gray => write!(f, "gray"),
            PixelFormat::Rgb => write!(f, "rgb"),
        }
    }
}

/// How the true payload length is marked within padded frame capacity.
///
/// Encoder and decoder must agree on the discipline out of band; mixing them
/// produces silently corrupted output, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FramingDiscipline {
    /// A 32-bit big-endian bit-length header precedes the payload.
    ///
    /// Round-trips every input exactly, including files whose tail is zero
    /// bytes. This is the default.
    #[default]
    Metadata,
    /// No length bookkeeping; the decoder strips trailing zero bytes.
    ///
    /// Loses any zero bytes at the true end of the file. Kept for
    /// compatibility with streams produced without a length header.
    ZeroTruncation,
}

impl std::fmt::Display for FramingDiscipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FramingDiscipline::Metadata => write!(f, "metadata"),
            FramingDiscipline::ZeroTruncation => write!(f, "zero-truncation"),
        }
    }
}

/// Fixed raster geometry shared by every frame of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSpec {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Bytes per pixel.
    #[serde(default)]
    pub pixel_format: PixelFormat,
}

impl Default for FrameSpec {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            pixel_format: PixelFormat::Rgb,
        }
    }
}

impl FrameSpec {
    /// Payload capacity of one frame in bytes.
    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize * self.pixel_format.channel_depth()
    }

    /// Check that the geometry can hold data at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Top-level codec configuration.
///
/// Every field must be identical between the encode and decode invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Frame geometry.
    #[serde(default)]
    pub spec: FrameSpec,
    /// Padding discipline.
    #[serde(default)]
    pub discipline: FramingDiscipline,
    /// Frame rate used when muxing into a video container.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            spec: FrameSpec::default(),
            discipline: FramingDiscipline::default(),
            frame_rate: default_frame_rate(),
        }
    }
}

impl CodecConfig {
    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spec.validate()?;
        if self.frame_rate == 0 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("frame dimensions must be non-zero (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("frame rate must be non-zero")]
    InvalidFrameRate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_counts_channels() {
        let gray = FrameSpec {
            width: 4,
            height: 3,
            pixel_format: PixelFormat::Gray,
        };
        assert_eq!(gray.capacity(), 12);

        let rgb = FrameSpec {
            pixel_format: PixelFormat::Rgb,
            ..gray
        };
        assert_eq!(rgb.capacity(), 36);
    }

    #[test]
    fn zero_geometry_is_rejected() {
        let spec = FrameSpec {
            width: 0,
            height: 1080,
            pixel_format: PixelFormat::Rgb,
        };
        assert!(matches!(
            spec.validate(),
            Err(ConfigError::InvalidDimensions { width: 0, .. })
        ));

        let config = CodecConfig {
            frame_rate: 0,
            ..CodecConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFrameRate)
        ));
    }

    #[test]
    fn config_json_roundtrip() {
        let config = CodecConfig {
            spec: FrameSpec {
                width: 640,
                height: 480,
                pixel_format: PixelFormat::Gray,
            },
            discipline: FramingDiscipline::ZeroTruncation,
            frame_rate: 24,
        };

        let json = serde_json::to_string(&config).unwrap();
        let back: CodecConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.spec, config.spec);
        assert_eq!(back.discipline, config.discipline);
        assert_eq!(back.frame_rate, config.frame_rate);
    }

    #[test]
    fn defaults_are_documented_values() {
        let config = CodecConfig::default();
        assert_eq!(config.spec.width, 1920);
        assert_eq!(config.spec.height, 1080);
        assert_eq!(config.discipline, FramingDiscipline::Metadata);
        assert_eq!(config.frame_rate, 30);
    }
}
