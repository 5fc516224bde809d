//! pixelpack CLI - Encode files into frame sequences and back.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use pixelpack::codec::{Encoder, decode};
use pixelpack::io::{read_frames, read_video, write_frames, write_video};
use pixelpack::schema::{CodecConfig, FrameSpec, FramingDiscipline, PixelFormat};

/// Pack arbitrary files into lossless raster frames (PNG or video) and back.
#[derive(Parser)]
#[command(name = "pixelpack", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a file into a frame sequence.
    ///
    /// The output is a directory of PNG frames, or a single lossless video
    /// when --video is given or the output path has a video extension.
    Encode {
        /// File to encode.
        input: PathBuf,
        /// Output directory (PNG mode) or video file.
        output: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
        /// Mux frames into a lossless FFV1 video (requires ffmpeg on PATH).
        #[arg(long)]
        video: bool,
        /// Frame rate for video output.
        #[arg(long, default_value_t = 30)]
        fps: u32,
    },
    /// Decode a frame sequence back into the original file.
    ///
    /// Geometry and discipline options must match the encode invocation
    /// exactly; a mismatch produces garbage, not an error.
    Decode {
        /// Frame directory or video file to decode.
        input: PathBuf,
        /// Path for the reconstructed file.
        output: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
    },
}

#[derive(Args)]
struct CodecArgs {
    /// Frame width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,
    /// Frame height in pixels.
    #[arg(long, default_value_t = 1080)]
    height: u32,
    /// Bytes per pixel.
    #[arg(long, value_enum, default_value_t = PixelArg::Rgb)]
    pixel: PixelArg,
    /// How the true payload length is marked within frame padding.
    ///
    /// `zero-truncation` silently drops trailing zero bytes of the original
    /// file and exists for legacy streams only.
    #[arg(long, value_enum, default_value_t = DisciplineArg::Metadata)]
    discipline: DisciplineArg,
    /// JSON file holding a full codec configuration; replaces the flags above.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl CodecArgs {
    fn into_config(self, frame_rate: u32) -> Result<CodecConfig> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()));
        }

        Ok(CodecConfig {
            spec: FrameSpec {
                width: self.width,
                height: self.height,
                pixel_format: self.pixel.into(),
            },
            discipline: self.discipline.into(),
            frame_rate,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PixelArg {
    Gray,
    Rgb,
}

impl From<PixelArg> for PixelFormat {
    fn from(arg: PixelArg) -> Self {
        match arg {
            PixelArg::Gray => PixelFormat::Gray,
            PixelArg::Rgb => PixelFormat::Rgb,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DisciplineArg {
    Metadata,
    ZeroTruncation,
}

impl From<DisciplineArg> for FramingDiscipline {
    fn from(arg: DisciplineArg) -> Self {
        match arg {
            DisciplineArg::Metadata => FramingDiscipline::Metadata,
            DisciplineArg::ZeroTruncation => FramingDiscipline::ZeroTruncation,
        }
    }
}

fn has_video_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("mkv" | "avi" | "mov" | "nut")
    )
}

fn frame_progress(count: usize) -> ProgressBar {
    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} frames ({eta})")
            .expect("static template")
            .progress_chars("=> "),
    );
    pb
}

fn run_encode(
    input: PathBuf,
    output: PathBuf,
    config: CodecConfig,
    video: bool,
) -> Result<()> {
    let data = std::fs::read(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    config.validate()?;

    let encoder = Encoder::new(&data, &config)?;
    let pb = frame_progress(encoder.frame_count());
    let frames = encoder.frames().inspect(|_| pb.inc(1));

    let start = Instant::now();
    let written = if video {
        write_video(&output, &config.spec, config.frame_rate, frames)
            .with_context(|| format!("muxing video {}", output.display()))?
    } else {
        write_frames(&output, &config.spec, frames)
            .with_context(|| format!("writing frames to {}", output.display()))?
    };
    pb.finish_and_clear();

    println!(
        "Encoded {} bytes into {} frame(s) ({}x{} {}, {} discipline) in {:.2}s",
        data.len(),
        written,
        config.spec.width,
        config.spec.height,
        config.spec.pixel_format,
        config.discipline,
        start.elapsed().as_secs_f32(),
    );
    println!("Output: {}", output.display());
    Ok(())
}

fn run_decode(input: PathBuf, output: PathBuf, config: CodecConfig) -> Result<()> {
    config.validate()?;

    let start = Instant::now();
    let frames = if input.is_dir() {
        read_frames(&input, &config.spec)
            .with_context(|| format!("reading frames from {}", input.display()))?
    } else {
        read_video(&input, &config.spec)
            .with_context(|| format!("demuxing video {}", input.display()))?
    };

    let report = decode(&frames, &config)
        .with_context(|| format!("decoding {} frame(s)", frames.len()))?;
    if let Some(warning) = report.warning {
        log::warn!("{warning}");
        eprintln!("warning: {warning}");
    }

    std::fs::write(&output, &report.bytes)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Decoded {} frame(s) into {} bytes in {:.2}s",
        report.frames_read,
        report.bytes.len(),
        start.elapsed().as_secs_f32(),
    );
    println!("Output: {}", output.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Encode {
            input,
            output,
            codec,
            video,
            fps,
        } => {
            let video = video || has_video_extension(&output);
            let config = codec.into_config(fps)?;
            run_encode(input, output, config, video)
        }
        Command::Decode {
            input,
            output,
            codec,
        } => {
            let config = codec.into_config(30)?;
            run_decode(input, output, config)
        }
    }
}
