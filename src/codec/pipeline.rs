//! Whole-stream encode and decode drivers.
//!
//! Packing and unpacking are pure per frame, so both directions fan out over
//! rayon. Order never depends on worker completion: results are indexed into
//! pre-sized slots.

use log::debug;
use rayon::prelude::*;

use crate::schema::{CodecConfig, FrameSpec, FramingDiscipline};

use super::framing::{
    CorruptionWarning, LENGTH_HEADER_LEN, encode_length_header, recover_payload,
};
use super::geometry::FramePlan;
use super::packer::{pack_frame, unpack_frame};
use super::{CodecError, Frame};

/// Stateless frame producer for one encode operation.
///
/// Frames can be pulled lazily with [`frames`](Encoder::frames) (bounded
/// memory, streaming I/O) or materialized in parallel with
/// [`encode_all`](Encoder::encode_all). Both orders of use yield identical
/// frames: [`frame`](Encoder::frame) is a pure function of the index.
pub struct Encoder<'a> {
    header: Option<[u8; LENGTH_HEADER_LEN]>,
    data: &'a [u8],
    plan: FramePlan,
    spec: FrameSpec,
}

impl<'a> Encoder<'a> {
    /// Set up an encode of `data` under `config`.
    ///
    /// Fails fast on invalid geometry and, under the metadata discipline, on
    /// payloads too large for the 32-bit bit-length header.
    pub fn new(data: &'a [u8], config: &CodecConfig) -> Result<Self, CodecError> {
        config.validate()?;

        let header = match config.discipline {
            FramingDiscipline::Metadata => Some(encode_length_header(data.len())?),
            FramingDiscipline::ZeroTruncation => None,
        };
        let header_len = header.map_or(0, |h| h.len());
        let plan = FramePlan::new(data.len() + header_len, &config.spec);

        debug!(
            "planned {} frame(s) of {} bytes for a {} byte payload ({})",
            plan.frame_count(),
            plan.capacity(),
            data.len(),
            config.discipline,
        );

        Ok(Self {
            header,
            data,
            plan,
            spec: config.spec,
        })
    }

    /// Number of frames this encode will produce.
    pub fn frame_count(&self) -> usize {
        self.plan.frame_count()
    }

    /// Geometry shared by every produced frame.
    pub fn spec(&self) -> &FrameSpec {
        &self.spec
    }

    /// Produce frame `index`.
    ///
    /// The payload seen by the planner is the virtual concatenation of the
    /// optional length header and the input bytes; this selects the chunk
    /// falling inside the frame's byte range and hands it to the packer.
    pub fn frame(&self, index: usize) -> Frame {
        let range = self.plan.byte_range(index);
        let header_len = self.header.map_or(0, |h| h.len());

        let pixels = match &self.header {
            // Only the leading frame(s) overlap the length header; stitch
            // header and data bytes into one chunk before packing.
            Some(header) if range.start < header.len() => {
                let take = range.end.min(header.len()) - range.start;
                let mut chunk = Vec::with_capacity(range.len());
                chunk.extend_from_slice(&header[range.start..range.start + take]);
                if range.end > header.len() {
                    chunk.extend_from_slice(&self.data[..range.end - header.len()]);
                }
                pack_frame(&chunk, &self.spec)
            }
            _ => pack_frame(
                &self.data[range.start - header_len..range.end - header_len],
                &self.spec,
            ),
        };

        Frame {
            index: index as u32,
            pixels,
        }
    }

    /// Iterate over all frames lazily, in order.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        (0..self.frame_count()).map(|i| self.frame(i))
    }

    /// Materialize all frames, packing in parallel.
    pub fn encode_all(&self) -> Vec<Frame> {
        (0..self.frame_count())
            .into_par_iter()
            .map(|i| self.frame(i))
            .collect()
    }
}

/// Encode `data` into a complete frame sequence.
pub fn encode(data: &[u8], config: &CodecConfig) -> Result<Vec<Frame>, CodecError> {
    Ok(Encoder::new(data, config)?.encode_all())
}

/// Outcome of a decode, including non-fatal anomalies.
#[derive(Debug)]
pub struct DecodeReport {
    /// The reconstructed byte stream.
    pub bytes: Vec<u8>,
    /// Number of frames consumed.
    pub frames_read: usize,
    /// Non-fatal anomaly, surfaced rather than thrown.
    pub warning: Option<CorruptionWarning>,
}

/// Decode an ordered frame sequence back into the original bytes.
///
/// `frames` must be the complete sequence in encode order; the I/O layer is
/// responsible for restoring that order from embedded indices. Any gap,
/// reorder, or geometry mismatch aborts: a single bad frame corrupts every
/// downstream byte offset.
pub fn decode(frames: &[Frame], config: &CodecConfig) -> Result<DecodeReport, CodecError> {
    config.validate()?;

    if frames.is_empty() {
        return Err(CodecError::EmptySequence);
    }

    let capacity = config.spec.capacity();
    for (position, frame) in frames.iter().enumerate() {
        if frame.index as usize != position {
            return Err(CodecError::OutOfOrder {
                expected: position as u32,
                found: frame.index,
            });
        }
        if frame.pixels.len() != capacity {
            return Err(CodecError::FrameSizeMismatch {
                index: frame.index,
                expected: capacity,
                found: frame.pixels.len(),
            });
        }
    }

    let mut stream = vec![0u8; frames.len() * capacity];
    stream
        .par_chunks_mut(capacity)
        .zip(frames.par_iter())
        .for_each(|(slot, frame)| slot.copy_from_slice(unpack_frame(frame)));

    debug!(
        "recovered {} byte(s) from {} frame(s)",
        stream.len(),
        frames.len()
    );

    let (bytes, warning) = recover_payload(stream, config.discipline)?;
    Ok(DecodeReport {
        bytes,
        frames_read: frames.len(),
        warning,
    })
}
