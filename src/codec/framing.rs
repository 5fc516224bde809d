//! Padding disciplines: marking and recovering the true payload length.
//!
//! Two mutually exclusive disciplines exist (see
//! [`FramingDiscipline`](crate::schema::FramingDiscipline)). The metadata
//! discipline prepends a 32-bit big-endian header holding the payload length
//! in bits and is correct for every input. The zero-truncation discipline
//! strips trailing zero bytes and silently loses any zero bytes at the true
//! end of the file.

use crate::schema::FramingDiscipline;

use super::CodecError;

/// Size of the metadata length header in bytes.
pub const LENGTH_HEADER_LEN: usize = 4;

/// Encode the metadata length header for a payload of `payload_len` bytes.
///
/// The header stores the length in bits, big-endian, so payloads above
/// `u32::MAX / 8` bytes do not fit and are rejected.
pub fn encode_length_header(payload_len: usize) -> Result<[u8; LENGTH_HEADER_LEN], CodecError> {
    let bits = (payload_len as u64)
        .checked_mul(8)
        .and_then(|bits| u32::try_from(bits).ok())
        .ok_or(CodecError::PayloadTooLarge { len: payload_len })?;
    Ok(bits.to_be_bytes())
}

/// Non-fatal decode anomaly, surfaced to the caller rather than thrown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorruptionWarning {
    /// Bytes in the discarded padding region that were not zero.
    pub nonzero_padding_bytes: usize,
}

impl std::fmt::Display for CorruptionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} non-zero byte(s) in the padding region; the payload length header may be stale",
            self.nonzero_padding_bytes
        )
    }
}

/// Recover the payload from the concatenated bytes of all frames.
///
/// `stream` is everything the unpacker produced, in frame order, padding
/// included. Returns the payload plus an optional warning.
pub fn recover_payload(
    mut stream: Vec<u8>,
    discipline: FramingDiscipline,
) -> Result<(Vec<u8>, Option<CorruptionWarning>), CodecError> {
    match discipline {
        FramingDiscipline::Metadata => {
            if stream.len() < LENGTH_HEADER_LEN {
                return Err(CodecError::TruncatedHeader {
                    available_bytes: stream.len(),
                });
            }
            let declared_bits =
                u32::from_be_bytes([stream[0], stream[1], stream[2], stream[3]]) as u64;
            if declared_bits % 8 != 0 {
                return Err(CodecError::MisalignedLength { declared_bits });
            }

            let payload_len = (declared_bits / 8) as usize;
            let available = stream.len() - LENGTH_HEADER_LEN;
            if payload_len > available {
                return Err(CodecError::LengthOutOfRange {
                    declared_bits,
                    available_bits: available as u64 * 8,
                });
            }

            let nonzero_padding_bytes = stream[LENGTH_HEADER_LEN + payload_len..]
                .iter()
                .filter(|&&b| b != 0)
                .count();

            stream.drain(..LENGTH_HEADER_LEN);
            stream.truncate(payload_len);

            let warning = (nonzero_padding_bytes > 0).then_some(CorruptionWarning {
                nonzero_padding_bytes,
            });
            Ok((stream, warning))
        }
        FramingDiscipline::ZeroTruncation => {
            // Trailing real zero bytes are indistinguishable from padding
            // here; they are dropped. Documented limitation of the mode.
            let end = stream.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            stream.truncate(end);
            Ok((stream, None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_bit_length_big_endian() {
        assert_eq!(encode_length_header(0).unwrap(), [0, 0, 0, 0]);
        // 30 bytes = 240 bits = 0x00_00_00_F0.
        assert_eq!(encode_length_header(30).unwrap(), [0, 0, 0, 0xF0]);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let too_big = (u32::MAX as usize / 8) + 1;
        assert!(matches!(
            encode_length_header(too_big),
            Err(CodecError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn metadata_recovers_exact_payload() {
        let mut stream = encode_length_header(3).unwrap().to_vec();
        stream.extend_from_slice(&[10, 0, 30]);
        stream.extend_from_slice(&[0; 5]); // padding

        let (payload, warning) =
            recover_payload(stream, FramingDiscipline::Metadata).unwrap();
        assert_eq!(payload, vec![10, 0, 30]);
        assert!(warning.is_none());
    }

    #[test]
    fn metadata_preserves_trailing_zero_bytes() {
        let mut stream = encode_length_header(4).unwrap().to_vec();
        stream.extend_from_slice(&[1, 0, 0, 0]);
        stream.extend_from_slice(&[0; 4]);

        let (payload, _) = recover_payload(stream, FramingDiscipline::Metadata).unwrap();
        assert_eq!(payload, vec![1, 0, 0, 0]);
    }

    #[test]
    fn declared_length_beyond_available_is_an_error() {
        let mut stream = encode_length_header(100).unwrap().to_vec();
        stream.extend_from_slice(&[0; 10]);

        assert!(matches!(
            recover_payload(stream, FramingDiscipline::Metadata),
            Err(CodecError::LengthOutOfRange {
                declared_bits: 800,
                available_bits: 80,
            })
        ));
    }

    #[test]
    fn misaligned_bit_length_is_an_error() {
        let mut stream = 13u32.to_be_bytes().to_vec();
        stream.extend_from_slice(&[0; 8]);

        assert!(matches!(
            recover_payload(stream, FramingDiscipline::Metadata),
            Err(CodecError::MisalignedLength { declared_bits: 13 })
        ));
    }

    #[test]
    fn stream_shorter_than_header_is_an_error() {
        assert!(matches!(
            recover_payload(vec![0, 0], FramingDiscipline::Metadata),
            Err(CodecError::TruncatedHeader { available_bytes: 2 })
        ));
    }

    #[test]
    fn nonzero_padding_surfaces_a_warning() {
        let mut stream = encode_length_header(2).unwrap().to_vec();
        stream.extend_from_slice(&[7, 7]);
        stream.extend_from_slice(&[0, 9, 0, 9]);

        let (payload, warning) =
            recover_payload(stream, FramingDiscipline::Metadata).unwrap();
        assert_eq!(payload, vec![7, 7]);
        assert_eq!(
            warning,
            Some(CorruptionWarning {
                nonzero_padding_bytes: 2
            })
        );
    }

    #[test]
    fn zero_truncation_strips_all_trailing_zeros() {
        let (payload, warning) = recover_payload(
            vec![1, 2, 0, 3, 0, 0, 0],
            FramingDiscipline::ZeroTruncation,
        )
        .unwrap();
        assert_eq!(payload, vec![1, 2, 0, 3]);
        assert!(warning.is_none());
    }

    #[test]
    fn zero_truncation_of_all_zeros_is_empty() {
        let (payload, _) =
            recover_payload(vec![0; 16], FramingDiscipline::ZeroTruncation).unwrap();
        assert!(payload.is_empty());
    }
}
