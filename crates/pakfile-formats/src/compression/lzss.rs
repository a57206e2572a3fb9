//! LZSS codec for compressed member payloads
//!
//! Classic 4 KiB sliding-window LZSS:
//!
//! - ring buffer of 4096 bytes pre-filled with spaces, first write at 4078
//! - each group starts with a flag byte, consumed least significant bit first
//! - flag bit 1: one literal byte
//! - flag bit 0: two bytes `lo, hi` giving ring position
//!   `lo | (hi & 0xF0) << 4` and length `(hi & 0x0F) + 3`

use super::Decompressor;
use super::error::{CompressionError, CompressionResult};

const RING_SIZE: usize = 4096;
const MAX_MATCH: usize = 18;
const MIN_MATCH: usize = 3;
const RING_FILL: u8 = b' ';

/// Upper bound on output bytes per input byte.
///
/// A flag byte followed by eight maximal back-references expands 17 bytes
/// into 144.
const MAX_EXPANSION: usize = 9;

/// Preallocation for the output buffer, bounded by what `src` can produce
fn initial_capacity(src_len: usize, expected_len: usize) -> usize {
    expected_len.min(src_len.saturating_mul(MAX_EXPANSION))
}

/// Built-in LZSS decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct Lzss;

impl Decompressor for Lzss {
    fn decompress(&self, src: &[u8], expected_len: usize) -> CompressionResult<Vec<u8>> {
        let mut ring = [RING_FILL; RING_SIZE];
        let mut r = RING_SIZE - MAX_MATCH;
        let mut out = Vec::with_capacity(initial_capacity(src.len(), expected_len));
        let mut input = src.iter().copied();

        'groups: while out.len() < expected_len {
            let Some(flags) = input.next() else {
                break;
            };

            for bit in 0..8 {
                if out.len() >= expected_len {
                    break 'groups;
                }

                if flags & (1 << bit) != 0 {
                    let Some(byte) = input.next() else {
                        break 'groups;
                    };
                    out.push(byte);
                    ring[r] = byte;
                    r = (r + 1) & (RING_SIZE - 1);
                } else {
                    let (Some(lo), Some(hi)) = (input.next(), input.next()) else {
                        break 'groups;
                    };
                    let pos = usize::from(lo) | (usize::from(hi & 0xF0) << 4);
                    let len = usize::from(hi & 0x0F) + MIN_MATCH;

                    if out.len() + len > expected_len {
                        return Err(CompressionError::Corrupt(format!(
                            "back-reference of {len} bytes overruns declared length {expected_len}"
                        )));
                    }

                    for k in 0..len {
                        let byte = ring[(pos + k) & (RING_SIZE - 1)];
                        out.push(byte);
                        ring[r] = byte;
                        r = (r + 1) & (RING_SIZE - 1);
                    }
                }
            }
        }

        if out.len() != expected_len {
            return Err(CompressionError::LengthMismatch {
                expected: expected_len,
                actual: out.len(),
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::compression::MAX_DECOMPRESSION_SIZE;

    /// Encode as literal-only groups
    fn literals(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        for group in data.chunks(8) {
            out.push(0xFF);
            out.extend_from_slice(group);
        }
        out
    }

    #[test]
    fn test_literals() {
        let data = b"sprite sheet 01";
        let decoded = Lzss.decompress(&literals(data), data.len()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_overlapping_back_reference() {
        // "ab" at 0xFEE, then copy 5 bytes from 0xFEE
        let src = [0x03, b'a', b'b', 0xEE, 0xF2];
        let decoded = Lzss.decompress(&src, 7).unwrap();
        assert_eq!(decoded, b"abababa");
    }

    #[test]
    fn test_reference_into_prefilled_ring() {
        let src = [0x00, 0x00, 0x00];
        let decoded = Lzss.decompress(&src, 3).unwrap();
        assert_eq!(decoded, b"   ");
    }

    #[test]
    fn test_short_input_is_length_mismatch() {
        let err = Lzss.decompress(&literals(b"abc"), 10).unwrap_err();
        assert!(matches!(
            err,
            CompressionError::LengthMismatch {
                expected: 10,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_overrun_is_corrupt() {
        let src = [0x00, 0x00, 0x0F];
        let err = Lzss.decompress(&src, 4).unwrap_err();
        assert!(matches!(err, CompressionError::Corrupt(_)));
    }

    #[test]
    fn test_trailing_input_ignored_once_complete() {
        let mut src = literals(b"abcdefgh");
        src.extend_from_slice(&[0xFF, 0xFF, 0xFF]);
        let decoded = Lzss.decompress(&src, 8).unwrap();
        assert_eq!(decoded, b"abcdefgh");
    }

    #[test]
    fn test_empty_output() {
        assert!(Lzss.decompress(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_preallocation_follows_input_not_header() {
        assert_eq!(initial_capacity(0, MAX_DECOMPRESSION_SIZE), 0);
        assert_eq!(initial_capacity(10, MAX_DECOMPRESSION_SIZE), 90);
        assert_eq!(initial_capacity(1000, 64), 64);
    }

    #[test]
    fn test_maximal_expansion_fits_preallocation() {
        let mut src = vec![0x00];
        for _ in 0..8 {
            src.extend_from_slice(&[0x00, 0x0F]);
        }
        assert!(144 <= initial_capacity(src.len(), usize::MAX));
        let decoded = Lzss.decompress(&src, 144).unwrap();
        assert_eq!(decoded, vec![b' '; 144]);
    }
}
