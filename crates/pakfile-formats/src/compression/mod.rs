//! Signature-triggered payload decompression
//!
//! A member payload is compressed when its first four bytes, read
//! big-endian, equal the archive's compression magic. Otherwise the payload
//! is returned verbatim.
//!
//! The codec sits behind [`Decompressor`] so callers can plug in another
//! implementation of the game's algorithm; [`Lzss`] is the built-in one.

mod error;
mod header;
mod lzss;

pub use error::{CompressionError, CompressionResult};
pub use header::{COMPRESSION_HEADER_SIZE, CompressionHeader, DEFAULT_COMPRESSION_MAGIC};
pub use lzss::Lzss;

use std::borrow::Cow;

/// Maximum allowed decompression size (1 GB)
///
/// Limits decompression output so a corrupt or hostile length field cannot
/// force a huge allocation.
pub const MAX_DECOMPRESSION_SIZE: usize = 1024 * 1024 * 1024;

/// Codec that expands a compressed stream to an exact length
pub trait Decompressor: Send + Sync {
    /// Decompress `src` into exactly `expected_len` bytes.
    fn decompress(&self, src: &[u8], expected_len: usize) -> CompressionResult<Vec<u8>>;
}

/// Decompress a payload whose header has already been detected.
///
/// `payload` is the whole raw payload, header included.
pub fn decompress_payload(
    header: &CompressionHeader,
    payload: &[u8],
    codec: &dyn Decompressor,
) -> CompressionResult<Vec<u8>> {
    let expected = header.decompressed_len();
    if expected > MAX_DECOMPRESSION_SIZE {
        return Err(CompressionError::SizeLimitExceeded {
            declared: expected,
            limit: MAX_DECOMPRESSION_SIZE,
        });
    }

    let stream = payload.get(COMPRESSION_HEADER_SIZE..).unwrap_or_default();
    let output = codec.decompress(stream, expected)?;
    if output.len() != expected {
        return Err(CompressionError::LengthMismatch {
            expected,
            actual: output.len(),
        });
    }
    Ok(output)
}

/// Return the payload as stored, or decompressed if it carries `magic`.
pub fn decode_payload<'a>(
    payload: &'a [u8],
    magic: u32,
    codec: &dyn Decompressor,
) -> CompressionResult<Cow<'a, [u8]>> {
    match CompressionHeader::detect(payload, magic)? {
        Some(header) => decompress_payload(&header, payload, codec).map(Cow::Owned),
        None => Ok(Cow::Borrowed(payload)),
    }
}
