//! Compression header at the start of a member payload

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};

use super::error::{CompressionError, CompressionResult};

/// Size of the compression header in bytes
pub const COMPRESSION_HEADER_SIZE: usize = 18;

/// Default compression magic, `"LZSS"` read big-endian
pub const DEFAULT_COMPRESSION_MAGIC: u32 = u32::from_be_bytes(*b"LZSS");

/// Header of a compressed payload
///
/// ```text
/// 0x00  magic             u32 BE
/// 0x04  reserved          [u8; 10]
/// 0x0E  decompressed_len  u32 BE
/// 0x12  compressed stream ...
/// ```
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct CompressionHeader {
    /// Compression magic
    pub magic: u32,
    /// Opaque bytes between the magic and the length
    pub reserved: [u8; 10],
    /// Exact length of the decompressed payload
    pub decompressed_len: u32,
}

impl CompressionHeader {
    /// Header for a payload that decompresses to `decompressed_len` bytes
    pub const fn new(magic: u32, decompressed_len: u32) -> Self {
        Self {
            magic,
            reserved: [0; 10],
            decompressed_len,
        }
    }

    /// Parse the header if `payload` starts with `magic`.
    ///
    /// Returns `Ok(None)` for payloads that do not start with the magic,
    /// including those shorter than the magic itself. A payload that starts
    /// with the magic but ends before the length field is an error.
    pub fn detect(payload: &[u8], magic: u32) -> CompressionResult<Option<Self>> {
        let Some(lead) = payload.first_chunk::<4>() else {
            return Ok(None);
        };
        if u32::from_be_bytes(*lead) != magic {
            return Ok(None);
        }
        if payload.len() < COMPRESSION_HEADER_SIZE {
            return Err(CompressionError::TruncatedHeader { len: payload.len() });
        }
        Ok(Some(Self::read(&mut Cursor::new(
            &payload[..COMPRESSION_HEADER_SIZE],
        ))?))
    }

    /// Declared output length
    pub const fn decompressed_len(&self) -> usize {
        self.decompressed_len as usize
    }
}
