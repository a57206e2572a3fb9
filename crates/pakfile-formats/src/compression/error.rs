//! Compression error types

use thiserror::Error;

/// Result type for payload decompression
pub type CompressionResult<T> = Result<T, CompressionError>;

/// Decompression failures
#[derive(Debug, Error)]
pub enum CompressionError {
    /// Declared length exceeds the decompression limit
    #[error("declared length {declared} exceeds limit of {limit} bytes")]
    SizeLimitExceeded {
        /// Length from the compression header
        declared: usize,
        /// Configured limit
        limit: usize,
    },

    /// Codec output length did not match the header
    #[error("decompressed length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length from the compression header
        expected: usize,
        /// Length actually produced
        actual: usize,
    },

    /// Payload carries the magic but ends inside the header
    #[error("compression header truncated: {len} of 18 bytes present")]
    TruncatedHeader {
        /// Payload length
        len: usize,
    },

    /// Compressed payload is too large to buffer on this platform
    #[error("compressed payload of {size} bytes does not fit in memory")]
    PayloadTooLarge {
        /// Payload size from the directory
        size: u64,
    },

    /// Compressed stream is malformed
    #[error("corrupt compressed stream: {0}")]
    Corrupt(String),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}
