//! Read-only access to packed game archives on disk.
//!
//! An [`Archive`] parses a container's directory table once, keeps only the
//! container path and the parsed directory, and re-opens the file for every
//! member read. Each [`MemberStream`] owns its own file handle or decompressed
//! buffer, so handles and streams can be used from independent threads
//! without sharing a seek position.
//!
//! ```text
//! Archive::open(path, variant)
//!   └─ parse_directory ─→ Directory (name → offset, size)
//! Archive::open_member(name)
//!   └─ reopen ─→ seek ─→ signature check ─┬─ raw:        MemberStream::Window
//!                                         └─ compressed: MemberStream::Memory
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use pakfile_storage::{Archive, FormatVariant};
//! use std::io::Read;
//!
//! let archive = Archive::open("DATA.PAK", FormatVariant::record_table())?;
//! for name in archive.members() {
//!     println!("{name}");
//! }
//!
//! let mut bytes = Vec::new();
//! archive.open_member("ITEM1")?.read_to_end(&mut bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]

use pakfile_formats::{CompressionError, DirectoryError};
use std::path::PathBuf;
use thiserror::Error;

// Archive handle
pub mod archive;

// Configuration
pub mod config;

// Bounded member streams
pub mod stream;

pub use archive::Archive;
pub use config::ArchiveConfig;
pub use pakfile_formats::{
    Decompressor, Entry, FormatKind, FormatVariant, Lzss, ParseWarning, TableKey,
};
pub use stream::MemberStream;

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur during archive operations.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Container could not be opened, read, or seeked.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A mandatory header field is missing or inconsistent.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// The table parsed but yielded no members.
    #[error("Archive has no usable directory entries: {}", path.display())]
    EmptyDirectory {
        /// Container path
        path: PathBuf,
    },

    /// Layout detection was given no candidates to try.
    #[error("No candidate formats to try for {}", path.display())]
    UnknownFormat {
        /// Container path
        path: PathBuf,
    },

    /// No member with this name.
    #[error("Member not found: {0}")]
    NotFound(String),

    /// The container holds fewer bytes than the directory promised.
    #[error("Truncated read of {name}: expected {expected} bytes, {actual} available")]
    TruncatedRead {
        /// Member name
        name: String,
        /// Size from the directory
        expected: u64,
        /// Bytes actually available
        actual: u64,
    },

    /// The member carried the compression signature but could not be expanded.
    #[error("Decompression of {name} failed: {source}")]
    DecompressionFailure {
        /// Member name
        name: String,
        /// Codec error
        #[source]
        source: CompressionError,
    },
}

impl ArchiveError {
    /// Whether retrying the same call could succeed.
    ///
    /// Only I/O failures qualify; corrupt data reads the same every time.
    /// Directory I/O errors arrive here as `Io` too, never as
    /// `MalformedHeader`.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Whether this is the soft "parsed but empty" outcome rather than a
    /// failure to read the container.
    pub const fn is_empty_directory(&self) -> bool {
        matches!(self, Self::EmptyDirectory { .. })
    }
}

impl From<DirectoryError> for ArchiveError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Io(e) => Self::Io(e),
            DirectoryError::MalformedHeader(reason) => Self::MalformedHeader(reason),
            DirectoryError::BinRw(e) => Self::MalformedHeader(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let io = ArchiveError::Io(std::io::Error::other("busy"));
        assert!(io.is_retryable());
        assert!(!ArchiveError::NotFound("x".to_string()).is_retryable());
        assert!(!ArchiveError::MalformedHeader("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_directory_error_mapping() {
        let err: ArchiveError = DirectoryError::MalformedHeader("short".to_string()).into();
        assert!(matches!(err, ArchiveError::MalformedHeader(ref r) if r == "short"));
    }

    #[test]
    fn test_directory_io_stays_retryable() {
        let err: ArchiveError = DirectoryError::Io(std::io::Error::other("eio")).into();
        assert!(matches!(err, ArchiveError::Io(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_oversized_payload_is_permanent() {
        let err = ArchiveError::DecompressionFailure {
            name: "huge".to_string(),
            source: CompressionError::PayloadTooLarge { size: u64::MAX },
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_empty_directory_is_distinct() {
        let err = ArchiveError::EmptyDirectory {
            path: PathBuf::from("x.pak"),
        };
        assert!(err.is_empty_directory());
        assert!(!err.is_retryable());
    }
}
