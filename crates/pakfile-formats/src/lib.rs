//! Directory tables and payload codecs for packed game archives
//!
//! A packed archive is a single blob holding many named members (sprites,
//! scripts, audio, video) plus a directory table mapping each member name to
//! an `(offset, size)` window of the blob.
//!
//! This crate is pure: it reads from any `Read + Seek` source or byte slice
//! and never opens files itself. See `pakfile-storage` for the on-disk
//! archive handle.
//!
//! # Supported Formats
//!
//! - **Tail pointer** (variant A): fixed header with a tail pointer and a
//!   data-start field
//! - **Record table** (variant B): guard word followed by 52-byte records
//! - **Encrypted table** (variant C): masked header locating a keystream
//!   obfuscated block of 32-byte records
//!
//! Member payloads may additionally be LZSS compressed, signalled by a magic
//! value in the first four bytes (see [`compression`]).
//!
//! # Example
//!
//! ```
//! use pakfile_formats::directory::{FormatVariant, ParseOptions, parse_directory};
//! use std::io::Cursor;
//!
//! // Guard of zero, four reserved bytes, then an empty terminator record
//! let data = vec![0u8; 8 + 20];
//! let len = data.len() as u64;
//! let directory = parse_directory(
//!     &mut Cursor::new(data),
//!     len,
//!     &FormatVariant::record_table(),
//!     &ParseOptions::default(),
//! )?;
//! assert!(directory.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![warn(missing_docs)]

/// Signature-triggered payload decompression
pub mod compression;

/// Directory table model and per-variant parsers
pub mod directory;

pub use compression::{CompressionError, CompressionHeader, Decompressor, Lzss};
pub use directory::{
    Directory, DirectoryError, Entry, FormatKind, FormatVariant, ParseOptions, ParseWarning,
    TableKey, parse_directory,
};
