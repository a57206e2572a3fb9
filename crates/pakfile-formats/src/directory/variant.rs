//! Directory table layout selection

use pakfile_crypto::{FieldMask, KeystreamParams};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default sanity cap on entries accepted from one table scan
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// Layout of an archive's directory table, with any parameters the layout
/// needs to be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatVariant {
    /// Fixed header with a tail pointer to a secondary table
    TailPointer {
        /// Expected signature bytes at the start of the file
        signature: [u8; 4],
    },
    /// Guard word followed by fixed-stride 52-byte records
    RecordTable {
        /// Bytes to skip before the guard word
        #[serde(default)]
        preamble: u64,
    },
    /// Masked header locating a keystream-obfuscated record block
    EncryptedTable(TableKey),
}

impl FormatVariant {
    /// Record table with no preamble
    pub const fn record_table() -> Self {
        Self::RecordTable { preamble: 0 }
    }

    /// Untagged kind of this variant
    pub const fn kind(&self) -> FormatKind {
        match self {
            Self::TailPointer { .. } => FormatKind::TailPointer,
            Self::RecordTable { .. } => FormatKind::RecordTable,
            Self::EncryptedTable(_) => FormatKind::EncryptedTable,
        }
    }
}

/// Variant tag without parameters or key material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// Variant A
    TailPointer,
    /// Variant B
    RecordTable,
    /// Variant C
    EncryptedTable,
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TailPointer => "tail-pointer",
            Self::RecordTable => "record-table",
            Self::EncryptedTable => "encrypted-table",
        };
        f.write_str(name)
    }
}

/// Parameters for decoding an encrypted table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableKey {
    /// Expected magic; `None` accepts any value
    #[serde(default)]
    pub magic: Option<[u8; 4]>,
    /// Keystream applied to the table block
    pub stream: KeystreamParams,
    /// Mask over the table offset header field
    pub offset_mask: FieldMask,
    /// Mask over the table size header field
    pub size_mask: FieldMask,
}

impl TableKey {
    /// Create a table key that accepts any magic
    pub const fn new(stream: KeystreamParams, offset_mask: u32, size_mask: u32) -> Self {
        Self {
            magic: None,
            stream,
            offset_mask: FieldMask(offset_mask),
            size_mask: FieldMask(size_mask),
        }
    }

    /// Require a specific magic
    #[must_use]
    pub const fn with_magic(mut self, magic: [u8; 4]) -> Self {
        self.magic = Some(magic);
        self
    }
}

/// Options shared by all table parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum entries accepted from one scan
    pub max_entries: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}
