//! Configuration for opening archives

use pakfile_formats::ParseOptions;
use pakfile_formats::compression::DEFAULT_COMPRESSION_MAGIC;
use pakfile_formats::directory::DEFAULT_MAX_ENTRIES;
use serde::{Deserialize, Serialize};

/// Per-archive policy knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Maximum entries accepted from one table scan
    pub max_entries: usize,

    /// Return an empty archive instead of `EmptyDirectory`
    pub accept_empty: bool,

    /// Big-endian magic marking a compressed member payload
    pub compression_magic: u32,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            accept_empty: false,
            compression_magic: DEFAULT_COMPRESSION_MAGIC,
        }
    }
}

impl ArchiveConfig {
    /// Create a configuration with default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry cap
    #[must_use]
    pub const fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Accept archives whose table yields no members
    #[must_use]
    pub const fn with_accept_empty(mut self, accept: bool) -> Self {
        self.accept_empty = accept;
        self
    }

    /// Set the compression magic
    #[must_use]
    pub const fn with_compression_magic(mut self, magic: u32) -> Self {
        self.compression_magic = magic;
        self
    }

    pub(crate) const fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_entries: self.max_entries,
        }
    }
}
