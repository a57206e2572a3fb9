//! Directory table model and parsers
//!
//! Every variant produces the same [`Directory`]: an insertion-ordered map
//! from member name to [`Entry`], plus the warnings collected while scanning.
//!
//! # Invariants
//!
//! - Every accepted entry satisfies `offset + size <= container_len`;
//!   entries that do not are skipped with [`ParseWarning::EntryOutOfBounds`]
//! - At most [`ParseOptions::max_entries`] entries are accepted per scan
//! - A duplicate name replaces the earlier record's window but keeps its
//!   listing position
//!
//! ```text
//! parse_directory ─┬─ TailPointer    ─→ header only, secondary table not walked
//!                  ├─ RecordTable    ─→ guard + 52-byte records
//!                  └─ EncryptedTable ─→ masked header + keystream block
//! ```

mod encrypted_table;
mod entry;
mod error;
mod record_table;
mod tail_pointer;
mod variant;

pub use encrypted_table::{
    ENCRYPTED_HEADER_SIZE, ENCRYPTED_RECORD_SIZE, EncryptedTableEntry, EncryptedTableHeader,
};
pub use entry::Entry;
pub use error::{DirectoryError, DirectoryResult, ParseWarning};
pub use record_table::{RECORD_SIZE, RECORD_TABLE_GUARD_LIMIT, RecordTableEntry};
pub use tail_pointer::{TAIL_POINTER_HEADER_SIZE, TailPointerHeader};
pub use variant::{DEFAULT_MAX_ENTRIES, FormatKind, FormatVariant, ParseOptions, TableKey};

use binrw::io::{Read, Seek};
use std::collections::HashMap;

/// Parsed directory of one container
#[derive(Debug, Clone)]
pub struct Directory {
    kind: FormatKind,
    container_len: u64,
    max_entries: usize,
    data_base: Option<u64>,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    warnings: Vec<ParseWarning>,
}

impl Directory {
    /// Create an empty directory for a container of `container_len` bytes
    pub fn new(kind: FormatKind, container_len: u64, options: &ParseOptions) -> Self {
        Self {
            kind,
            container_len,
            max_entries: options.max_entries,
            data_base: None,
            entries: Vec::new(),
            index: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an entry, enforcing the bounds invariant and duplicate handling.
    ///
    /// Returns `false` when the entry was rejected for lying outside the
    /// container. Callers check [`is_full`](Self::is_full) separately.
    pub fn insert(&mut self, entry: Entry) -> bool {
        if !entry.fits_within(self.container_len) {
            self.warnings.push(ParseWarning::EntryOutOfBounds {
                name: entry.name,
                offset: entry.offset,
                size: entry.size,
            });
            return false;
        }

        if let Some(&slot) = self.index.get(&entry.name) {
            self.warnings.push(ParseWarning::DuplicateName {
                name: entry.name.clone(),
            });
            self.entries[slot] = entry;
        } else {
            self.index.insert(entry.name.clone(), self.entries.len());
            self.entries.push(entry);
        }
        true
    }

    /// Whether the entry cap has been reached
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max_entries
    }

    /// Record that scanning stopped at the cap
    pub(crate) fn mark_cap_reached(&mut self) {
        self.warnings.push(ParseWarning::EntryCapReached {
            cap: self.max_entries,
        });
    }

    /// Record a soft parsing condition
    pub fn warn(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    pub(crate) fn set_data_base(&mut self, base: u64) {
        self.data_base = Some(base);
    }

    /// Variant that produced this directory
    pub const fn kind(&self) -> FormatKind {
        self.kind
    }

    /// Total byte length of the container the table was read from
    pub const fn container_len(&self) -> u64 {
        self.container_len
    }

    /// Start of the data section, for layouts that declare one
    pub const fn data_base(&self) -> Option<u64> {
        self.data_base
    }

    /// Look up an entry by exact name
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    /// Whether a member with this exact name exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Member names in table order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Entries in table order
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Number of distinct members
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory has no members
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Warnings collected during the scan
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Whether any warning marks the table as incomplete or unusable
    pub fn is_degraded(&self) -> bool {
        self.warnings.iter().any(ParseWarning::is_degrading)
    }
}

impl<'a> IntoIterator for &'a Directory {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parse the directory table of a container.
///
/// `container_len` is the total byte length of the source and bounds every
/// entry. The variant is dispatched exactly once; no guessing happens here.
pub fn parse_directory<R: Read + Seek>(
    reader: &mut R,
    container_len: u64,
    variant: &FormatVariant,
    options: &ParseOptions,
) -> DirectoryResult<Directory> {
    match variant {
        FormatVariant::TailPointer { signature } => {
            tail_pointer::parse(reader, container_len, *signature, options)
        }
        FormatVariant::RecordTable { preamble } => {
            record_table::parse(reader, container_len, *preamble, options)
        }
        FormatVariant::EncryptedTable(key) => {
            encrypted_table::parse(reader, container_len, key, options)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn directory(len: u64) -> Directory {
        Directory::new(FormatKind::RecordTable, len, &ParseOptions::default())
    }

    #[test]
    fn test_out_of_bounds_entry_skipped() {
        let mut dir = directory(100);
        assert!(!dir.insert(Entry::new("BIG", 90, 11)));
        assert!(dir.is_empty());
        assert_eq!(
            dir.warnings(),
            &[ParseWarning::EntryOutOfBounds {
                name: "BIG".to_string(),
                offset: 90,
                size: 11,
            }]
        );
        assert!(!dir.is_degraded());
    }

    #[test]
    fn test_duplicate_keeps_position_and_takes_latest_window() {
        let mut dir = directory(1000);
        dir.insert(Entry::new("A", 0, 1));
        dir.insert(Entry::new("B", 10, 1));
        dir.insert(Entry::new("A", 20, 5));

        assert_eq!(dir.names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(dir.get("A"), Some(&Entry::new("A", 20, 5)));
        assert_eq!(
            dir.warnings(),
            &[ParseWarning::DuplicateName {
                name: "A".to_string()
            }]
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut dir = directory(100);
        dir.insert(Entry::new("Sprite", 0, 1));
        assert!(dir.contains("Sprite"));
        assert!(!dir.contains("sprite"));
        assert!(!dir.contains("SPRITE"));
    }

    #[test]
    fn test_cap() {
        let options = ParseOptions { max_entries: 2 };
        let mut dir = Directory::new(FormatKind::RecordTable, 100, &options);
        dir.insert(Entry::new("A", 0, 1));
        assert!(!dir.is_full());
        dir.insert(Entry::new("B", 0, 1));
        assert!(dir.is_full());
    }
}
