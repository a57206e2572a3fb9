//! Encrypted single-block table (variant C)
//!
//! ```text
//! 0x00  magic         [u8; 4]
//! 0x04  table_offset  u32 LE ^ offset_mask
//! 0x08  table_size    u32 LE ^ size_mask
//!
//! table_offset: table_size bytes, keystream obfuscated, then 32-byte records:
//!   0x00  name    [u8; 24]  NUL terminated
//!   0x18  offset  u32 LE    absolute
//!   0x1C  size    u32 LE
//! ```

use binrw::io::{Cursor, Read, Seek, SeekFrom};
use binrw::{BinRead, BinWrite};
use pakfile_crypto::KeystreamCipher;

use super::entry::{Entry, decode_name};
use super::error::{DirectoryError, DirectoryResult, ParseWarning};
use super::{Directory, FormatKind, ParseOptions, TableKey};

/// Size of the masked header in bytes
pub const ENCRYPTED_HEADER_SIZE: u64 = 12;

/// Bytes per record in the decrypted block
pub const ENCRYPTED_RECORD_SIZE: usize = 32;

/// Masked header; the table fields are stored masked
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct EncryptedTableHeader {
    /// Magic bytes
    pub magic: [u8; 4],
    /// Masked table offset
    pub table_offset: u32,
    /// Masked table size
    pub table_size: u32,
}

impl EncryptedTableHeader {
    /// Unmasked table offset and size
    pub const fn table_window(&self, key: &TableKey) -> (u64, u64) {
        (
            key.offset_mask.apply(self.table_offset) as u64,
            key.size_mask.apply(self.table_size) as u64,
        )
    }
}

/// One decrypted record
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct EncryptedTableEntry {
    /// NUL-terminated name field
    pub name: [u8; 24],
    /// Absolute payload offset
    pub offset: u32,
    /// Payload size
    pub size: u32,
}

impl EncryptedTableEntry {
    /// Build a record with a zero-padded name field
    pub fn new(name: &str, offset: u32, size: u32) -> Self {
        let mut field = [0u8; 24];
        let len = name.len().min(23);
        field[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self {
            name: field,
            offset,
            size,
        }
    }
}

pub(super) fn parse<R: Read + Seek>(
    reader: &mut R,
    container_len: u64,
    key: &TableKey,
    options: &ParseOptions,
) -> DirectoryResult<Directory> {
    reader.seek(SeekFrom::Start(0))?;
    let header = EncryptedTableHeader::read(reader)
        .map_err(|e| DirectoryError::from_header_read(e, "encrypted table"))?;

    if let Some(expected) = key.magic
        && header.magic != expected
    {
        return Err(DirectoryError::MalformedHeader(format!(
            "magic mismatch: expected {expected:02X?}, got {:02X?}",
            header.magic
        )));
    }

    let (table_offset, table_size) = header.table_window(key);
    if table_offset
        .checked_add(table_size)
        .is_none_or(|end| end > container_len)
    {
        return Err(DirectoryError::MalformedHeader(format!(
            "table {table_offset}+{table_size} exceeds container length {container_len}"
        )));
    }

    let mut directory = Directory::new(FormatKind::EncryptedTable, container_len, options);

    reader.seek(SeekFrom::Start(table_offset))?;
    let mut block = Vec::new();
    reader.by_ref().take(table_size).read_to_end(&mut block)?;
    if (block.len() as u64) < table_size {
        directory.warn(ParseWarning::TruncatedTable { parsed: 0 });
    }

    KeystreamCipher::new(key.stream).decrypt(&mut block);

    let mut records = block.chunks_exact(ENCRYPTED_RECORD_SIZE);
    for chunk in &mut records {
        let record = EncryptedTableEntry::read(&mut Cursor::new(chunk))?;
        let name = decode_name(&record.name);
        if name.is_empty() {
            continue;
        }
        if directory.is_full() {
            directory.mark_cap_reached();
            return Ok(directory);
        }
        directory.insert(Entry::new(
            name,
            u64::from(record.offset),
            u64::from(record.size),
        ));
    }

    if !records.remainder().is_empty() {
        let parsed = directory.len();
        directory.warn(ParseWarning::TruncatedTable { parsed });
    }

    Ok(directory)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::BinWriterExt;
    use pakfile_crypto::{KeystreamParams, encrypt_in_place};
    use pretty_assertions::assert_eq;

    const KEY: TableKey = TableKey::new(
        KeystreamParams::new(0x7E3A_91C4, 0x3C6E_F372, 0x0000_9E37),
        0xA5A5_A5A5,
        0x5A5A_5A5A,
    );

    fn container(records: &[EncryptedTableEntry], extra: &[u8], payload_len: usize) -> Vec<u8> {
        let mut block = Cursor::new(Vec::new());
        for record in records {
            block.write_le(record).unwrap();
        }
        let mut block = block.into_inner();
        block.extend_from_slice(extra);
        encrypt_in_place(KEY.stream, &mut block);

        let table_offset = ENCRYPTED_HEADER_SIZE as usize + payload_len;
        let header = EncryptedTableHeader {
            magic: *b"ENC1",
            table_offset: KEY.offset_mask.apply(table_offset as u32),
            table_size: KEY.size_mask.apply(block.len() as u32),
        };

        let mut out = Cursor::new(Vec::new());
        out.write_le(&header).unwrap();
        let mut out = out.into_inner();
        out.resize(table_offset, 0xCC);
        out.extend_from_slice(&block);
        out
    }

    fn run(data: Vec<u8>, key: &TableKey) -> DirectoryResult<Directory> {
        let len = data.len() as u64;
        parse(&mut Cursor::new(data), len, key, &ParseOptions::default())
    }

    #[test]
    fn test_decrypts_records() {
        let data = container(
            &[
                EncryptedTableEntry::new("music/theme.ogg", 12, 40),
                EncryptedTableEntry::new("gfx/title.png", 52, 8),
            ],
            &[],
            48,
        );
        let dir = run(data, &KEY).unwrap();

        assert_eq!(
            dir.iter().cloned().collect::<Vec<_>>(),
            vec![
                Entry::new("music/theme.ogg", 12, 40),
                Entry::new("gfx/title.png", 52, 8),
            ]
        );
        assert!(dir.warnings().is_empty());
    }

    #[test]
    fn test_magic_checked_when_configured() {
        let data = container(&[EncryptedTableEntry::new("A", 12, 1)], &[], 4);
        assert!(run(data.clone(), &KEY.with_magic(*b"ENC1")).is_ok());

        let err = run(data, &KEY.with_magic(*b"XXXX")).unwrap_err();
        assert!(matches!(err, DirectoryError::MalformedHeader(_)));
    }

    #[test]
    fn test_table_past_end_is_malformed() {
        let mut data = container(&[EncryptedTableEntry::new("A", 12, 1)], &[], 4);
        data.truncate(data.len() - 1);
        let err = run(data, &KEY).unwrap_err();
        assert!(matches!(err, DirectoryError::MalformedHeader(_)));
    }

    #[test]
    fn test_partial_trailing_record() {
        let data = container(&[EncryptedTableEntry::new("A", 12, 1)], &[0xAB; 7], 4);
        let dir = run(data, &KEY).unwrap();
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.warnings(), &[ParseWarning::TruncatedTable { parsed: 1 }]);
    }

    #[test]
    fn test_duplicates_overwrite_with_warning() {
        let data = container(
            &[
                EncryptedTableEntry::new("A", 12, 1),
                EncryptedTableEntry::new("A", 13, 2),
            ],
            &[],
            4,
        );
        let dir = run(data, &KEY).unwrap();
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.get("A"), Some(&Entry::new("A", 13, 2)));
        assert_eq!(
            dir.warnings(),
            &[ParseWarning::DuplicateName {
                name: "A".to_string()
            }]
        );
    }

    #[test]
    fn test_wrong_key_does_not_panic() {
        let data = container(&[EncryptedTableEntry::new("A", 12, 1)], &[], 4);
        let wrong = TableKey {
            stream: KeystreamParams::new(1, 2, 3),
            ..KEY
        };
        // Garbage records are dropped as out of bounds, not trusted
        let dir = run(data, &wrong).unwrap();
        assert!(dir.iter().all(|e| e.fits_within(dir.container_len())));
    }
}
