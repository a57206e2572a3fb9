//! Fixed-stride record table (variant B)
//!
//! ```text
//! preamble   [u8; preamble]
//! guard      u32 LE      > 500 means no usable table
//! reserved   [u8; 4]
//! records    52 bytes each, until an empty name:
//!   0x00  name    [u8; 20]   NUL/space padded
//!   0x14  -       [u8; 12]
//!   0x20  size    u32 LE
//!   0x24  -       [u8; 4]
//!   0x28  offset  u32 LE     absolute
//!   0x2C  -       [u8; 8]
//! ```

use binrw::io::{Cursor, Read, Seek, SeekFrom};
use binrw::{BinRead, BinWrite};
use std::io::ErrorKind;

use super::entry::{Entry, decode_name};
use super::error::{DirectoryResult, ParseWarning};
use super::{Directory, FormatKind, ParseOptions};

/// Bytes per record
pub const RECORD_SIZE: usize = 52;

/// Largest guard value accepted as a valid table
pub const RECORD_TABLE_GUARD_LIMIT: u32 = 500;

const NAME_SIZE: usize = 20;

/// One record of a record table
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct RecordTableEntry {
    /// Padded name field
    pub name: [u8; NAME_SIZE],
    /// Payload size
    #[brw(pad_before = 12)]
    pub size: u32,
    /// Absolute payload offset
    #[brw(pad_before = 4, pad_after = 8)]
    pub offset: u32,
}

impl RecordTableEntry {
    /// Build a record with a zero-padded name field
    pub fn new(name: &str, offset: u32, size: u32) -> Self {
        let mut field = [0u8; NAME_SIZE];
        let len = name.len().min(NAME_SIZE);
        field[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self {
            name: field,
            size,
            offset,
        }
    }

    /// Name with padding and trailing whitespace removed
    pub fn trimmed_name(&self) -> String {
        trim_name(&self.name)
    }
}

fn trim_name(field: &[u8]) -> String {
    decode_name(field).trim_end().to_string()
}

enum Step {
    Record(RecordTableEntry),
    Terminator,
    Eof,
    Failed(String),
}

fn read_record<R: Read>(reader: &mut R) -> Step {
    let mut raw = [0u8; RECORD_SIZE];

    if let Err(e) = reader.read_exact(&mut raw[..NAME_SIZE]) {
        return io_step(&e);
    }
    if trim_name(&raw[..NAME_SIZE]).is_empty() {
        return Step::Terminator;
    }
    if let Err(e) = reader.read_exact(&mut raw[NAME_SIZE..]) {
        return io_step(&e);
    }

    match RecordTableEntry::read(&mut Cursor::new(&raw[..])) {
        Ok(record) => Step::Record(record),
        Err(e) => Step::Failed(e.to_string()),
    }
}

fn io_step(err: &std::io::Error) -> Step {
    if err.kind() == ErrorKind::UnexpectedEof {
        Step::Eof
    } else {
        Step::Failed(err.to_string())
    }
}

pub(super) fn parse<R: Read + Seek>(
    reader: &mut R,
    container_len: u64,
    preamble: u64,
    options: &ParseOptions,
) -> DirectoryResult<Directory> {
    let mut directory = Directory::new(FormatKind::RecordTable, container_len, options);

    reader.seek(SeekFrom::Start(preamble))?;
    let mut prefix = [0u8; 8];
    if let Err(e) = reader.read_exact(&mut prefix) {
        if e.kind() != ErrorKind::UnexpectedEof {
            return Err(e.into());
        }
        directory.warn(ParseWarning::TruncatedTable { parsed: 0 });
        return Ok(directory);
    }

    let guard = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
    if guard > RECORD_TABLE_GUARD_LIMIT {
        directory.warn(ParseWarning::GuardOutOfRange { guard });
        return Ok(directory);
    }

    loop {
        match read_record(reader) {
            Step::Record(_) if directory.is_full() => {
                directory.mark_cap_reached();
                break;
            }
            Step::Record(record) => {
                let name = record.trimmed_name();
                directory.insert(Entry::new(
                    name,
                    u64::from(record.offset),
                    u64::from(record.size),
                ));
            }
            Step::Terminator => break,
            Step::Eof => {
                let parsed = directory.len();
                directory.warn(ParseWarning::TruncatedTable { parsed });
                break;
            }
            Step::Failed(reason) => {
                directory.warn(ParseWarning::ReadFailed { reason });
                break;
            }
        }
    }

    Ok(directory)
}
