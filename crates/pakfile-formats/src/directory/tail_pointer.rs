//! Tail-pointer layout (variant A)
//!
//! ```text
//! 0x00  signature     [u8; 4]
//! 0x04  tail_pointer  u32 LE   offset of the secondary table
//! 0x08  data_start    u32 LE   start of the member data section
//! ```
//!
//! Only the header is understood. The secondary table at `tail_pointer` is
//! recorded as unsupported and the directory comes back empty.

use binrw::io::{Read, Seek, SeekFrom};
use binrw::{BinRead, BinWrite};

use super::error::{DirectoryError, DirectoryResult, ParseWarning};
use super::{Directory, FormatKind, ParseOptions};

/// Size of the fixed header in bytes
pub const TAIL_POINTER_HEADER_SIZE: u64 = 12;

/// Fixed header of a tail-pointer archive
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct TailPointerHeader {
    /// Signature bytes
    pub signature: [u8; 4],
    /// Offset of the secondary table
    pub tail_pointer: u32,
    /// Start of the data section
    pub data_start: u32,
}

impl TailPointerHeader {
    /// Check the header against the expected signature and container size
    pub fn validate(&self, expected: [u8; 4], container_len: u64) -> DirectoryResult<()> {
        if self.signature != expected {
            return Err(DirectoryError::MalformedHeader(format!(
                "signature mismatch: expected {expected:02X?}, got {:02X?}",
                self.signature
            )));
        }

        let data_start = u64::from(self.data_start);
        if data_start < TAIL_POINTER_HEADER_SIZE || data_start > container_len {
            return Err(DirectoryError::MalformedHeader(format!(
                "data start {data_start} outside {TAIL_POINTER_HEADER_SIZE}..={container_len}"
            )));
        }

        if u64::from(self.tail_pointer) > container_len {
            return Err(DirectoryError::MalformedHeader(format!(
                "tail pointer {} beyond container length {container_len}",
                self.tail_pointer
            )));
        }

        Ok(())
    }
}

pub(super) fn parse<R: Read + Seek>(
    reader: &mut R,
    container_len: u64,
    signature: [u8; 4],
    options: &ParseOptions,
) -> DirectoryResult<Directory> {
    reader.seek(SeekFrom::Start(0))?;
    let header = TailPointerHeader::read(reader)
        .map_err(|e| DirectoryError::from_header_read(e, "tail-pointer"))?;
    header.validate(signature, container_len)?;

    let mut directory = Directory::new(FormatKind::TailPointer, container_len, options);
    directory.set_data_base(u64::from(header.data_start));
    directory.warn(ParseWarning::SecondaryTableUnsupported {
        tail_pointer: header.tail_pointer,
    });
    Ok(directory)
}
