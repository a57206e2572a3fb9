//! Bounded read-only view of one member
//!
//! A [`MemberStream`] exposes local coordinates `[0, len)`. For raw members
//! these map onto `[offset, offset + len)` of a container file handle owned
//! by the stream; for compressed members they index a decompressed buffer.
//! Reads never cross `len`, so adjacent container bytes are unreachable.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

enum Backing {
    Window { file: File, start: u64 },
    Memory(Vec<u8>),
}

/// Read-only stream over a single member's bytes
pub struct MemberStream {
    backing: Backing,
    len: u64,
    pos: u64,
    /// File cursor no longer matches `start + pos`
    needs_seek: bool,
}

impl MemberStream {
    /// Stream over `[start, start + len)` of `file`.
    pub(crate) fn window(file: File, start: u64, len: u64) -> Self {
        Self {
            backing: Backing::Window { file, start },
            len,
            pos: 0,
            needs_seek: true,
        }
    }

    /// Stream over an owned buffer.
    pub(crate) fn memory(data: Vec<u8>) -> Self {
        Self {
            len: data.len() as u64,
            backing: Backing::Memory(data),
            pos: 0,
            needs_seek: false,
        }
    }

    /// Length of the member in bytes
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Whether the member is zero bytes long
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current position in local coordinates
    pub const fn position(&self) -> u64 {
        self.pos
    }

    /// Whether the position is at or past the end of the member
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.len
    }

    /// Whether the bytes come from a decompressed buffer
    pub const fn is_decompressed(&self) -> bool {
        matches!(self.backing, Backing::Memory(_))
    }

    fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }
}

impl Read for MemberStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let want = usize::try_from(self.remaining()).map_or(buf.len(), |r| r.min(buf.len()));
        if want == 0 {
            return Ok(0);
        }

        let read = match &mut self.backing {
            Backing::Window { file, start } => {
                if self.needs_seek {
                    file.seek(SeekFrom::Start(*start + self.pos))?;
                    self.needs_seek = false;
                }
                let read = file.read(&mut buf[..want])?;
                if read == 0 {
                    // Container shrank underneath us
                    self.needs_seek = true;
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!(
                            "container ended {} bytes before member end",
                            self.remaining()
                        ),
                    ));
                }
                read
            }
            Backing::Memory(data) => {
                // pos < len == data.len() here, so the cast cannot truncate
                let from = self.pos as usize;
                buf[..want].copy_from_slice(&data[from..from + want]);
                want
            }
        };

        self.pos += read as u64;
        Ok(read)
    }
}

impl Seek for MemberStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.len.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
        };

        let Some(target) = target else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            ));
        };

        if target != self.pos {
            self.pos = target;
            self.needs_seek = true;
        }
        Ok(self.pos)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.pos)
    }
}

impl std::fmt::Debug for MemberStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backing = match &self.backing {
            Backing::Window { start, .. } => format!("window@{start}"),
            Backing::Memory(_) => "memory".to_string(),
        };
        f.debug_struct("MemberStream")
            .field("backing", &backing)
            .field("len", &self.len)
            .field("pos", &self.pos)
            .finish()
    }
}
