//! Archive handle
//!
//! The handle owns the container path, never a live file handle. Every
//! member read re-opens the container so concurrent reads cannot disturb
//! each other's seek position and no exclusive lock is held between calls.

use crate::config::ArchiveConfig;
use crate::stream::MemberStream;
use crate::{ArchiveError, Result};
use pakfile_formats::compression::{
    COMPRESSION_HEADER_SIZE, CompressionError, CompressionHeader, Decompressor, Lzss,
    decompress_payload,
};
use pakfile_formats::{Directory, Entry, FormatVariant, ParseWarning, parse_directory};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Read-only handle to one packed archive
#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
    variant: FormatVariant,
    config: ArchiveConfig,
    directory: Directory,
}

impl Archive {
    /// Open an archive with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the container cannot be read, including a failed read
    /// of the table's leading fields, `MalformedHeader` if a mandatory header
    /// field is inconsistent, and `EmptyDirectory` if the table parsed but
    /// produced no members.
    pub fn open(path: impl AsRef<Path>, variant: FormatVariant) -> Result<Self> {
        Self::open_with_config(path, variant, ArchiveConfig::default())
    }

    /// Open an archive with explicit configuration.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        variant: FormatVariant,
        config: ArchiveConfig,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let directory = read_directory(&path, &variant, &config)?;

        for warning in directory.warnings() {
            warn!("{}: {}", path.display(), warning);
        }

        if directory.is_empty() && !config.accept_empty {
            return Err(ArchiveError::EmptyDirectory { path });
        }

        info!(
            "Opened {} archive {} with {} members",
            directory.kind(),
            path.display(),
            directory.len()
        );

        Ok(Self {
            path,
            variant,
            config,
            directory,
        })
    }

    /// Try each candidate layout in order and keep the first that yields
    /// members.
    ///
    /// An I/O failure stops the search at once. Otherwise the error from the
    /// last candidate is returned when none match.
    ///
    /// Prefer [`open`](Self::open) with a known layout: a corrupt file can
    /// parse "successfully" under the wrong layout.
    pub fn detect(
        path: impl AsRef<Path>,
        candidates: &[FormatVariant],
        config: ArchiveConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        let strict = config.clone().with_accept_empty(false);
        let mut last_error = None;

        for variant in candidates {
            match Self::open_with_config(path, variant.clone(), strict.clone()) {
                Ok(mut archive) => {
                    archive.config = config;
                    return Ok(archive);
                }
                Err(e @ ArchiveError::Io(_)) => return Err(e),
                Err(e) => {
                    debug!(
                        "{} did not parse as {}: {}",
                        path.display(),
                        variant.kind(),
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ArchiveError::UnknownFormat {
            path: path.to_path_buf(),
        }))
    }

    /// Container path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Layout the directory was parsed with
    pub const fn variant(&self) -> &FormatVariant {
        &self.variant
    }

    /// Configuration the archive was opened with
    pub const fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Parsed directory
    pub const fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Soft conditions found while parsing the table
    pub fn warnings(&self) -> &[ParseWarning] {
        self.directory.warnings()
    }

    /// Whether a member with this exact, case-sensitive name exists
    pub fn contains(&self, name: &str) -> bool {
        self.directory.contains(name)
    }

    /// Member names in table order
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.directory.names()
    }

    /// Directory entry for a member
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.directory.get(name)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    /// Whether the archive has no members
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Open a member with the built-in LZSS codec.
    ///
    /// # Errors
    ///
    /// `NotFound` without touching the file when the name is absent,
    /// `TruncatedRead` when the container is shorter than the entry, and
    /// `DecompressionFailure` when a payload carries the compression magic
    /// but cannot be expanded, including a payload cut inside its header.
    pub fn open_member(&self, name: &str) -> Result<MemberStream> {
        self.open_member_with(name, &Lzss)
    }

    /// Open a member, expanding compressed payloads with `codec`.
    pub fn open_member_with(&self, name: &str, codec: &dyn Decompressor) -> Result<MemberStream> {
        let entry = self
            .directory
            .get(name)
            .ok_or_else(|| ArchiveError::NotFound(name.to_string()))?;

        let mut file = File::open(&self.path)?;
        let available = file
            .metadata()?
            .len()
            .saturating_sub(entry.offset)
            .min(entry.size);
        if available < entry.size {
            return Err(truncated(entry, available));
        }

        file.seek(SeekFrom::Start(entry.offset))?;
        let head_len = entry.size.min(COMPRESSION_HEADER_SIZE as u64) as usize;
        let mut head = [0u8; COMPRESSION_HEADER_SIZE];
        read_exact_or_truncated(&mut file, &mut head[..head_len], entry, 0)?;

        let magic = self.config.compression_magic;
        let header = match CompressionHeader::detect(&head[..head_len], magic) {
            Ok(Some(header)) => header,
            Ok(None) => {
                debug!("Opening {} as raw window of {} bytes", name, entry.size);
                return Ok(MemberStream::window(file, entry.offset, entry.size));
            }
            Err(source) => return Err(decompression_failure(name, source)),
        };

        let size = usize::try_from(entry.size).map_err(|_| {
            decompression_failure(name, CompressionError::PayloadTooLarge { size: entry.size })
        })?;
        let mut payload = vec![0u8; size];
        payload[..head_len].copy_from_slice(&head[..head_len]);
        read_exact_or_truncated(&mut file, &mut payload[head_len..], entry, head_len)?;
        drop(file);

        let data = decompress_payload(&header, &payload, codec)
            .map_err(|source| decompression_failure(name, source))?;

        debug!(
            "Decompressed {} from {} to {} bytes",
            name,
            entry.size,
            data.len()
        );
        Ok(MemberStream::memory(data))
    }

    /// Read a whole member into memory.
    pub fn read_member(&self, name: &str) -> Result<Vec<u8>> {
        let mut stream = self.open_member(name)?;
        let mut data = Vec::with_capacity(usize::try_from(stream.len()).unwrap_or(0));
        stream.read_to_end(&mut data)?;
        Ok(data)
    }
}

fn read_directory(
    path: &Path,
    variant: &FormatVariant,
    config: &ArchiveConfig,
) -> Result<Directory> {
    let file = File::open(path)?;
    let container_len = file.metadata()?.len();
    debug!(
        "Parsing {} table of {} ({} bytes)",
        variant.kind(),
        path.display(),
        container_len
    );

    let mut reader = BufReader::new(file);
    let options = config.parse_options();
    Ok(parse_directory(&mut reader, container_len, variant, &options)?)
}

fn decompression_failure(name: &str, source: CompressionError) -> ArchiveError {
    ArchiveError::DecompressionFailure {
        name: name.to_string(),
        source,
    }
}

fn truncated(entry: &Entry, actual: u64) -> ArchiveError {
    ArchiveError::TruncatedRead {
        name: entry.name.clone(),
        expected: entry.size,
        actual,
    }
}

/// `already` bytes of the payload were read before this call
fn read_exact_or_truncated(
    file: &mut File,
    buf: &mut [u8],
    entry: &Entry,
    already: usize,
) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => return Err(truncated(entry, (already + filled) as u64)),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Archive>();
        assert_send_sync::<MemberStream>();
    }
}
