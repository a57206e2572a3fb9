//! Directory table error and warning types

use std::fmt;
use thiserror::Error;

/// Result type for directory parsing
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Fatal directory parsing errors
///
/// Anything that still leaves a usable (possibly empty) directory is reported
/// as a [`ParseWarning`] instead.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Container could not be read or seeked
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A mandatory header field is missing or inconsistent
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl DirectoryError {
    /// Map a header read failure, treating a short read as a malformed header.
    pub(crate) fn from_header_read(err: binrw::Error, what: &str) -> Self {
        if err.is_eof() {
            Self::MalformedHeader(format!("{what} header is truncated"))
        } else {
            match err {
                binrw::Error::Io(io) => Self::Io(io),
                other => Self::BinRw(other),
            }
        }
    }
}

/// Non-fatal conditions found while scanning a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// The table ended before a terminator or declared size was reached
    TruncatedTable {
        /// Entries accepted before the table ran out
        parsed: usize,
    },
    /// Record table guard word exceeded the sanity threshold
    GuardOutOfRange {
        /// Guard value found in the container
        guard: u32,
    },
    /// Scanning stopped at the entry cap
    EntryCapReached {
        /// Configured cap
        cap: usize,
    },
    /// Entry window lies outside the container and was skipped
    EntryOutOfBounds {
        /// Member name
        name: String,
        /// Declared offset
        offset: u64,
        /// Declared size
        size: u64,
    },
    /// A later record replaced an earlier one with the same name
    DuplicateName {
        /// Member name
        name: String,
    },
    /// A non-EOF read error ended the scan
    ReadFailed {
        /// Error text
        reason: String,
    },
    /// Tail-pointer archives carry a secondary table this reader does not walk
    SecondaryTableUnsupported {
        /// Tail pointer from the header
        tail_pointer: u32,
    },
}

impl ParseWarning {
    /// Whether this warning means the table itself is unusable or incomplete,
    /// as opposed to a single record being dropped or replaced.
    pub const fn is_degrading(&self) -> bool {
        matches!(
            self,
            Self::TruncatedTable { .. }
                | Self::GuardOutOfRange { .. }
                | Self::EntryCapReached { .. }
                | Self::ReadFailed { .. }
                | Self::SecondaryTableUnsupported { .. }
        )
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedTable { parsed } => {
                write!(f, "table truncated after {parsed} entries")
            }
            Self::GuardOutOfRange { guard } => {
                write!(f, "record table guard {guard} out of range, table ignored")
            }
            Self::EntryCapReached { cap } => write!(f, "entry cap of {cap} reached"),
            Self::EntryOutOfBounds { name, offset, size } => write!(
                f,
                "entry {name:?} at {offset}+{size} lies outside the container"
            ),
            Self::DuplicateName { name } => {
                write!(f, "duplicate entry {name:?} replaced an earlier record")
            }
            Self::ReadFailed { reason } => write!(f, "table read failed: {reason}"),
            Self::SecondaryTableUnsupported { tail_pointer } => write!(
                f,
                "secondary table at 0x{tail_pointer:08X} is not supported"
            ),
        }
    }
}
