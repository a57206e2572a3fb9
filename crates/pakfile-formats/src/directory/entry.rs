//! Directory entry

/// One member record: a name and the window of the container holding its
/// raw, possibly compressed, payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Member name, matched exactly and case-sensitively
    pub name: String,
    /// Absolute byte offset in the container
    pub offset: u64,
    /// Byte length of the raw payload
    pub size: u64,
}

impl Entry {
    /// Create a new entry
    pub fn new(name: impl Into<String>, offset: u64, size: u64) -> Self {
        Self {
            name: name.into(),
            offset,
            size,
        }
    }

    /// End of the payload window, or `None` if it overflows `u64`
    pub const fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.size)
    }

    /// Whether the payload window fits inside a container of `container_len` bytes
    pub fn fits_within(&self, container_len: u64) -> bool {
        self.end().is_some_and(|end| end <= container_len)
    }
}

/// Decode a fixed-width name field: bytes up to the first NUL, lossily as UTF-8.
pub(crate) fn decode_name(field: &[u8]) -> String {
    let len = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..len]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_within() {
        let entry = Entry::new("A", 100, 10);
        assert!(entry.fits_within(110));
        assert!(!entry.fits_within(109));
    }

    #[test]
    fn test_overflowing_window_never_fits() {
        let entry = Entry::new("A", u64::MAX, 1);
        assert_eq!(entry.end(), None);
        assert!(!entry.fits_within(u64::MAX));
    }

    #[test]
    fn test_decode_name_stops_at_nul() {
        assert_eq!(decode_name(b"ITEM1\0garbage"), "ITEM1");
        assert_eq!(decode_name(b"FULLWIDTH"), "FULLWIDTH");
        assert_eq!(decode_name(b"\0ITEM1"), "");
    }
}
