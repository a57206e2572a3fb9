//! Fixed XOR masks for individual header fields.
//!
//! Unlike the keystream this does not roll: every masked field is XORed with
//! the same constant.

/// XOR constant applied to a single 32-bit header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldMask(pub u32);

impl FieldMask {
    /// Unmask a raw field value. Masking and unmasking are the same operation.
    pub const fn apply(self, raw: u32) -> u32 {
        raw ^ self.0
    }
}

/// Decode a little-endian field and remove its mask.
pub const fn read_masked_u32_le(bytes: [u8; 4], mask: FieldMask) -> u32 {
    mask.apply(u32::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_is_involution() {
        let mask = FieldMask(0xA5A5_5A5A);
        assert_eq!(mask.apply(mask.apply(0x0000_1000)), 0x0000_1000);
    }

    #[test]
    fn test_read_masked_le() {
        let mask = FieldMask(0xFFFF_0000);
        let raw = (0xFFFF_0040u32).to_le_bytes();
        assert_eq!(read_masked_u32_le(raw, mask), 0x40);
    }

    #[test]
    fn test_zero_mask_is_identity() {
        assert_eq!(FieldMask::default().apply(1234), 1234);
    }
}
