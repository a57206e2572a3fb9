//! Rolling-key additive keystream used to obfuscate directory tables.
//!
//! For every byte the low eight bits of a 32-bit key register are added to
//! the data byte, after which the register is advanced:
//!
//! ```text
//! key ^= xor
//! key += add        (wrapping)
//! key  = rotr(key, 1)
//! ```
//!
//! The transform must stay bit-exact. A single wrong step desynchronizes
//! every byte that follows it.
//!
//! ## Usage
//!
//! ```rust
//! use pakfile_crypto::keystream::{KeystreamCipher, KeystreamParams};
//!
//! let params = KeystreamParams::new(0xDEAD_BEEF, 0x5A5A_5A5A, 0x0000_0001);
//! let original = b"Hello, archive!".to_vec();
//!
//! let mut data = original.clone();
//! KeystreamCipher::new(params).decrypt(&mut data);
//! KeystreamCipher::new(params).encrypt(&mut data);
//! assert_eq!(original, data);
//! ```

/// Parameters of the keystream: initial register value and the two
/// per-step constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeystreamParams {
    /// Initial value of the key register
    pub seed: u32,
    /// Constant XORed into the register after each byte
    pub xor: u32,
    /// Constant added to the register after the XOR step
    pub add: u32,
}

impl KeystreamParams {
    /// Create keystream parameters.
    pub const fn new(seed: u32, xor: u32, add: u32) -> Self {
        Self { seed, xor, add }
    }
}

/// Keystream state for one pass over a buffer.
///
/// The key register lives inside the cipher value. Build a fresh cipher for
/// every independent buffer; reusing one continues the stream where the last
/// call stopped.
#[derive(Debug, Clone)]
pub struct KeystreamCipher {
    key: u32,
    xor: u32,
    add: u32,
}

impl KeystreamCipher {
    /// Create a cipher positioned at the start of the stream.
    pub const fn new(params: KeystreamParams) -> Self {
        Self {
            key: params.seed,
            xor: params.xor,
            add: params.add,
        }
    }

    /// Current value of the key register.
    pub const fn key(&self) -> u32 {
        self.key
    }

    /// Produce the next keystream byte and advance the register.
    #[inline]
    fn next_keystream_byte(&mut self) -> u8 {
        let byte = (self.key & 0xFF) as u8;
        self.key ^= self.xor;
        self.key = self.key.wrapping_add(self.add);
        self.key = self.key.rotate_right(1);
        byte
    }

    /// Reverse the obfuscation in place by adding the keystream.
    pub fn decrypt(&mut self, data: &mut [u8]) {
        for byte in data {
            *byte = byte.wrapping_add(self.next_keystream_byte());
        }
    }

    /// Apply the obfuscation in place by subtracting the keystream.
    ///
    /// Inverse of [`decrypt`](Self::decrypt) for a cipher built from the same
    /// parameters.
    pub fn encrypt(&mut self, data: &mut [u8]) {
        for byte in data {
            *byte = byte.wrapping_sub(self.next_keystream_byte());
        }
    }
}

/// Decrypt a whole buffer with a fresh cipher.
pub fn decrypt_in_place(params: KeystreamParams, data: &mut [u8]) {
    KeystreamCipher::new(params).decrypt(data);
}

/// Encrypt a whole buffer with a fresh cipher.
pub fn encrypt_in_place(params: KeystreamParams, data: &mut [u8]) {
    KeystreamCipher::new(params).encrypt(data);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PARAMS: KeystreamParams = KeystreamParams::new(0x1234_5678, 0x9ABC_DEF0, 0x1111_1111);

    #[test]
    fn test_register_schedule() {
        let mut cipher = KeystreamCipher::new(PARAMS);
        assert_eq!(cipher.next_keystream_byte(), 0x78);

        let expected = ((0x1234_5678u32 ^ 0x9ABC_DEF0).wrapping_add(0x1111_1111)).rotate_right(1);
        assert_eq!(cipher.key(), expected);
    }

    #[test]
    fn test_rotation_moves_low_bit_to_high_bit() {
        // xor and add are zero so only the rotation changes the register
        let mut cipher = KeystreamCipher::new(KeystreamParams::new(0x0000_0001, 0, 0));
        cipher.next_keystream_byte();
        assert_eq!(cipher.key(), 0x8000_0000);
        cipher.next_keystream_byte();
        assert_eq!(cipher.key(), 0x4000_0000);
    }

    #[test]
    fn test_decrypt_adds_key_byte() {
        let mut data = [0x00, 0xFF];
        let mut cipher = KeystreamCipher::new(KeystreamParams::new(0x0000_0010, 0, 0));
        cipher.decrypt(&mut data);

        // 0x10 then rotr(0x10, 1) = 0x08
        assert_eq!(data, [0x10, 0x07]);
    }

    #[test]
    fn test_empty_buffer() {
        let mut data: [u8; 0] = [];
        let mut cipher = KeystreamCipher::new(PARAMS);
        cipher.decrypt(&mut data);
        assert_eq!(cipher.key(), PARAMS.seed);
    }

    #[test]
    fn test_split_calls_continue_stream() {
        let original: Vec<u8> = (0..=255).collect();

        let mut whole = original.clone();
        decrypt_in_place(PARAMS, &mut whole);

        let mut split = original;
        let mut cipher = KeystreamCipher::new(PARAMS);
        let (head, tail) = split.split_at_mut(100);
        cipher.decrypt(head);
        cipher.decrypt(tail);

        assert_eq!(whole, split);
    }

    #[test]
    fn test_transform_is_not_self_inverse() {
        let original = b"directory".to_vec();
        let mut data = original.clone();
        decrypt_in_place(PARAMS, &mut data);
        decrypt_in_place(PARAMS, &mut data);
        assert_ne!(original, data);
    }

    proptest! {
        #[test]
        fn encrypt_then_decrypt_round_trips(
            data in prop::collection::vec(any::<u8>(), 0..4096),
            seed in any::<u32>(),
            xor in any::<u32>(),
            add in any::<u32>(),
        ) {
            let params = KeystreamParams::new(seed, xor, add);
            let mut buf = data.clone();
            decrypt_in_place(params, &mut buf);
            encrypt_in_place(params, &mut buf);
            prop_assert_eq!(&buf, &data);

            encrypt_in_place(params, &mut buf);
            decrypt_in_place(params, &mut buf);
            prop_assert_eq!(buf, data);
        }
    }
}
