//! Byte transforms used by packed game archives
//!
//! Packed archives hide their directory tables behind two unrelated
//! transforms. Neither is cryptographically secure; they exist to keep the
//! table bytes from being readable in a hex editor.
//!
//! # Components
//!
//! - **Keystream**: a rolling 32-bit key register whose low byte is added to
//!   each table byte ([`KeystreamCipher`])
//! - **Field masks**: a fixed XOR constant applied to individual 32-bit header
//!   fields such as the table offset and size ([`FieldMask`])
//!
//! # Examples
//!
//! ```
//! use pakfile_crypto::{KeystreamCipher, KeystreamParams};
//!
//! let params = KeystreamParams::new(0x1234_5678, 0x0F0F_0F0F, 0x0101_0101);
//!
//! let mut data = b"table bytes".to_vec();
//! KeystreamCipher::new(params).encrypt(&mut data);
//! KeystreamCipher::new(params).decrypt(&mut data);
//! assert_eq!(&data, b"table bytes");
//! ```

#![warn(missing_docs)]

pub mod keystream;
pub mod mask;

pub use keystream::{KeystreamCipher, KeystreamParams, decrypt_in_place, encrypt_in_place};
pub use mask::{FieldMask, read_masked_u32_le};
