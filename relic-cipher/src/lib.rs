//! # Relic Cipher
//!
//! Keyed byte transforms that hide index tables, names and entry data in
//! legacy game archives. They run once over a fully buffered record,
//! before any decompression, and never fail: a wrong key only produces
//! garbage for the next parsing stage to reject.
//!
//! ## Example
//!
//! ```rust
//! use relic_cipher::{KeyGenerator, KeyedCipher, RGSS_V1_SEED};
//!
//! let mut record = *b"Data";
//! let cipher = KeyedCipher::RgssName { key: RGSS_V1_SEED };
//! cipher.encrypt(&mut record);
//! cipher.apply(&mut record);
//! assert_eq!(&record, b"Data");
//!
//! let mut keys = KeyGenerator::new(RGSS_V1_SEED);
//! assert_eq!(keys.next_key(), 0xDEADCAFE);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod cipher;
pub mod keygen;
pub mod names;

// Re-exports
pub use cipher::{KeyedCipher, TlpVariant};
pub use keygen::{KeyGenerator, RGSS_V1_SEED, rgss_v3_key};
pub use names::{decode_cp932_name, encode_cp932_name};
