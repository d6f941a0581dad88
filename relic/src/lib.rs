//! # Relic
//!
//! Pure Rust codecs for the compression and obfuscation layers of legacy
//! game archives.
//!
//! ## Supported Codecs
//!
//! | Codec     | Decode | Encode | Notes                                   |
//! |-----------|--------|--------|-----------------------------------------|
//! | LZSS      | ✓      | ✓      | Flag-byte format, 4 KB frame            |
//! | Huffman   | ✓      |        | Embedded tree or container table        |
//! | Gamma-LZ  | ✓      |        | aPLib-style, 1 MB history               |
//! | Stored    | ✓      |        | Pass-through                            |
//!
//! Keyed ciphers ([`KeyedCipher`]) strip index and name obfuscation before
//! any of the above run.
//!
//! ## Example
//!
//! ```rust
//! use relic::{CodecKind, CompressionKind, LzssConfig, compress, decompress, decompress_skip};
//!
//! let data = b"hello hello hello hello";
//! let packed = compress(CompressionKind::Lzss(LzssConfig::STANDARD), data).unwrap();
//!
//! let kind = CodecKind::Lzss(LzssConfig::STANDARD);
//! assert_eq!(decompress(&kind, &packed, None).unwrap(), data);
//! assert_eq!(decompress_skip(&kind, &packed, 6, 5).unwrap(), b"hello");
//! ```
//!
//! ## Errors
//!
//! Every failure is a [`CodecError`] for the one entry being decoded;
//! callers reading a container skip that entry and keep going.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "parallel")]
pub mod batch;
pub mod codec;
pub mod decoder;
pub mod kind;

// Re-exports
#[cfg(feature = "parallel")]
pub use batch::{DecodeJob, decompress_batch};
pub use codec::{apply_cipher, compress, decompress, decompress_skip, decompress_with_limits};
pub use decoder::{AnyDecoder, open_decoder};
pub use kind::{CodecKind, CompressionKind};

pub use relic_aplib::{GammaLzConfig, GammaLzDecoder};
pub use relic_cipher::{KeyGenerator, KeyedCipher, TlpVariant, decode_cp932_name};
#[cfg(feature = "mmap")]
pub use relic_core::MappedSource;
pub use relic_core::{
    ByteCursor, CodecError, DecodeLimits, DecompressStatus, Decompressor, HistoryWindow, Result,
};
pub use relic_huffman::{HuffmanDecoder, HuffmanTable};
pub use relic_lzss::{LzssConfig, LzssDecoder, LzssEncoder};
