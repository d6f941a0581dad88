//! # Relic LZSS
//!
//! The flag-byte LZSS codec used by many legacy game archives: a 4 KB
//! history frame, 18-byte lookahead, and matches of 3 to 18 bytes.
//!
//! - [`LzssDecoder`]: resumable decoder implementing
//!   [`Decompressor`](relic_core::Decompressor)
//! - [`LzssEncoder`]: greedy encoder backed by a binary-tree match finder
//! - [`LzssConfig`]: frame geometry (`STANDARD`, `SPACE_FILLED`)
//!
//! ## Example
//!
//! ```rust
//! use relic_lzss::{LzssConfig, decode_lzss, encode_lzss};
//!
//! let data = b"AAAAAAAAAA";
//! let packed = encode_lzss(data, LzssConfig::STANDARD).unwrap();
//! let unpacked = decode_lzss(&packed, LzssConfig::STANDARD, Some(10)).unwrap();
//! assert_eq!(unpacked, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod decode;
pub mod encode;
pub mod tree;

// Re-exports
pub use config::LzssConfig;
pub use decode::{DecoderPhase, LzssDecoder, decode_lzss};
pub use encode::{LzssEncoder, encode_lzss};
pub use tree::{MatchCandidate, MatchTree};
