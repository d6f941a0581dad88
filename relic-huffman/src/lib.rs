//! # Relic Huffman
//!
//! Static Huffman decoding for legacy archive entries.
//!
//! The packed stream is read MSB first. Its code table is either a binary
//! tree embedded at the head of the stream or a canonical code built from
//! code lengths the container stores elsewhere. The decoded length is
//! always supplied by the container; the stream has no end marker.
//!
//! ## Example
//!
//! ```rust
//! use relic_huffman::decode_huffman;
//!
//! // Tree A=0, B=10, C=11 followed by the codes for "ABCA".
//! let packed = [0x90, 0x64, 0x22, 0x1A, 0xC0];
//! assert_eq!(decode_huffman(&packed, 4).unwrap(), b"ABCA");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod decode;
pub mod table;

// Re-exports
pub use decode::{HuffmanDecoder, decode_huffman};
pub use table::HuffmanTable;
