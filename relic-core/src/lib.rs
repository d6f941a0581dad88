//! # Relic Core
//!
//! Core components shared by the Relic legacy codecs.
//!
//! - [`cursor`]: Sequential reader over a fully-buffered byte source
//! - [`bits`]: MSB-first bit I/O with interleaved raw bytes
//! - [`window`]: History window with overlap-safe back-reference copies
//! - [`traits`]: The resumable [`Decompressor`] abstraction
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Facade (relic)                                          │
//! │     CodecKind dispatch, skip/take reads, batch decode   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Codecs                                                  │
//! │     LZSS, Huffman, Gamma-LZ, keyed ciphers              │
//! ├─────────────────────────────────────────────────────────┤
//! │ Core (this crate)                                       │
//! │     ByteCursor, MsbBitReader, HistoryWindow, errors     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use relic_core::window::HistoryWindow;
//!
//! let mut window = HistoryWindow::new(4096);
//! window.push(b'A');
//! let run: Vec<u8> = window.copy_back(1, 4).unwrap().collect();
//! assert_eq!(run, b"AAAA");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bits;
pub mod cursor;
pub mod error;
#[cfg(feature = "mmap")]
pub mod mmap;
pub mod traits;
pub mod window;

// Re-exports for convenience
pub use bits::{MsbBitReader, MsbBitWriter};
pub use cursor::ByteCursor;
pub use error::{CodecError, Result};
#[cfg(feature = "mmap")]
pub use mmap::MappedSource;
pub use traits::{DecodeLimits, DecompressStatus, Decompressor, StoredDecoder};
pub use window::{CopyBack, HistoryWindow};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cursor::ByteCursor;
    pub use crate::error::{CodecError, Result};
    pub use crate::traits::{DecodeLimits, DecompressStatus, Decompressor};
    pub use crate::window::HistoryWindow;
}
