//! # Relic aPLib
//!
//! Decoder for the gamma-coded LZ format popularized by aPLib, as found in
//! legacy game archives. Control bits are read MSB first; lengths and
//! distance high parts are Elias-gamma coded; distances reuse the previous
//! one through a short escape.
//!
//! ## Example
//!
//! ```rust
//! use relic_aplib::{GammaLzConfig, decode_gamma_lz};
//!
//! // "abc", then 6 bytes from distance 3, then the end marker.
//! let packed = [0x61, 0x29, 0x62, 0x63, 0x03, 0x30, 0x00];
//! let output = decode_gamma_lz(&packed, GammaLzConfig::DEFAULT, None).unwrap();
//! assert_eq!(output, b"abcabcabc");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod decode;

// Re-exports
pub use config::GammaLzConfig;
pub use decode::{DecoderPhase, GammaLzDecoder, decode_gamma_lz};
