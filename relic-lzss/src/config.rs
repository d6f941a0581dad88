//! LZSS frame geometry for the flag-byte formats.

use relic_core::error::{CodecError, Result};

/// Largest frame addressable by the 12-bit position field.
pub const MAX_FRAME_SIZE: usize = 4096;

/// Width of the length field in a match token.
const LENGTH_BITS: u32 = 4;

/// LZSS configuration parameters.
///
/// Match tokens store an absolute frame position (12 bits) and a length
/// (4 bits, biased by `threshold + 1`). The frame starts out filled with
/// `frame_fill` and the first decoded byte is written at `init_pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzssConfig {
    /// Size of the history frame (power of two, at most 4096).
    pub frame_size: usize,
    /// Byte the frame is pre-filled with.
    pub frame_fill: u8,
    /// Frame position of the first produced byte.
    pub init_pos: usize,
    /// Longest match that is still emitted as literals.
    pub threshold: usize,
}

impl LzssConfig {
    /// The common variant: zero-filled 4 KB frame, writing from 0xFEE.
    pub const STANDARD: Self = Self {
        frame_size: 4096,
        frame_fill: 0x00,
        init_pos: 0xFEE,
        threshold: 2,
    };

    /// Variant whose frame is pre-filled with spaces (0x20).
    pub const SPACE_FILLED: Self = Self {
        frame_size: 4096,
        frame_fill: 0x20,
        init_pos: 0xFEE,
        threshold: 2,
    };

    /// Create a configuration with a custom fill byte and the standard geometry.
    pub const fn with_fill(frame_fill: u8) -> Self {
        Self {
            frame_fill,
            ..Self::STANDARD
        }
    }

    /// Shortest match length carried by a match token.
    #[inline]
    pub const fn min_match(&self) -> usize {
        self.threshold + 1
    }

    /// Longest match length carried by a match token (18 for the standard geometry).
    #[inline]
    pub const fn max_match(&self) -> usize {
        self.min_match() + (1 << LENGTH_BITS) - 1
    }

    /// Mask for wrapping frame positions.
    #[inline]
    pub const fn frame_mask(&self) -> usize {
        self.frame_size - 1
    }

    /// Check that the geometry can be expressed by the token format.
    pub fn validate(&self) -> Result<()> {
        if !self.frame_size.is_power_of_two() || self.frame_size > MAX_FRAME_SIZE {
            return Err(CodecError::unsupported(format!(
                "LZSS frame size {}",
                self.frame_size
            )));
        }
        if self.frame_size < 2 * self.max_match() {
            return Err(CodecError::unsupported(format!(
                "LZSS frame size {} with threshold {}",
                self.frame_size, self.threshold
            )));
        }
        Ok(())
    }
}

impl Default for LzssConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}
