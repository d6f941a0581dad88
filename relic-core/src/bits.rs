//! MSB-first bit stream operations.
//!
//! The Huffman and gamma-LZ codecs consume their control streams most
//! significant bit first, one bit at a time from an 8-bit accumulator that
//! is refilled from the byte source whenever it runs dry. Raw bytes may be
//! interleaved with the bits: [`MsbBitReader::read_byte`] pulls the next
//! source byte without touching the accumulator.

use crate::cursor::ByteCursor;
use crate::error::{CodecError, Result};

/// MSB-first bit reader over a [`ByteCursor`].
#[derive(Debug, Clone)]
pub struct MsbBitReader<'a> {
    /// Byte source shared by bits and raw bytes.
    cursor: ByteCursor<'a>,
    /// Current tag byte, next bit in the MSB.
    tag: u8,
    /// Bits left in `tag`.
    bits_left: u8,
    /// Total bits read (for error reporting).
    total_bits_read: u64,
}

impl<'a> MsbBitReader<'a> {
    /// Create a new MSB bit reader over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::from_cursor(ByteCursor::new(data))
    }

    /// Create a reader continuing from an existing cursor.
    pub fn from_cursor(cursor: ByteCursor<'a>) -> Self {
        Self {
            cursor,
            tag: 0,
            bits_left: 0,
            total_bits_read: 0,
        }
    }

    /// Read a single bit, or `None` at end of input.
    #[inline]
    pub fn next_bit(&mut self) -> Option<bool> {
        if self.bits_left == 0 {
            self.tag = self.cursor.next_byte()?;
            self.bits_left = 8;
        }
        let bit = self.tag & 0x80 != 0;
        self.tag <<= 1;
        self.bits_left -= 1;
        self.total_bits_read += 1;
        Some(bit)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        self.next_bit().ok_or_else(|| self.eof())
    }

    /// Read up to 32 bits, first bit read ends up most significant.
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Ok(value)
    }

    /// Read a raw byte from the source, bypassing the bit accumulator.
    #[inline]
    pub fn read_byte(&mut self) -> Result<u8> {
        self.cursor.next_byte().ok_or_else(|| self.eof())
    }

    /// Total number of bits consumed through [`read_bit`](Self::read_bit).
    pub fn bit_position(&self) -> u64 {
        self.total_bits_read
    }

    /// Byte offset of the underlying cursor.
    pub fn byte_position(&self) -> usize {
        self.cursor.position()
    }

    /// Check if neither buffered bits nor source bytes remain.
    pub fn is_exhausted(&self) -> bool {
        self.bits_left == 0 && self.cursor.is_exhausted()
    }

    fn eof(&self) -> CodecError {
        CodecError::truncated(self.cursor.position() as u64, 0)
    }
}

/// MSB-first bit writer, the mirror of [`MsbBitReader`].
///
/// Bits are packed into whole bytes; [`push_byte`](Self::push_byte) emits a
/// raw byte at the current output position while a partially filled tag
/// byte stays reserved in front of it, which is how interleaved
/// bit/byte streams are laid out.
#[derive(Debug, Default)]
pub struct MsbBitWriter {
    /// Output buffer.
    output: Vec<u8>,
    /// Index of the tag byte currently being filled.
    tag_index: Option<usize>,
    /// Bits already written into the current tag byte.
    bits_used: u8,
}

impl MsbBitWriter {
    /// Create a new MSB bit writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        let index = match self.tag_index {
            Some(index) if self.bits_used < 8 => index,
            _ => {
                self.output.push(0);
                self.bits_used = 0;
                let index = self.output.len() - 1;
                self.tag_index = Some(index);
                index
            }
        };
        if bit {
            self.output[index] |= 0x80 >> self.bits_used;
        }
        self.bits_used += 1;
    }

    /// Write the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32, "Cannot write more than 32 bits at once");
        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 != 0);
        }
    }

    /// Append a raw byte.
    pub fn push_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }

    /// Finish the stream, returning the packed bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.output
    }
}
