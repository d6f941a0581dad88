//! Sequential reader over a finite, fully-buffered byte source.
//!
//! Every codec reads its compressed input through a [`ByteCursor`]. The
//! source is either an in-memory buffer or a memory-mapped region, so
//! running out of bytes is always terminal: there is nothing to wait for.

use crate::error::{CodecError, Result};

/// A forward-only cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    /// Underlying data.
    data: &'a [u8],
    /// Next byte to read.
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current read offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the source.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the source is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Check if every byte has been consumed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Read the next byte, or `None` at end of input.
    #[inline]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.position)?;
        self.position += 1;
        Some(byte)
    }

    /// Read the next byte, failing with [`CodecError::TruncatedInput`] at
    /// end of input.
    #[inline]
    pub fn read_byte(&mut self) -> Result<u8> {
        self.next_byte()
            .ok_or_else(|| CodecError::truncated(self.position as u64, 0))
    }

    /// Look at the next byte without consuming it.
    #[inline]
    pub fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    /// Borrow up to `count` bytes and advance past them.
    pub fn take_slice(&mut self, count: usize) -> &'a [u8] {
        let end = self.position.saturating_add(count).min(self.data.len());
        let slice = &self.data[self.position..end];
        self.position = end;
        slice
    }

    /// Borrow the unread part of the source.
    pub fn remaining_slice(&self) -> &'a [u8] {
        &self.data[self.position..]
    }
}
