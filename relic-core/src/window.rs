//! History window (sliding ring buffer) for LZ-family decoders.
//!
//! The window keeps the most recent `capacity` produced bytes so that
//! back-references can copy from them. A back-reference of distance `D`
//! reads from `(cursor - D) mod capacity` as it stands after every byte
//! already appended by the same copy, so a copy longer than its distance
//! repeats the referenced pattern.
//!
//! # Sizes
//!
//! - LZSS (flag-byte formats): 4 KB, pre-filled with the format's fill byte
//! - Gamma-LZ (aPLib-style): 1 MB by default, starts empty

use crate::error::{CodecError, Result};

/// Common window sizes.
pub mod sizes {
    /// Window size for the flag-byte LZSS formats (4 KB).
    pub const LZSS: usize = 4096;
    /// Default window size for the gamma-LZ decoder (1 MB).
    pub const GAMMA_LZ: usize = 1 << 20;
}

/// A fixed-capacity ring buffer of previously produced bytes.
#[derive(Debug, Clone)]
pub struct HistoryWindow {
    /// The underlying buffer.
    buffer: Vec<u8>,
    /// Current write position (next byte will be written here).
    position: usize,
    /// Number of bytes that may be referenced (up to capacity).
    size: usize,
    /// Mask for efficient modulo (capacity - 1).
    mask: usize,
}

impl HistoryWindow {
    /// Create an empty window with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of 2 or is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "Capacity must be a power of 2, got {}",
            capacity
        );

        Self {
            buffer: vec![0; capacity],
            position: 0,
            size: 0,
            mask: capacity - 1,
        }
    }

    /// Create a window whose every slot already holds `fill`.
    ///
    /// Pre-filled slots count as history, so back-references may reach
    /// them from the very first token. The write cursor starts at
    /// `start & (capacity - 1)`.
    pub fn prefilled(capacity: usize, fill: u8, start: usize) -> Self {
        let mut window = Self::new(capacity);
        window.buffer.fill(fill);
        window.size = capacity;
        window.position = start & window.mask;
        window
    }

    /// Get the capacity of the window.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of bytes a back-reference may reach.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Check if no history is available.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Get the current write position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Append a byte and advance the write cursor.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buffer[self.position] = byte;
        self.position = (self.position + 1) & self.mask;
        if self.size < self.buffer.len() {
            self.size += 1;
        }
    }

    /// Read the byte `distance` positions behind the write cursor.
    ///
    /// Distance 1 is the most recently written byte.
    pub fn read_at_distance(&self, distance: usize) -> Result<u8> {
        self.check_distance(distance)?;
        Ok(self.buffer[self.position.wrapping_sub(distance) & self.mask])
    }

    /// Convert an absolute ring position into a distance in `1..=capacity`.
    ///
    /// A position equal to the write cursor names the oldest byte, i.e.
    /// distance `capacity`.
    #[inline]
    pub fn distance_to(&self, ring_position: usize) -> usize {
        match self.position.wrapping_sub(ring_position) & self.mask {
            0 => self.buffer.len(),
            distance => distance,
        }
    }

    /// Start an overlap-safe copy of `length` bytes from `distance` back.
    ///
    /// The returned iterator appends each byte to the window before
    /// yielding it, so later bytes of the same copy may come from earlier
    /// ones.
    pub fn copy_back(&mut self, distance: usize, length: usize) -> Result<CopyBack<'_>> {
        self.check_distance(distance)?;
        let source = self.position.wrapping_sub(distance) & self.mask;
        Ok(CopyBack {
            window: self,
            source,
            remaining: length,
        })
    }

    /// Clear the window back to an empty state.
    pub fn clear(&mut self) {
        self.position = 0;
        self.size = 0;
        self.buffer.fill(0);
    }

    /// Get the last N bytes written (for debugging/testing).
    pub fn last_bytes(&self, count: usize) -> Vec<u8> {
        let count = count.min(self.size);
        (0..count)
            .map(|i| self.buffer[self.position.wrapping_sub(count - i) & self.mask])
            .collect()
    }

    fn check_distance(&self, distance: usize) -> Result<()> {
        if distance == 0 || distance > self.size {
            return Err(CodecError::out_of_range(distance as u64, self.size));
        }
        Ok(())
    }
}

/// Iterator returned by [`HistoryWindow::copy_back`].
#[derive(Debug)]
pub struct CopyBack<'w> {
    window: &'w mut HistoryWindow,
    source: usize,
    remaining: usize,
}

impl Iterator for CopyBack<'_> {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        if self.remaining == 0 {
            return None;
        }
        let byte = self.window.buffer[self.source];
        self.window.push(byte);
        self.source = (self.source + 1) & self.window.mask;
        self.remaining -= 1;
        Some(byte)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for CopyBack<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_basic() {
        let mut window = HistoryWindow::new(8);
        for &b in b"Hello" {
            window.push(b);
        }

        assert_eq!(window.len(), 5);
        assert_eq!(window.read_at_distance(1).unwrap(), b'o');
        assert_eq!(window.read_at_distance(2).unwrap(), b'l');
        assert_eq!(window.read_at_distance(5).unwrap(), b'H');
    }

    #[test]
    fn test_window_wrap() {
        let mut window = HistoryWindow::new(4);
        for &b in b"ABCDEF" {
            window.push(b);
        }

        assert_eq!(window.len(), 4);
        assert_eq!(window.read_at_distance(1).unwrap(), b'F');
        assert_eq!(window.read_at_distance(4).unwrap(), b'C');
        assert_eq!(window.last_bytes(3), b"DEF");
    }

    #[test]
    fn test_copy_back_overlap() {
        // "AB" -> copy distance=2, length=6 -> "ABABAB"
        let mut window = HistoryWindow::new(32);
        window.push(b'A');
        window.push(b'B');

        let copied: Vec<u8> = window.copy_back(2, 6).unwrap().collect();
        assert_eq!(copied, b"ABABAB");
        assert_eq!(window.last_bytes(8), b"ABABABAB");
    }

    #[test]
    fn test_copy_back_single_byte_repeat() {
        let mut window = HistoryWindow::new(32);
        window.push(b'X');

        let copied: Vec<u8> = window.copy_back(1, 5).unwrap().collect();
        assert_eq!(copied, b"XXXXX");
    }

    #[test]
    fn test_copy_back_resumes() {
        // A copy interrupted half way and restarted with the same distance
        // produces the same bytes as one uninterrupted copy.
        let mut window = HistoryWindow::new(16);
        for &b in b"xyz" {
            window.push(b);
        }
        let first: Vec<u8> = window.copy_back(3, 4).unwrap().collect();
        let second: Vec<u8> = window.copy_back(3, 3).unwrap().collect();
        assert_eq!(first, b"xyzx");
        assert_eq!(second, b"yzx");
    }

    #[test]
    fn test_distance_range() {
        let mut window = HistoryWindow::new(32);
        assert!(matches!(
            window.copy_back(1, 1),
            Err(CodecError::BackReferenceOutOfRange { .. })
        ));

        window.push(1);
        assert!(window.copy_back(0, 1).is_err());
        assert!(window.copy_back(2, 1).is_err());
        assert!(window.read_at_distance(1).is_ok());
    }

    #[test]
    fn test_prefilled() {
        let mut window = HistoryWindow::prefilled(4096, b' ', 0xFEE);
        assert_eq!(window.len(), 4096);
        assert_eq!(window.position(), 0xFEE);
        assert_eq!(window.read_at_distance(4096).unwrap(), b' ');
        assert!(matches!(
            window.copy_back(4097, 1),
            Err(CodecError::BackReferenceOutOfRange {
                distance: 4097,
                available: 4096
            })
        ));

        window.push(b'A');
        assert_eq!(window.distance_to(0xFEE), 1);
        assert_eq!(window.distance_to(0xFEF), 4096);
        assert_eq!(window.distance_to(0), 0xFEF);
    }

    #[test]
    #[should_panic(expected = "power of 2")]
    fn test_non_power_of_two_panics() {
        let _ = HistoryWindow::new(100);
    }
}
