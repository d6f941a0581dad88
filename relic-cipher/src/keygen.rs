//! Linear-congruential key streams.

/// Seed of the version 1 index key stream.
pub const RGSS_V1_SEED: u32 = 0xDEADCAFE;

/// Key stream `k' = k * 7 + 3` (wrapping).
///
/// [`next_key`](Self::next_key) hands out the current key and then
/// advances, so the seed itself is the first key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyGenerator {
    seed: u32,
}

impl KeyGenerator {
    /// Create a key stream starting at `seed`.
    pub const fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// The key the next call to [`next_key`](Self::next_key) returns.
    #[inline]
    pub const fn current(&self) -> u32 {
        self.seed
    }

    /// Return the current key and advance.
    #[inline]
    pub fn next_key(&mut self) -> u32 {
        let key = self.seed;
        self.seed = self.seed.wrapping_mul(7).wrapping_add(3);
        key
    }

    /// XOR a little-endian `u32` field with the next key.
    #[inline]
    pub fn unmask_u32(&mut self, value: u32) -> u32 {
        value ^ self.next_key()
    }
}

impl Iterator for KeyGenerator {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        Some(self.next_key())
    }
}

/// Fixed key of a version 3 index, derived from the stored seed.
#[inline]
pub const fn rgss_v3_key(seed: u32) -> u32 {
    seed.wrapping_mul(9).wrapping_add(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_sequence() {
        let mut keys = KeyGenerator::new(RGSS_V1_SEED);
        assert_eq!(keys.current(), 0xDEADCAFE);
        assert_eq!(keys.next_key(), 0xDEADCAFE);
        assert_eq!(keys.next_key(), 0x16C08CF5);
        assert_eq!(keys.current(), 0x9F43DAB6);
    }

    #[test]
    fn test_iterator() {
        let keys: Vec<u32> = KeyGenerator::new(RGSS_V1_SEED).take(3).collect();
        assert_eq!(keys, [0xDEADCAFE, 0x16C08CF5, 0x9F43DAB6]);
    }

    #[test]
    fn test_unmask() {
        let mut keys = KeyGenerator::new(RGSS_V1_SEED);
        assert_eq!(keys.unmask_u32(0xDEADCAFE ^ 12), 12);
    }

    #[test]
    fn test_v3_key() {
        assert_eq!(rgss_v3_key(0x55555555), 0);
        assert_eq!(rgss_v3_key(0x12345678), 0xA3D70A3B);
    }
}
