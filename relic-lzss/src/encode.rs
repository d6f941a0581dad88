//! Greedy LZSS encoder.
//!
//! Produces the flag-byte stream read by [`LzssDecoder`](crate::LzssDecoder)
//! for the same [`LzssConfig`]. Matches are found with a [`MatchTree`], and
//! the first longest match wins. Any input encodes; incompressible data
//! grows by one flag byte per eight literals.

use crate::config::LzssConfig;
use crate::tree::MatchTree;
use log::debug;
use relic_core::error::Result;

/// Flag byte plus eight two-byte tokens.
const GROUP_CAPACITY: usize = 17;

/// One flag byte and the tokens it describes.
#[derive(Debug)]
struct TokenGroup {
    code: [u8; GROUP_CAPACITY],
    len: usize,
    mask: u8,
}

impl TokenGroup {
    fn new() -> Self {
        Self {
            code: [0; GROUP_CAPACITY],
            len: 1,
            mask: 1,
        }
    }

    fn literal(&mut self, byte: u8) {
        self.code[0] |= self.mask;
        self.code[self.len] = byte;
        self.len += 1;
    }

    fn reference(&mut self, position: usize, length_code: usize) {
        self.code[self.len] = (position & 0xFF) as u8;
        self.code[self.len + 1] = (((position >> 4) & 0xF0) | length_code) as u8;
        self.len += 2;
    }

    /// Advance to the next flag bit, flushing a complete group.
    fn advance(&mut self, output: &mut Vec<u8>) {
        if self.mask == 0x80 {
            self.flush(output);
        } else {
            self.mask <<= 1;
        }
    }

    fn flush(&mut self, output: &mut Vec<u8>) {
        if self.len > 1 {
            output.extend_from_slice(&self.code[..self.len]);
        }
        *self = Self::new();
    }
}

/// LZSS encoder.
#[derive(Debug, Clone)]
pub struct LzssEncoder {
    config: LzssConfig,
}

impl LzssEncoder {
    /// Create an encoder for the given geometry.
    pub fn new(config: LzssConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &LzssConfig {
        &self.config
    }

    /// Encode `input` into a complete LZSS stream.
    pub fn encode(&self, input: &[u8]) -> Vec<u8> {
        if input.is_empty() {
            return Vec::new();
        }

        let n = self.config.frame_size;
        let f = self.config.max_match();
        let threshold = self.config.threshold;
        let mask = self.config.frame_mask();

        let mut tree = MatchTree::new(n, f);
        let mut r = self.config.init_pos & mask;
        let mut s = (r + f) & mask;

        // Everything behind the lookahead starts as fill.
        for k in 0..n - f {
            tree.fill_byte((s + k) & mask, self.config.frame_fill);
        }

        let mut read = 0;
        let mut len = 0;
        while len < f && read < input.len() {
            tree.set_byte((r + len) & mask, input[read]);
            read += 1;
            len += 1;
        }

        for back in 1..=f {
            tree.insert((r + n - back) & mask);
        }
        let mut found = tree.insert(r);

        let mut output = Vec::with_capacity(input.len() + input.len() / 8 + 2);
        let mut group = TokenGroup::new();

        loop {
            let mut match_length = found.length.min(len);
            if match_length <= threshold {
                match_length = 1;
                group.literal(tree.byte_at(r));
            } else {
                group.reference(found.position, match_length - self.config.min_match());
            }
            group.advance(&mut output);

            let mut i = 0;
            while i < match_length && read < input.len() {
                tree.delete(s);
                tree.set_byte(s, input[read]);
                read += 1;
                s = (s + 1) & mask;
                r = (r + 1) & mask;
                found = tree.insert(r);
                i += 1;
            }
            // Input exhausted: keep sliding so the lookahead drains.
            while read == input.len() && i < match_length {
                i += 1;
                tree.delete(s);
                s = (s + 1) & mask;
                r = (r + 1) & mask;
                len -= 1;
                if len != 0 {
                    found = tree.insert(r);
                }
            }

            if len == 0 {
                break;
            }
        }
        group.flush(&mut output);

        debug!("LZSS encode: {} -> {} bytes", input.len(), output.len());
        output
    }
}

/// Encode `data` with the given LZSS geometry.
pub fn encode_lzss(data: &[u8], config: LzssConfig) -> Result<Vec<u8>> {
    Ok(LzssEncoder::new(config)?.encode(data))
}
