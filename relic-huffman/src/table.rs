//! Huffman code tables.
//!
//! A table is a binary tree stored as two arrays of child tokens. Tokens
//! below 256 are leaf symbols; tokens from 256 upward name internal nodes.
//! Decoding starts at the root and takes the left child on a `0` bit and
//! the right child on a `1` bit until it lands on a symbol.
//!
//! Tables come from one of two places:
//!
//! - an embedded tree serialized in pre-order at the head of the packed
//!   stream (`1` = internal node, then its left and right subtrees; `0` =
//!   leaf, then 8 bits of symbol)
//! - canonical code lengths supplied by the container

use relic_core::bits::MsbBitReader;
use relic_core::error::{CodecError, Result};

/// Token of the first internal node.
const FIRST_NODE: u16 = 256;

/// Child slot of an incomplete code that no symbol occupies.
const MISSING: u16 = u16::MAX;

/// Maximum internal nodes of an embedded tree.
pub const MAX_EMBEDDED_NODES: usize = 255;

/// Maximum code length accepted by [`HuffmanTable::from_code_lengths`].
pub const MAX_CODE_LENGTH: u8 = 16;

/// A static Huffman code over byte symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable {
    left: Vec<u16>,
    right: Vec<u16>,
    root: u16,
}

impl HuffmanTable {
    /// Read a pre-order serialized tree from the head of a bit stream.
    ///
    /// More than [`MAX_EMBEDDED_NODES`] internal nodes is
    /// [`CodecError::InvalidControlCode`].
    pub fn read_embedded(reader: &mut MsbBitReader<'_>) -> Result<Self> {
        let mut table = Self {
            left: Vec::new(),
            right: Vec::new(),
            root: MISSING,
        };
        table.root = table.read_subtree(reader)?;
        Ok(table)
    }

    fn read_subtree(&mut self, reader: &mut MsbBitReader<'_>) -> Result<u16> {
        if !reader.read_bit()? {
            return Ok(reader.read_bits(8)? as u16);
        }

        if self.left.len() >= MAX_EMBEDDED_NODES {
            return Err(CodecError::invalid_code(reader.bit_position()));
        }
        let index = self.push_node();
        let left = self.read_subtree(reader)?;
        let right = self.read_subtree(reader)?;
        self.left[index] = left;
        self.right[index] = right;
        Ok(FIRST_NODE + index as u16)
    }

    /// Build a canonical code from per-symbol code lengths.
    ///
    /// `lengths[symbol]` is the code length of `symbol`, `0` meaning unused.
    /// Codes are assigned in order of (length, symbol), shortest first. An
    /// incomplete code is accepted; its unused branches fail at decode time.
    pub fn from_code_lengths(lengths: &[u8]) -> Result<Self> {
        if lengths.len() > 256 {
            return Err(CodecError::unsupported(format!(
                "Huffman alphabet of {} symbols",
                lengths.len()
            )));
        }

        let mut bl_count = [0u32; MAX_CODE_LENGTH as usize + 1];
        for &len in lengths {
            if len > MAX_CODE_LENGTH {
                return Err(CodecError::invalid_code(0));
            }
            if len > 0 {
                bl_count[len as usize] += 1;
            }
        }
        if bl_count.iter().all(|&count| count == 0) {
            return Err(CodecError::invalid_code(0));
        }

        // Reject oversubscribed length sets.
        let mut left: i64 = 1;
        for &count in &bl_count[1..] {
            left = (left << 1) - i64::from(count);
            if left < 0 {
                return Err(CodecError::invalid_code(0));
            }
        }

        let mut next_code = [0u32; MAX_CODE_LENGTH as usize + 1];
        let mut code = 0u32;
        for bits in 1..=MAX_CODE_LENGTH as usize {
            code = (code + bl_count[bits - 1]) << 1;
            next_code[bits] = code;
        }

        let mut table = Self {
            left: Vec::new(),
            right: Vec::new(),
            root: FIRST_NODE,
        };
        table.push_node();

        for (symbol, &len) in lengths.iter().enumerate() {
            if len == 0 {
                continue;
            }
            let code = next_code[len as usize];
            next_code[len as usize] += 1;
            table.insert_code(code, len, symbol as u16);
        }

        Ok(table)
    }

    fn push_node(&mut self) -> usize {
        self.left.push(MISSING);
        self.right.push(MISSING);
        self.left.len() - 1
    }

    fn insert_code(&mut self, code: u32, len: u8, symbol: u16) {
        let mut index = 0usize;
        for shift in (1..len).rev() {
            let bit = (code >> shift) & 1 != 0;
            let child = if bit {
                self.right[index]
            } else {
                self.left[index]
            };
            index = if child == MISSING {
                let created = self.push_node();
                self.set_child(index, bit, FIRST_NODE + created as u16);
                created
            } else {
                (child - FIRST_NODE) as usize
            };
        }
        self.set_child(index, code & 1 != 0, symbol);
    }

    fn set_child(&mut self, index: usize, bit: bool, token: u16) {
        if bit {
            self.right[index] = token;
        } else {
            self.left[index] = token;
        }
    }

    /// Number of internal nodes.
    pub fn node_count(&self) -> usize {
        self.left.len()
    }

    /// Decode one symbol.
    ///
    /// Reaching a branch no symbol occupies is
    /// [`CodecError::InvalidControlCode`]; running out of bits is
    /// [`CodecError::TruncatedInput`].
    pub fn decode_symbol(&self, reader: &mut MsbBitReader<'_>) -> Result<u8> {
        let mut token = self.root;
        while token >= FIRST_NODE {
            let bit_position = reader.bit_position();
            let index = (token - FIRST_NODE) as usize;
            token = if reader.read_bit()? {
                self.right[index]
            } else {
                self.left[index]
            };
            if token == MISSING {
                return Err(CodecError::invalid_code(bit_position));
            }
        }
        Ok(token as u8)
    }
}
