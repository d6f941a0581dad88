//! In-place keyed transforms.
//!
//! Every transform works on a fully buffered record and never rejects
//! input. [`KeyedCipher::apply`] removes the obfuscation layer;
//! [`KeyedCipher::encrypt`] puts it back. For the pure XOR transforms the
//! two are the same operation.

use crate::keygen::KeyGenerator;
use relic_core::{CodecError, Result};

/// Key table mixed into every third byte of a TimeLeap record.
const TIME_LEAP_TABLE: [u8; 20] = [
    0xFF, 0xFF, 0xFF, 0x01, 0x9C, 0xAA, 0xA5, 0x00, 0x30, 0xFF, 0x77, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Sec5 running-key increment.
const SEC5_KEY_STEP: u8 = 18;

/// TLP key for the first byte of a record.
const TLP_FIRST_KEY: u8 = 0xCB;

/// TLP key for every following byte.
const TLP_KEY: u8 = 0x01;

/// Duke index base key.
const DUKE_INDEX_BASE: u8 = 172;

/// TLP container encryption variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlpVariant {
    /// Type code 0: XOR then rotate right by one.
    XorRotate,
}

impl TlpVariant {
    /// Map a container type code to a variant.
    ///
    /// Only type 0 has a known transform.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::XorRotate),
            other => Err(CodecError::unsupported(format!("tlp type {other}"))),
        }
    }

    /// The container type code.
    pub const fn code(self) -> u8 {
        match self {
            Self::XorRotate => 0,
        }
    }
}

/// A keyed byte transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyedCipher {
    /// LCG key stream, one 32-bit key per 4 bytes.
    RgssData {
        /// First key of the stream.
        key: u32,
    },
    /// LCG key stream, one key per byte, low byte only.
    RgssName {
        /// First key of the stream.
        key: u32,
    },
    /// A single 32-bit key repeated over the record.
    FixedKeyXor {
        /// Little-endian key.
        key: u32,
    },
    /// Length-derived subtraction key, decremented per byte.
    SilkyName,
    /// Running key advanced by each ciphertext byte.
    Sec5Code,
    /// Swap the nibbles of every `step`-th byte from `start`.
    NibbleSwap {
        /// First byte touched.
        start: usize,
        /// Distance between touched bytes. Zero is a no-op.
        step: usize,
    },
    /// Negate, table XOR and nibble swap on fixed strides.
    TimeLeapData,
    /// TLP record encryption.
    Tlp(TlpVariant),
    /// Bitwise NOT of a prefix.
    Invert {
        /// Bytes to invert, or the whole record.
        limit: Option<usize>,
    },
    /// Cycle a short key over the record.
    RepeatingXor {
        /// Key bytes. Empty is a no-op.
        key: Vec<u8>,
    },
    /// Duke index XOR: byte `i` with `i * 5 + 172`.
    DukeIndex,
    /// XOR with the entry name plus position, in name-length strides.
    NameKeyed {
        /// Entry name bytes.
        name: Vec<u8>,
        /// Strides start only below this offset.
        limit: usize,
    },
}

impl KeyedCipher {
    /// Remove the obfuscation layer in place.
    pub fn apply(&self, buffer: &mut [u8]) {
        match self {
            Self::RgssData { key } => {
                let mut keys = KeyGenerator::new(*key);
                for chunk in buffer.chunks_mut(4) {
                    let key = keys.next_key().to_le_bytes();
                    for (b, k) in chunk.iter_mut().zip(key) {
                        *b ^= k;
                    }
                }
            }
            Self::RgssName { key } => {
                let mut keys = KeyGenerator::new(*key);
                for b in buffer.iter_mut() {
                    *b ^= keys.next_key() as u8;
                }
            }
            Self::FixedKeyXor { key } => {
                let key = key.to_le_bytes();
                for (i, b) in buffer.iter_mut().enumerate() {
                    *b ^= key[i % 4];
                }
            }
            Self::SilkyName => silky_name(buffer, false),
            Self::Sec5Code => sec5_decrypt(buffer),
            Self::NibbleSwap { start, step } => nibble_swap(buffer, *start, *step),
            Self::TimeLeapData => time_leap_decrypt(buffer),
            Self::Tlp(variant) => tlp_decrypt(*variant, buffer),
            Self::Invert { limit } => {
                let end = limit.map_or(buffer.len(), |n| n.min(buffer.len()));
                for b in &mut buffer[..end] {
                    *b = !*b;
                }
            }
            Self::RepeatingXor { key } => {
                for (b, k) in buffer.iter_mut().zip(key.iter().cycle()) {
                    *b ^= k;
                }
            }
            Self::DukeIndex => {
                for (i, b) in buffer.iter_mut().enumerate() {
                    *b ^= (i as u8).wrapping_mul(5).wrapping_add(DUKE_INDEX_BASE);
                }
            }
            Self::NameKeyed { name, limit } => name_keyed(buffer, name, *limit),
        }
    }

    /// Apply the obfuscation layer in place; the inverse of [`apply`](Self::apply).
    pub fn encrypt(&self, buffer: &mut [u8]) {
        match self {
            Self::SilkyName => silky_name(buffer, true),
            Self::Sec5Code => sec5_encrypt(buffer),
            Self::TimeLeapData => time_leap_encrypt(buffer),
            Self::Tlp(variant) => tlp_encrypt(*variant, buffer),
            _ => self.apply(buffer),
        }
    }

    /// Whether `encrypt` and `apply` are the same operation.
    pub fn is_involution(&self) -> bool {
        !matches!(
            self,
            Self::SilkyName | Self::Sec5Code | Self::TimeLeapData | Self::Tlp(_)
        )
    }
}

fn silky_name(buffer: &mut [u8], encrypt: bool) {
    let mut key = (buffer.len() as u8).wrapping_add(1);
    for b in buffer.iter_mut() {
        *b = if encrypt {
            b.wrapping_add(key)
        } else {
            b.wrapping_sub(key)
        };
        key = key.wrapping_sub(1);
    }
}

fn sec5_decrypt(buffer: &mut [u8]) {
    let mut key = 0u8;
    for b in buffer.iter_mut() {
        let cipher = *b;
        *b = cipher ^ key;
        key = key.wrapping_add(cipher.wrapping_add(SEC5_KEY_STEP));
    }
}

fn sec5_encrypt(buffer: &mut [u8]) {
    let mut key = 0u8;
    for b in buffer.iter_mut() {
        *b ^= key;
        key = key.wrapping_add(b.wrapping_add(SEC5_KEY_STEP));
    }
}

fn nibble_swap(buffer: &mut [u8], start: usize, step: usize) {
    if step == 0 {
        return;
    }
    for b in buffer.iter_mut().skip(start).step_by(step) {
        *b = b.rotate_left(4);
    }
}

fn time_leap_negate(buffer: &mut [u8]) {
    for b in buffer.iter_mut().skip(1).step_by(4) {
        *b = b.wrapping_neg();
    }
}

fn time_leap_table(buffer: &mut [u8]) {
    for (i, b) in buffer.iter_mut().enumerate().step_by(3) {
        *b ^= TIME_LEAP_TABLE[i / 5 % 5 + i % 6];
    }
}

fn time_leap_decrypt(buffer: &mut [u8]) {
    time_leap_negate(buffer);
    time_leap_table(buffer);
    nibble_swap(buffer, 2, 6);
}

fn time_leap_encrypt(buffer: &mut [u8]) {
    nibble_swap(buffer, 2, 6);
    time_leap_table(buffer);
    time_leap_negate(buffer);
}

fn tlp_key(index: usize) -> u8 {
    if index == 0 { TLP_FIRST_KEY } else { TLP_KEY }
}

fn tlp_decrypt(variant: TlpVariant, buffer: &mut [u8]) {
    match variant {
        TlpVariant::XorRotate => {
            for (i, b) in buffer.iter_mut().enumerate() {
                *b = (*b ^ tlp_key(i)).rotate_right(1);
            }
        }
    }
}

fn tlp_encrypt(variant: TlpVariant, buffer: &mut [u8]) {
    match variant {
        TlpVariant::XorRotate => {
            for (i, b) in buffer.iter_mut().enumerate() {
                *b = b.rotate_left(1) ^ tlp_key(i);
            }
        }
    }
}

fn name_keyed(buffer: &mut [u8], name: &[u8], limit: usize) {
    if name.is_empty() {
        return;
    }
    let mut offset = 0;
    while offset < buffer.len() && offset < limit {
        for (j, b) in buffer[offset..].iter_mut().take(name.len()).enumerate() {
            let pos = (offset + j) as u8;
            *b ^= name[j].wrapping_add(pos);
        }
        offset += name.len();
    }
}
