//! Resumable LZSS decoder.
//!
//! The stream is a sequence of groups: one flag byte followed by up to
//! eight tokens. Flag bits are consumed LSB first. A set bit is a literal
//! byte; a clear bit is a two-byte match token:
//!
//! ```text
//! byte0: position bits 0-7
//! byte1: position bits 8-11 (high nibble) | length - min_match (low nibble)
//! ```
//!
//! The position is an absolute index into the history frame, which the
//! decoder turns into a back-reference distance relative to its write
//! cursor.

use crate::config::LzssConfig;
use log::{debug, trace};
use relic_core::cursor::ByteCursor;
use relic_core::error::{CodecError, Result};
use relic_core::traits::{DecompressStatus, Decompressor};
use relic_core::window::HistoryWindow;

/// Decoder state machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderPhase {
    /// Next token type comes from the flag register (refilled when empty).
    ReadFlagByte,
    /// A literal byte follows.
    ReadLiteral,
    /// A two-byte match token follows.
    ReadMatch,
    /// Decompression complete.
    Done,
    /// A previous call failed; the error is replayed.
    Failed,
}

/// A back-reference copy interrupted by a full output buffer.
#[derive(Debug, Clone, Copy)]
struct PendingCopy {
    distance: usize,
    remaining: usize,
}

/// Streaming LZSS decoder over a fully-buffered compressed block.
#[derive(Debug)]
pub struct LzssDecoder<'a> {
    config: LzssConfig,
    cursor: ByteCursor<'a>,
    window: HistoryWindow,
    /// Remaining flag bits, LSB next.
    flags: u8,
    /// Number of unread bits in `flags`.
    flag_bits: u8,
    phase: DecoderPhase,
    pending: Option<PendingCopy>,
    expected_len: Option<u64>,
    total_out: u64,
    failure: Option<CodecError>,
}

impl<'a> LzssDecoder<'a> {
    /// Create a decoder.
    ///
    /// With `expected_len` set, decoding stops after exactly that many
    /// bytes (a trailing match is cut short) and running out of input
    /// earlier is [`CodecError::TruncatedInput`]. Without it, decoding
    /// ends cleanly when input runs out between tokens.
    pub fn new(data: &'a [u8], config: LzssConfig, expected_len: Option<u64>) -> Result<Self> {
        config.validate()?;
        debug!(
            "LZSS decode: {} input bytes, expected {:?}, fill {:#04x}",
            data.len(),
            expected_len,
            config.frame_fill
        );

        Ok(Self {
            config,
            cursor: ByteCursor::new(data),
            window: HistoryWindow::prefilled(config.frame_size, config.frame_fill, config.init_pos),
            flags: 0,
            flag_bits: 0,
            phase: DecoderPhase::ReadFlagByte,
            pending: None,
            expected_len,
            total_out: 0,
            failure: None,
        })
    }

    /// Get the current phase.
    pub fn phase(&self) -> DecoderPhase {
        self.phase
    }

    /// Get the configuration.
    pub fn config(&self) -> &LzssConfig {
        &self.config
    }

    /// Bytes still owed under a known length, bounded by `space`.
    #[inline]
    fn budget(&self, space: usize) -> usize {
        match self.expected_len {
            Some(len) => (len - self.total_out).min(space as u64) as usize,
            None => space,
        }
    }

    /// Input ran out at a token boundary.
    fn end_of_input(&mut self) -> Result<()> {
        if self.expected_len.is_some() {
            return Err(CodecError::truncated(
                self.cursor.position() as u64,
                self.total_out,
            ));
        }
        self.phase = DecoderPhase::Done;
        Ok(())
    }

    fn run(&mut self, output: &mut [u8]) -> Result<(usize, DecompressStatus)> {
        let mut written = 0;

        loop {
            if self.expected_len.is_some_and(|len| self.total_out >= len) {
                self.phase = DecoderPhase::Done;
                self.pending = None;
            }
            if self.phase == DecoderPhase::Done {
                return Ok((written, DecompressStatus::Done));
            }
            if written == output.len() {
                return Ok((written, DecompressStatus::NeedsOutput));
            }

            if let Some(copy) = self.pending.take() {
                let count = self.budget(output.len() - written).min(copy.remaining);
                let source = self.window.copy_back(copy.distance, count)?;
                for (slot, byte) in output[written..written + count].iter_mut().zip(source) {
                    *slot = byte;
                }
                written += count;
                self.total_out += count as u64;
                if copy.remaining > count {
                    self.pending = Some(PendingCopy {
                        distance: copy.distance,
                        remaining: copy.remaining - count,
                    });
                }
                continue;
            }

            match self.phase {
                DecoderPhase::ReadFlagByte => {
                    if self.flag_bits == 0 {
                        match self.cursor.next_byte() {
                            Some(byte) => {
                                self.flags = byte;
                                self.flag_bits = 8;
                            }
                            None => {
                                self.end_of_input()?;
                                continue;
                            }
                        }
                    }
                    let literal = self.flags & 1 != 0;
                    self.flags >>= 1;
                    self.flag_bits -= 1;
                    self.phase = if literal {
                        DecoderPhase::ReadLiteral
                    } else {
                        DecoderPhase::ReadMatch
                    };
                }
                DecoderPhase::ReadLiteral => match self.cursor.next_byte() {
                    Some(byte) => {
                        self.window.push(byte);
                        output[written] = byte;
                        written += 1;
                        self.total_out += 1;
                        self.phase = DecoderPhase::ReadFlagByte;
                    }
                    None => self.end_of_input()?,
                },
                DecoderPhase::ReadMatch => {
                    let Some(low) = self.cursor.next_byte() else {
                        self.end_of_input()?;
                        continue;
                    };
                    // Half a token is never a clean end.
                    let high = self.cursor.next_byte().ok_or_else(|| {
                        CodecError::truncated(self.cursor.position() as u64, self.total_out)
                    })?;

                    let position = low as usize | ((high as usize & 0xF0) << 4);
                    let length = (high & 0x0F) as usize + self.config.min_match();
                    let distance = self.window.distance_to(position);
                    trace!("match pos={position:#05x} dist={distance} len={length}");

                    self.pending = Some(PendingCopy {
                        distance,
                        remaining: length,
                    });
                    self.phase = DecoderPhase::ReadFlagByte;
                }
                DecoderPhase::Done | DecoderPhase::Failed => {
                    unreachable!("terminal phases are handled before dispatch")
                }
            }
        }
    }
}

impl Decompressor for LzssDecoder<'_> {
    fn decompress(&mut self, output: &mut [u8]) -> Result<(usize, DecompressStatus)> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let was_done = self.phase == DecoderPhase::Done;
        match self.run(output) {
            Ok((written, DecompressStatus::Done)) => {
                if !was_done {
                    debug!(
                        "LZSS decode done: {} bytes from {} input bytes",
                        self.total_out,
                        self.cursor.position()
                    );
                }
                Ok((written, DecompressStatus::Done))
            }
            Ok(progress) => Ok(progress),
            Err(err) => {
                self.phase = DecoderPhase::Failed;
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.phase == DecoderPhase::Done
    }

    fn total_in(&self) -> u64 {
        self.cursor.position() as u64
    }

    fn total_out(&self) -> u64 {
        self.total_out
    }
}

/// Decode a complete LZSS block.
pub fn decode_lzss(data: &[u8], config: LzssConfig, expected_len: Option<u64>) -> Result<Vec<u8>> {
    LzssDecoder::new(data, config, expected_len)?.decompress_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_only() {
        // Flag 0x07: three literals.
        let data = [0x07, b'a', b'b', b'c'];
        let output = decode_lzss(&data, LzssConfig::STANDARD, None).unwrap();
        assert_eq!(output, b"abc");

        let output = decode_lzss(&data, LzssConfig::STANDARD, Some(3)).unwrap();
        assert_eq!(output, b"abc");
    }

    #[test]
    fn test_overlapping_match() {
        // 'A', then a match at position 0xFEE (distance 1), length 9.
        let data = [0x01, 0x41, 0xEE, 0xF6];
        let output = decode_lzss(&data, LzssConfig::STANDARD, Some(10)).unwrap();
        assert_eq!(output, b"AAAAAAAAAA");
    }

    #[test]
    fn test_match_into_prefill() {
        // A length-3 match at 0xFED reads the fill byte.
        let data = [0x7E, 0xED, 0xF0, b's', b'p', b'a', b'c', b'e', b's'];
        let output = decode_lzss(&data, LzssConfig::SPACE_FILLED, None).unwrap();
        assert_eq!(output, b"   spaces");

        let output = decode_lzss(&data, LzssConfig::STANDARD, None).unwrap();
        assert_eq!(output, b"\0\0\0spaces");
    }

    #[test]
    fn test_expected_len_cuts_match() {
        let data = [0x01, 0x41, 0xEE, 0xF6];
        let output = decode_lzss(&data, LzssConfig::STANDARD, Some(4)).unwrap();
        assert_eq!(output, b"AAAA");
    }

    #[test]
    fn test_truncated_with_expected_len() {
        let data = [0x07, b'a', b'b', b'c'];
        let result = decode_lzss(&data, LzssConfig::STANDARD, Some(5));
        assert!(matches!(
            result,
            Err(CodecError::TruncatedInput {
                offset: 4,
                produced: 3
            })
        ));
    }

    #[test]
    fn test_half_match_is_truncated() {
        let data = [0x01, 0x41, 0xEE];
        let result = decode_lzss(&data, LzssConfig::STANDARD, None);
        assert!(matches!(result, Err(CodecError::TruncatedInput { .. })));
    }

    #[test]
    fn test_empty_input() {
        assert!(decode_lzss(&[], LzssConfig::STANDARD, None).unwrap().is_empty());
        assert!(decode_lzss(&[], LzssConfig::STANDARD, Some(0)).unwrap().is_empty());
        assert!(matches!(
            decode_lzss(&[], LzssConfig::STANDARD, Some(1)),
            Err(CodecError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_small_output_buffers() {
        let data = [0x01, 0x41, 0xEE, 0xF6];
        let mut decoder = LzssDecoder::new(&data, LzssConfig::STANDARD, None).unwrap();
        let mut output = Vec::new();
        let mut buffer = [0u8; 3];

        loop {
            let (produced, status) = decoder.decompress(&mut buffer).unwrap();
            output.extend_from_slice(&buffer[..produced]);
            if status == DecompressStatus::Done {
                break;
            }
            assert_eq!(produced, buffer.len());
        }

        assert_eq!(output, b"AAAAAAAAAA");
        assert!(decoder.is_finished());
        assert_eq!(decoder.total_in(), 4);
    }

    #[test]
    fn test_skip_then_take() {
        let data = [0x1F, b'h', b'e', b'l', b'l', b'o', 0xED, 0xF9];
        let mut decoder = LzssDecoder::new(&data, LzssConfig::STANDARD, Some(17)).unwrap();
        decoder.discard(6).unwrap();
        assert_eq!(decoder.take(5).unwrap(), b"hello");
        assert_eq!(decoder.total_out(), 11);
    }

    #[test]
    fn test_failure_is_sticky() {
        let data = [0x01, 0x41, 0xEE];
        let mut decoder = LzssDecoder::new(&data, LzssConfig::STANDARD, None).unwrap();
        let mut buffer = [0u8; 16];
        assert!(decoder.decompress(&mut buffer).is_err());
        assert_eq!(decoder.phase(), DecoderPhase::Failed);
        assert!(matches!(
            decoder.decompress(&mut buffer),
            Err(CodecError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = LzssConfig {
            frame_size: 1000,
            ..LzssConfig::STANDARD
        };
        assert!(LzssDecoder::new(&[], config, None).is_err());
    }
}
