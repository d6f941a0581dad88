//! Resumable gamma-LZ decoder.
//!
//! Stream layout: the first byte is a raw literal. After that every token
//! starts with control bits, read MSB first from tag bytes interleaved with
//! the raw bytes:
//!
//! ```text
//! 0    literal: one raw byte
//! 111  short reference: 4-bit distance, copy 1 byte (distance 0 = literal 0x00)
//! 110  byte reference: raw byte v, distance v >> 1, length 2 + (v & 1);
//!      distance 0 ends the stream
//! 10   gamma reference: gamma g, then either the last distance again
//!      (g == 2 right after a literal) or a new distance
//!      ((g - 3 or g - 2) << 8 | raw byte), then a gamma length
//! ```
//!
//! New gamma distances get a longer length the further they reach:
//! +1 from 1280, +1 more from 32000, and +2 below 128.

use crate::config::GammaLzConfig;
use log::{debug, trace};
use relic_core::bits::MsbBitReader;
use relic_core::error::{CodecError, Result};
use relic_core::traits::{DecompressStatus, Decompressor};
use relic_core::window::HistoryWindow;

/// Decoder phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderPhase {
    /// The leading raw literal has not been read yet.
    FirstLiteral,
    /// Next thing in the stream is a token's control bits.
    ReadToken,
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

/// What one token asks the decoder to produce.
enum Token {
    Literal(u8),
    Copy { distance: usize, length: usize },
    End,
}

/// Streaming gamma-LZ decoder over a fully-buffered compressed block.
#[derive(Debug)]
pub struct GammaLzDecoder<'a> {
    reader: MsbBitReader<'a>,
    window: HistoryWindow,
    /// Distance of the last new back-reference.
    last_offset: Option<usize>,
    /// Whether the previous token was a back-reference.
    after_match: bool,
    phase: DecoderPhase,
    pending: Option<PendingCopy>,
    expected_len: Option<u64>,
    total_out: u64,
    failure: Option<CodecError>,
}

impl<'a> GammaLzDecoder<'a> {
    /// Create a decoder.
    ///
    /// With `expected_len` set, decoding stops after that many bytes and
    /// an end marker reached earlier is [`CodecError::TruncatedInput`].
    /// Without it, decoding runs to the end marker, or to the end of input
    /// if that falls between tokens.
    pub fn new(data: &'a [u8], config: GammaLzConfig, expected_len: Option<u64>) -> Result<Self> {
        config.validate()?;
        debug!(
            "gamma-LZ decode: {} input bytes, expected {:?}",
            data.len(),
            expected_len
        );

        Ok(Self {
            reader: MsbBitReader::new(data),
            window: HistoryWindow::new(config.window_size),
            last_offset: None,
            after_match: false,
            phase: DecoderPhase::FirstLiteral,
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

    #[inline]
    fn budget(&self, space: usize) -> usize {
        match self.expected_len {
            Some(len) => (len - self.total_out).min(space as u64) as usize,
            None => space,
        }
    }

    /// The stream ended, by marker or by running out between tokens.
    fn finish(&mut self) -> Result<()> {
        if self.expected_len.is_some() {
            return Err(CodecError::truncated(
                self.reader.byte_position() as u64,
                self.total_out,
            ));
        }
        self.phase = DecoderPhase::Done;
        Ok(())
    }

    fn read_gamma(&mut self) -> Result<usize> {
        let mut value: usize = 1;
        loop {
            if value > u32::MAX as usize {
                return Err(CodecError::out_of_range(value as u64, self.window.len()));
            }
            value = (value << 1) | usize::from(self.reader.read_bit()?);
            if !self.reader.read_bit()? {
                return Ok(value);
            }
        }
    }

    fn read_token(&mut self) -> Result<Token> {
        if !self.reader.read_bit()? {
            self.after_match = false;
            return Ok(Token::Literal(self.reader.read_byte()?));
        }

        if self.reader.read_bit()? {
            if self.reader.read_bit()? {
                let distance = self.reader.read_bits(4)? as usize;
                self.after_match = false;
                if distance == 0 {
                    return Ok(Token::Literal(0));
                }
                return Ok(Token::Copy {
                    distance,
                    length: 1,
                });
            }

            let value = self.reader.read_byte()?;
            let distance = (value >> 1) as usize;
            if distance == 0 {
                return Ok(Token::End);
            }
            self.last_offset = Some(distance);
            self.after_match = true;
            return Ok(Token::Copy {
                distance,
                length: 2 + (value & 1) as usize,
            });
        }

        let selector = self.read_gamma()?;
        let token = if !self.after_match && selector == 2 {
            let distance = self
                .last_offset
                .ok_or_else(|| CodecError::out_of_range(u64::from(u32::MAX), self.window.len()))?;
            let length = self.read_gamma()?;
            Token::Copy { distance, length }
        } else {
            let high = selector - if self.after_match { 2 } else { 3 };
            let distance = (high << 8) | self.reader.read_byte()? as usize;
            let mut length = self.read_gamma()?;
            if distance >= 32000 {
                length += 1;
            }
            if distance >= 1280 {
                length += 1;
            }
            if distance < 128 {
                length += 2;
            }
            self.last_offset = Some(distance);
            Token::Copy { distance, length }
        };
        self.after_match = true;
        Ok(token)
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

            // Running dry here is a clean end for streams of unknown length.
            if self.reader.is_exhausted() {
                self.finish()?;
                continue;
            }

            let token = match self.phase {
                DecoderPhase::FirstLiteral => {
                    self.phase = DecoderPhase::ReadToken;
                    Token::Literal(self.reader.read_byte()?)
                }
                DecoderPhase::ReadToken => self
                    .read_token()
                    .map_err(|err| err.with_produced(self.total_out))?,
                DecoderPhase::Done | DecoderPhase::Failed => {
                    unreachable!("terminal phases are handled before dispatch")
                }
            };

            match token {
                Token::Literal(byte) => {
                    self.window.push(byte);
                    output[written] = byte;
                    written += 1;
                    self.total_out += 1;
                }
                Token::Copy { distance, length } => {
                    trace!("copy dist={distance} len={length}");
                    self.pending = Some(PendingCopy {
                        distance,
                        remaining: length,
                    });
                }
                Token::End => {
                    trace!("end marker after {} bytes", self.total_out);
                    self.finish()?;
                }
            }
        }
    }
}

impl Decompressor for GammaLzDecoder<'_> {
    fn decompress(&mut self, output: &mut [u8]) -> Result<(usize, DecompressStatus)> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let was_done = self.phase == DecoderPhase::Done;
        match self.run(output) {
            Ok((written, DecompressStatus::Done)) => {
                if !was_done {
                    debug!(
                        "gamma-LZ decode done: {} bytes from {} input bytes",
                        self.total_out,
                        self.reader.byte_position()
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
        self.reader.byte_position() as u64
    }

    fn total_out(&self) -> u64 {
        self.total_out
    }
}

/// Decode a complete gamma-LZ block.
pub fn decode_gamma_lz(
    data: &[u8],
    config: GammaLzConfig,
    expected_len: Option<u64>,
) -> Result<Vec<u8>> {
    GammaLzDecoder::new(data, config, expected_len)?.decompress_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relic_core::bits::MsbBitWriter;

    /// "abc", gamma reference (distance 3, length 6), end marker.
    const ABC: [u8; 7] = [0x61, 0x29, 0x62, 0x63, 0x03, 0x30, 0x00];

    /// Short references: "Z", distance-0 literal, distance 2, distance 1.
    const SHORT: [u8; 5] = [0x5A, 0xE1, 0xCB, 0x8E, 0x00];

    /// Byte references (distance 2 length 3, distance 1 length 2).
    const BYTE_REFS: [u8; 7] = [0x61, 0x6D, 0x62, 0x05, 0x02, 0x80, 0x00];

    /// Gamma reference, literal, then a repeat of the last distance.
    const REPEAT: [u8; 9] = [0x61, 0x28, 0x62, 0x63, 0x03, 0x43, 0x58, 0x60, 0x00];

    fn decode(data: &[u8], expected_len: Option<u64>) -> Result<Vec<u8>> {
        decode_gamma_lz(data, GammaLzConfig::DEFAULT, expected_len)
    }

    /// Writes gamma-LZ tokens for hand-built streams.
    struct StreamBuilder(MsbBitWriter);

    impl StreamBuilder {
        fn new(first: u8) -> Self {
            let mut writer = MsbBitWriter::new();
            writer.push_byte(first);
            Self(writer)
        }

        fn gamma(&mut self, value: u32) {
            let width = 32 - value.leading_zeros();
            for shift in (0..width - 1).rev() {
                self.0.write_bit((value >> shift) & 1 != 0);
                self.0.write_bit(shift > 0);
            }
        }

        fn literal(mut self, byte: u8) -> Self {
            self.0.write_bit(false);
            self.0.push_byte(byte);
            self
        }

        fn byte_ref(mut self, value: u8) -> Self {
            self.0.write_bits(0b110, 3);
            self.0.push_byte(value);
            self
        }

        fn gamma_ref(mut self, selector: u32, low: u8, length: u32) -> Self {
            self.0.write_bits(0b10, 2);
            self.gamma(selector);
            self.0.push_byte(low);
            self.gamma(length);
            self
        }

        fn repeat_ref(mut self, length: u32) -> Self {
            self.0.write_bits(0b10, 2);
            self.gamma(2);
            self.gamma(length);
            self
        }

        fn end(self) -> Vec<u8> {
            self.byte_ref(0).0.into_vec()
        }
    }

    #[test]
    fn test_builder_matches_fixture() {
        let built = StreamBuilder::new(b'a')
            .literal(b'b')
            .literal(b'c')
            .gamma_ref(3, 3, 4)
            .end();
        assert_eq!(built, ABC);
    }

    #[test]
    fn test_gamma_reference() {
        assert_eq!(decode(&ABC, None).unwrap(), b"abcabcabc");
        assert_eq!(decode(&ABC, Some(9)).unwrap(), b"abcabcabc");
        assert_eq!(decode(&ABC, Some(5)).unwrap(), b"abcab");
    }

    #[test]
    fn test_terminator_with_unfilled_destination() {
        assert!(matches!(
            decode(&ABC, Some(10)),
            Err(CodecError::TruncatedInput { produced: 9, .. })
        ));
    }

    #[test]
    fn test_distance_zero_literal_escape() {
        assert_eq!(decode(&SHORT, None).unwrap(), b"Z\x00ZZ");
    }

    #[test]
    fn test_byte_references() {
        assert_eq!(decode(&BYTE_REFS, None).unwrap(), b"ababaaa");
    }

    #[test]
    fn test_repeat_last_distance() {
        assert_eq!(decode(&REPEAT, None).unwrap(), b"abcabcaXcaXca");
    }

    #[test]
    fn test_distance_corrections() {
        // 300 literals, then distance 290 (selector 4, low byte 34) with
        // gamma length 3: no correction between 128 and 1280.
        let literals: Vec<u8> = (0..300u32).map(|i| (i * 7 + 1) as u8).collect();
        let mut builder = StreamBuilder::new(literals[0]);
        for &byte in &literals[1..] {
            builder = builder.literal(byte);
        }
        let stream = builder.gamma_ref(4, 34, 3).end();

        let output = decode(&stream, None).unwrap();
        assert_eq!(output.len(), 303);
        assert_eq!(&output[300..], &literals[10..13]);

        // Distance 1300 (selector 8, low byte 20) gets one extra byte.
        let literals: Vec<u8> = (0..1400u32).map(|i| (i % 251) as u8).collect();
        let mut builder = StreamBuilder::new(literals[0]);
        for &byte in &literals[1..] {
            builder = builder.literal(byte);
        }
        let stream = builder.gamma_ref(8, 20, 2).end();

        let output = decode(&stream, None).unwrap();
        assert_eq!(output.len(), 1403);
        assert_eq!(&output[1400..], &literals[100..103]);
    }

    #[test]
    fn test_far_distance_correction() {
        // Distance 32768 (selector 131, low byte 0) with gamma length 2
        // gets both the 1280 and the 32000 increments.
        let literals: Vec<u8> = (0..33000u32).map(|i| (i % 253) as u8).collect();
        let mut builder = StreamBuilder::new(literals[0]);
        for &byte in &literals[1..] {
            builder = builder.literal(byte);
        }
        let stream = builder.gamma_ref(131, 0, 2).end();

        let output = decode(&stream, None).unwrap();
        assert_eq!(output.len(), 33004);
        assert_eq!(&output[33000..], &literals[232..236]);
    }

    #[test]
    fn test_distance_out_of_range() {
        // Distance 5 with one byte of history.
        let stream = StreamBuilder::new(b'a').byte_ref(5 << 1).end();
        assert!(matches!(
            decode(&stream, None),
            Err(CodecError::BackReferenceOutOfRange {
                distance: 5,
                available: 1
            })
        ));
    }

    #[test]
    fn test_repeat_without_previous_distance() {
        let stream = StreamBuilder::new(b'a').literal(b'b').repeat_ref(2).end();
        assert!(matches!(
            decode(&stream, None),
            Err(CodecError::BackReferenceOutOfRange { .. })
        ));
    }

    #[test]
    fn test_gamma_distance_zero() {
        // After a match, selector 2 with low byte 0 decodes distance 0.
        let stream = StreamBuilder::new(b'a')
            .literal(b'b')
            .byte_ref(5)
            .gamma_ref(2, 0, 2)
            .end();
        assert!(matches!(
            decode(&stream, None),
            Err(CodecError::BackReferenceOutOfRange { distance: 0, .. })
        ));
    }

    #[test]
    fn test_window_bound() {
        let literals: Vec<u8> = (0..40u8).collect();
        let mut builder = StreamBuilder::new(literals[0]);
        for &byte in &literals[1..] {
            builder = builder.literal(byte);
        }
        let stream = builder.gamma_ref(3, 33, 2).end();

        assert!(decode(&stream, None).is_ok());
        assert!(matches!(
            decode_gamma_lz(&stream, GammaLzConfig::new(32), None),
            Err(CodecError::BackReferenceOutOfRange {
                distance: 33,
                available: 32
            })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(decode(&[], None).unwrap().is_empty());
        assert!(decode(&[], Some(0)).unwrap().is_empty());
        assert!(matches!(
            decode(&[], Some(1)),
            Err(CodecError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_truncated_mid_token() {
        // Gamma reference cut off before its low byte.
        let stream = &ABC[..4];
        assert!(matches!(
            decode(stream, None),
            Err(CodecError::TruncatedInput { produced: 3, .. })
        ));
    }

    #[test]
    fn test_resumable_output() {
        let mut decoder = GammaLzDecoder::new(&REPEAT, GammaLzConfig::DEFAULT, None).unwrap();
        let mut buffer = [0u8; 2];
        let mut output = Vec::new();
        loop {
            let (produced, status) = decoder.decompress(&mut buffer).unwrap();
            output.extend_from_slice(&buffer[..produced]);
            if status == DecompressStatus::Done {
                break;
            }
        }
        assert_eq!(output, b"abcabcaXcaXca");
        assert_eq!(decoder.total_in(), REPEAT.len() as u64);
    }

    #[test]
    fn test_skip_then_take() {
        let mut decoder = GammaLzDecoder::new(&REPEAT, GammaLzConfig::DEFAULT, None).unwrap();
        decoder.discard(8).unwrap();
        assert_eq!(decoder.take(5).unwrap(), b"caXca");
        assert!(decoder.take(1).is_err());
    }
}
