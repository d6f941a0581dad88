//! Resumable Huffman decoder.

use crate::table::HuffmanTable;
use log::debug;
use relic_core::bits::MsbBitReader;
use relic_core::error::{CodecError, Result};
use relic_core::traits::{DecompressStatus, Decompressor};

/// Streaming Huffman decoder over a fully-buffered packed block.
///
/// The packed stream carries no end marker, so the decoded length must be
/// known up front. Decoding stops exactly when it is reached; leftover
/// bits are ignored.
#[derive(Debug)]
pub struct HuffmanDecoder<'a> {
    reader: MsbBitReader<'a>,
    /// `None` until the embedded tree has been read.
    table: Option<HuffmanTable>,
    expected_len: u64,
    total_out: u64,
    failure: Option<CodecError>,
}

impl<'a> HuffmanDecoder<'a> {
    /// Create a decoder for a stream that starts with its own tree.
    ///
    /// The tree is read on the first call to
    /// [`decompress`](Decompressor::decompress).
    pub fn embedded(data: &'a [u8], expected_len: Option<u64>) -> Result<Self> {
        Self::build(data, None, expected_len)
    }

    /// Create a decoder using a table supplied by the container.
    pub fn with_table(
        data: &'a [u8],
        table: HuffmanTable,
        expected_len: Option<u64>,
    ) -> Result<Self> {
        Self::build(data, Some(table), expected_len)
    }

    fn build(
        data: &'a [u8],
        table: Option<HuffmanTable>,
        expected_len: Option<u64>,
    ) -> Result<Self> {
        let expected_len = match expected_len {
            Some(len) => len,
            // Nothing to decode either way.
            None if data.is_empty() => 0,
            None => return Err(CodecError::length_required("Huffman")),
        };
        debug!(
            "Huffman decode: {} input bytes, expected {}, {} table",
            data.len(),
            expected_len,
            if table.is_some() { "supplied" } else { "embedded" }
        );

        Ok(Self {
            reader: MsbBitReader::new(data),
            table,
            expected_len,
            total_out: 0,
            failure: None,
        })
    }

    /// The code table, once known.
    pub fn table(&self) -> Option<&HuffmanTable> {
        self.table.as_ref()
    }

    fn run(&mut self, output: &mut [u8]) -> Result<(usize, DecompressStatus)> {
        let wanted = (self.expected_len - self.total_out).min(output.len() as u64) as usize;
        if wanted > 0 && self.table.is_none() {
            self.table = Some(HuffmanTable::read_embedded(&mut self.reader)?);
        }

        if let Some(table) = &self.table {
            for slot in &mut output[..wanted] {
                *slot = table
                    .decode_symbol(&mut self.reader)
                    .map_err(|err| err.with_produced(self.total_out))?;
                self.total_out += 1;
            }
        }

        if self.total_out == self.expected_len {
            Ok((wanted, DecompressStatus::Done))
        } else {
            Ok((wanted, DecompressStatus::NeedsOutput))
        }
    }
}

impl Decompressor for HuffmanDecoder<'_> {
    fn decompress(&mut self, output: &mut [u8]) -> Result<(usize, DecompressStatus)> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let was_done = self.is_finished();
        match self.run(output) {
            Ok((written, DecompressStatus::Done)) => {
                if !was_done {
                    debug!(
                        "Huffman decode done: {} bytes from {} input bytes",
                        self.total_out,
                        self.reader.byte_position()
                    );
                }
                Ok((written, DecompressStatus::Done))
            }
            Ok(progress) => Ok(progress),
            Err(err) => {
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.total_out == self.expected_len
    }

    fn total_in(&self) -> u64 {
        self.reader.byte_position() as u64
    }

    fn total_out(&self) -> u64 {
        self.total_out
    }
}

/// Decode a stream that begins with an embedded tree.
pub fn decode_huffman(data: &[u8], expected_len: u64) -> Result<Vec<u8>> {
    HuffmanDecoder::embedded(data, Some(expected_len))?.decompress_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Embedded tree A=0, B=10, C=11 followed by "ABCA".
    const ABCA: [u8; 5] = [0x90, 0x64, 0x22, 0x1A, 0xC0];

    /// Embedded tree A=0, B=100, R=101, C=110, D=111 followed by "ABRACADABRA".
    const ABRACADABRA: [u8; 9] = [0x90, 0x72, 0x11, 0x4A, 0x43, 0x22, 0x25, 0x67, 0x4A];

    #[test]
    fn test_golden_embedded() {
        assert_eq!(decode_huffman(&ABCA, 4).unwrap(), b"ABCA");
        assert_eq!(decode_huffman(&ABRACADABRA, 11).unwrap(), b"ABRACADABRA");
    }

    #[test]
    fn test_stops_at_expected_len() {
        assert_eq!(decode_huffman(&ABRACADABRA, 4).unwrap(), b"ABRA");
    }

    #[test]
    fn test_truncated() {
        // The five padding bits decode as "AAAAA"; the tenth symbol has no bits.
        assert_eq!(decode_huffman(&ABCA, 9).unwrap(), b"ABCAAAAAA");
        let result = decode_huffman(&ABCA, 10);
        assert!(matches!(
            result,
            Err(CodecError::TruncatedInput {
                offset: 5,
                produced: 9
            })
        ));
    }

    #[test]
    fn test_length_required() {
        assert!(matches!(
            HuffmanDecoder::embedded(&ABCA, None),
            Err(CodecError::LengthRequired { codec: "Huffman" })
        ));
    }

    #[test]
    fn test_empty_input() {
        let mut decoder = HuffmanDecoder::embedded(&[], None).unwrap();
        assert!(decoder.decompress_all().unwrap().is_empty());

        assert!(decode_huffman(&[], 0).unwrap().is_empty());
        assert!(matches!(
            decode_huffman(&[], 1),
            Err(CodecError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_supplied_table() {
        let mut lengths = [0u8; 256];
        lengths[b'A' as usize] = 1;
        for sym in [b'B', b'C', b'D', b'R'] {
            lengths[sym as usize] = 3;
        }
        let table = HuffmanTable::from_code_lengths(&lengths).unwrap();
        let data = [0x4E, 0xAC, 0x9C];

        let mut decoder = HuffmanDecoder::with_table(&data, table, Some(11)).unwrap();
        assert_eq!(decoder.decompress_all().unwrap(), b"ABRACADABRA");
        assert!(decoder.is_finished());
        assert_eq!(decoder.total_in(), 3);
    }

    #[test]
    fn test_skip_then_take() {
        let mut decoder = HuffmanDecoder::embedded(&ABRACADABRA, Some(11)).unwrap();
        decoder.discard(7).unwrap();
        assert_eq!(decoder.take(4).unwrap(), b"ABRA");
        assert!(decoder.take(1).is_err());
    }

    #[test]
    fn test_small_buffers() {
        let mut decoder = HuffmanDecoder::embedded(&ABRACADABRA, Some(11)).unwrap();
        let mut buffer = [0u8; 2];
        let mut output = Vec::new();
        loop {
            let (produced, status) = decoder.decompress(&mut buffer).unwrap();
            output.extend_from_slice(&buffer[..produced]);
            if status == DecompressStatus::Done {
                break;
            }
        }
        assert_eq!(output, b"ABRACADABRA");
    }
}
