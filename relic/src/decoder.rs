//! Codec dispatch.

use crate::kind::CodecKind;
use log::debug;
use relic_aplib::GammaLzDecoder;
use relic_core::error::Result;
use relic_core::traits::{DecompressStatus, Decompressor, StoredDecoder};
use relic_huffman::HuffmanDecoder;
use relic_lzss::LzssDecoder;

/// Any of the Relic decoders behind one type.
#[derive(Debug)]
pub enum AnyDecoder<'a> {
    /// Pass-through.
    Stored(StoredDecoder<'a>),
    /// Flag-byte LZSS.
    Lzss(LzssDecoder<'a>),
    /// Huffman, embedded or supplied table.
    Huffman(HuffmanDecoder<'a>),
    /// Gamma-coded LZ.
    GammaLz(GammaLzDecoder<'a>),
}

/// Create a decoder for `source`.
///
/// Fails only when the codec cannot start: an invalid configuration, or a
/// Huffman stream without `expected_len`.
pub fn open_decoder<'a>(
    kind: &CodecKind,
    source: &'a [u8],
    expected_len: Option<u64>,
) -> Result<AnyDecoder<'a>> {
    debug!(
        "Opening {} decoder over {} bytes (expected {:?})",
        kind,
        source.len(),
        expected_len
    );

    let decoder = match kind {
        CodecKind::Stored => AnyDecoder::Stored(StoredDecoder::new(source, expected_len)),
        CodecKind::Lzss(config) => {
            AnyDecoder::Lzss(LzssDecoder::new(source, *config, expected_len)?)
        }
        CodecKind::Huffman => AnyDecoder::Huffman(HuffmanDecoder::embedded(source, expected_len)?),
        CodecKind::HuffmanTable(table) => AnyDecoder::Huffman(HuffmanDecoder::with_table(
            source,
            table.clone(),
            expected_len,
        )?),
        CodecKind::GammaLz(config) => {
            AnyDecoder::GammaLz(GammaLzDecoder::new(source, *config, expected_len)?)
        }
    };
    Ok(decoder)
}

impl AnyDecoder<'_> {
    fn inner(&self) -> &dyn Decompressor {
        match self {
            Self::Stored(d) => d,
            Self::Lzss(d) => d,
            Self::Huffman(d) => d,
            Self::GammaLz(d) => d,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Decompressor {
        match self {
            Self::Stored(d) => d,
            Self::Lzss(d) => d,
            Self::Huffman(d) => d,
            Self::GammaLz(d) => d,
        }
    }
}

impl Decompressor for AnyDecoder<'_> {
    fn decompress(&mut self, output: &mut [u8]) -> Result<(usize, DecompressStatus)> {
        self.inner_mut().decompress(output)
    }

    fn is_finished(&self) -> bool {
        self.inner().is_finished()
    }

    fn total_in(&self) -> u64 {
        self.inner().total_in()
    }

    fn total_out(&self) -> u64 {
        self.inner().total_out()
    }
}
