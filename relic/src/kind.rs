//! Codec selection.

use relic_aplib::GammaLzConfig;
use relic_huffman::HuffmanTable;
use relic_lzss::LzssConfig;

/// Decoders an archive entry can be stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecKind {
    /// No compression.
    Stored,
    /// Flag-byte LZSS.
    Lzss(LzssConfig),
    /// Huffman stream that starts with its own tree.
    Huffman,
    /// Huffman stream coded with a table the container supplies.
    HuffmanTable(HuffmanTable),
    /// Gamma-coded LZ (aPLib style).
    GammaLz(GammaLzConfig),
}

impl CodecKind {
    /// Short codec name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Lzss(_) => "lzss",
            Self::Huffman | Self::HuffmanTable(_) => "huffman",
            Self::GammaLz(_) => "gamma-lz",
        }
    }

    /// Check if decoding needs the decoded length up front.
    pub fn requires_length(&self) -> bool {
        matches!(self, Self::Huffman | Self::HuffmanTable(_))
    }

    /// Check if [`compress`](crate::compress) can produce this codec.
    pub fn can_compress(&self) -> bool {
        matches!(self, Self::Lzss(_))
    }
}

impl std::fmt::Display for CodecKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stored => write!(f, "Stored"),
            Self::Lzss(config) => write!(f, "LZSS (fill 0x{:02X})", config.frame_fill),
            Self::Huffman => write!(f, "Huffman"),
            Self::HuffmanTable(_) => write!(f, "Huffman (external table)"),
            Self::GammaLz(_) => write!(f, "Gamma-LZ"),
        }
    }
}

/// Encoders available to [`compress`](crate::compress).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionKind {
    /// Flag-byte LZSS.
    Lzss(LzssConfig),
}

impl From<CompressionKind> for CodecKind {
    fn from(kind: CompressionKind) -> Self {
        match kind {
            CompressionKind::Lzss(config) => Self::Lzss(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(CodecKind::Stored.name(), "stored");
        assert_eq!(CodecKind::Lzss(LzssConfig::STANDARD).name(), "lzss");
        assert_eq!(CodecKind::GammaLz(GammaLzConfig::DEFAULT).name(), "gamma-lz");
    }

    #[test]
    fn test_requires_length() {
        assert!(CodecKind::Huffman.requires_length());
        assert!(!CodecKind::Lzss(LzssConfig::STANDARD).requires_length());
        assert!(!CodecKind::Stored.requires_length());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            CodecKind::Lzss(LzssConfig::SPACE_FILLED).to_string(),
            "LZSS (fill 0x20)"
        );
        assert_eq!(CodecKind::Huffman.to_string(), "Huffman");
    }

    #[test]
    fn test_compression_kind() {
        let kind = CodecKind::from(CompressionKind::Lzss(LzssConfig::STANDARD));
        assert!(kind.can_compress());
        assert!(!CodecKind::Huffman.can_compress());
    }
}
