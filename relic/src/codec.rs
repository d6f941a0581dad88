//! One-shot entry points.

use crate::decoder::open_decoder;
use crate::kind::{CodecKind, CompressionKind};
use log::{debug, trace};
use relic_cipher::KeyedCipher;
use relic_core::error::{CodecError, Result};
use relic_core::traits::{DecodeLimits, Decompressor};
use relic_lzss::encode_lzss;

/// Decode a whole entry.
///
/// With `expected_len` the output is exactly that long or the call fails;
/// without it, decoding runs to the codec's own end of stream.
pub fn decompress(kind: &CodecKind, source: &[u8], expected_len: Option<u64>) -> Result<Vec<u8>> {
    decompress_with_limits(kind, source, expected_len, DecodeLimits::UNLIMITED)
}

/// Decode a whole entry, failing with [`CodecError::OutputOverflow`] once
/// the output would exceed `limits`.
pub fn decompress_with_limits(
    kind: &CodecKind,
    source: &[u8],
    expected_len: Option<u64>,
    limits: DecodeLimits,
) -> Result<Vec<u8>> {
    if let Some(len) = expected_len {
        limits.check(len)?;
    }

    let mut decoder = open_decoder(kind, source, expected_len)?;
    let output = decoder.decompress_all_limited(&limits)?;
    debug!(
        "{}: {} -> {} bytes",
        kind,
        decoder.total_in(),
        output.len()
    );
    Ok(output)
}

/// Decode `take` bytes starting `skip` bytes into the decoded stream.
///
/// The skipped region is decoded (back-references need it) but never
/// returned. A stream shorter than `skip + take` is
/// [`CodecError::TruncatedInput`].
pub fn decompress_skip(kind: &CodecKind, source: &[u8], skip: u64, take: u64) -> Result<Vec<u8>> {
    let end = skip
        .checked_add(take)
        .ok_or_else(|| CodecError::overflow(u64::MAX))?;

    let mut decoder = open_decoder(kind, source, Some(end))?;
    decoder.discard(skip)?;
    decoder.take(take)
}

/// Compress `source`.
///
/// Every input compresses; incompressible data grows by one flag byte per
/// eight literals. Only an invalid configuration fails.
pub fn compress(kind: CompressionKind, source: &[u8]) -> Result<Vec<u8>> {
    match kind {
        CompressionKind::Lzss(config) => encode_lzss(source, config),
    }
}

/// Remove a cipher layer in place.
pub fn apply_cipher(cipher: &KeyedCipher, buffer: &mut [u8]) {
    trace!("Applying {:?} to {} bytes", cipher, buffer.len());
    cipher.apply(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use relic_lzss::LzssConfig;

    #[test]
    fn test_limit_rejects_declared_length() {
        let err = decompress_with_limits(
            &CodecKind::Stored,
            b"0123456789",
            Some(10),
            DecodeLimits::with_max_output(4),
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::OutputOverflow { limit: 4 }));
    }

    #[test]
    fn test_skip_overflow() {
        let err = decompress_skip(&CodecKind::Stored, b"abc", u64::MAX, 1).unwrap_err();
        assert!(matches!(err, CodecError::OutputOverflow { .. }));
    }

    #[test]
    fn test_compress_invalid_config() {
        let config = LzssConfig {
            frame_size: 4095,
            ..LzssConfig::STANDARD
        };
        assert!(compress(CompressionKind::Lzss(config), b"abc").is_err());
    }

    #[test]
    fn test_apply_cipher() {
        let mut buf = *b"eee";
        apply_cipher(&KeyedCipher::SilkyName, &mut buf);
        assert_eq!(&buf, b"abc");
    }
}
