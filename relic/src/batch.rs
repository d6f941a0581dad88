//! Parallel decoding of independent entries (requires the `parallel` feature).

use crate::codec::decompress;
use crate::kind::CodecKind;
use log::warn;
use rayon::prelude::*;
use relic_core::error::Result;

/// One entry to decode.
#[derive(Debug, Clone)]
pub struct DecodeJob<'a> {
    /// Codec the entry is stored with.
    pub kind: CodecKind,
    /// Compressed bytes.
    pub source: &'a [u8],
    /// Decoded length recorded in the index, if any.
    pub expected_len: Option<u64>,
}

impl<'a> DecodeJob<'a> {
    /// Create a job.
    pub fn new(kind: CodecKind, source: &'a [u8], expected_len: Option<u64>) -> Self {
        Self {
            kind,
            source,
            expected_len,
        }
    }
}

/// Decode every job on the rayon thread pool.
///
/// Results come back in job order. A failed entry does not affect the
/// others.
pub fn decompress_batch(jobs: &[DecodeJob<'_>]) -> Vec<Result<Vec<u8>>> {
    jobs.par_iter()
        .enumerate()
        .map(|(index, job)| {
            let result = decompress(&job.kind, job.source, job.expected_len);
            if let Err(err) = &result {
                warn!("Entry {} ({}) failed: {}", index, job.kind, err);
            }
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relic_core::error::CodecError;
    use relic_lzss::LzssConfig;

    #[test]
    fn test_batch_isolates_failures() {
        let packed = [0x01, 0x41, 0xEE, 0xF6];
        let jobs = vec![
            DecodeJob::new(CodecKind::Lzss(LzssConfig::STANDARD), &packed, Some(10)),
            DecodeJob::new(CodecKind::Stored, b"abc", Some(5)),
            DecodeJob::new(CodecKind::Stored, b"xyz", None),
        ];

        let results = decompress_batch(&jobs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap(), b"AAAAAAAAAA");
        assert!(matches!(results[1], Err(CodecError::TruncatedInput { .. })));
        assert_eq!(results[2].as_ref().unwrap(), b"xyz");
    }

    #[test]
    fn test_batch_empty() {
        assert!(decompress_batch(&[]).is_empty());
    }
}
