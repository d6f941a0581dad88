//! The resumable decoder abstraction shared by every codec.
//!
//! A [`Decompressor`] owns its compressed input (through a
//! [`ByteCursor`](crate::cursor::ByteCursor)) together with all decoding
//! state, and produces decoded bytes on demand. Callers pump
//! [`Decompressor::decompress`] with output buffers until it reports
//! [`DecompressStatus::Done`]. Because the whole input is available up
//! front, a decoder never waits for more input: running dry before the
//! stream is complete is an error.

use crate::error::{CodecError, Result};

/// Chunk size used by the provided pumping helpers.
const PUMP_CHUNK: usize = 32768;

/// Upper bound on the capacity reserved up front for a declared length.
const MAX_PREALLOC: u64 = 1 << 24;

/// Status of a decode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressStatus {
    /// The output buffer was filled; more decoded bytes may follow.
    NeedsOutput,
    /// The stream is complete. No further bytes will be produced.
    Done,
}

/// Caller-imposed bounds on a single decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeLimits {
    /// Maximum number of decoded bytes, or `None` for no limit.
    pub max_output: Option<u64>,
}

impl DecodeLimits {
    /// No limits.
    pub const UNLIMITED: Self = Self { max_output: None };

    /// Limit decoded output to `max_output` bytes.
    pub const fn with_max_output(max_output: u64) -> Self {
        Self {
            max_output: Some(max_output),
        }
    }

    /// Fail with [`CodecError::OutputOverflow`] if `produced` exceeds the limit.
    pub fn check(&self, produced: u64) -> Result<()> {
        match self.max_output {
            Some(limit) if produced > limit => Err(CodecError::overflow(limit)),
            _ => Ok(()),
        }
    }
}

/// A resumable decoder over a fully-buffered compressed block.
///
/// Implementations must make progress on every call with a non-empty
/// output buffer: a call either fills the buffer completely and returns
/// [`DecompressStatus::NeedsOutput`], or returns [`DecompressStatus::Done`]
/// with however many bytes remained. Calls after `Done` return `(0, Done)`.
pub trait Decompressor {
    /// Decode into `output`.
    ///
    /// # Returns
    ///
    /// A tuple of (bytes written to output, status)
    fn decompress(&mut self, output: &mut [u8]) -> Result<(usize, DecompressStatus)>;

    /// Check if the decoder has finished.
    fn is_finished(&self) -> bool;

    /// Total compressed bytes consumed so far.
    fn total_in(&self) -> u64;

    /// Total decoded bytes produced so far (including discarded ones).
    fn total_out(&self) -> u64;

    /// Decode and drop the next `count` bytes.
    ///
    /// History still accumulates while bytes are discarded, so later
    /// back-references into the skipped region resolve normally. A stream
    /// that ends before `count` bytes is [`CodecError::TruncatedInput`].
    fn discard(&mut self, count: u64) -> Result<()> {
        let mut scratch = vec![0u8; PUMP_CHUNK.min(usize::try_from(count).unwrap_or(usize::MAX))];
        let mut remaining = count;

        while remaining > 0 {
            let chunk = remaining.min(scratch.len() as u64) as usize;
            let (produced, status) = self.decompress(&mut scratch[..chunk])?;
            remaining -= produced as u64;
            if status == DecompressStatus::Done && remaining > 0 {
                return Err(CodecError::truncated(self.total_in(), self.total_out()));
            }
        }

        Ok(())
    }

    /// Decode exactly the next `count` bytes.
    fn take(&mut self, count: u64) -> Result<Vec<u8>> {
        let mut output = vec![0u8; count.min(MAX_PREALLOC) as usize];
        let mut filled = 0usize;

        while (filled as u64) < count {
            if filled == output.len() {
                let grow = (count - filled as u64).min(MAX_PREALLOC) as usize;
                output.resize(filled + grow, 0);
            }
            let (produced, status) = self.decompress(&mut output[filled..])?;
            filled += produced;
            if status == DecompressStatus::Done && (filled as u64) < count {
                return Err(CodecError::truncated(self.total_in(), self.total_out()));
            }
        }

        output.truncate(filled);
        Ok(output)
    }

    /// Decode everything that remains.
    fn decompress_all(&mut self) -> Result<Vec<u8>> {
        self.decompress_all_limited(&DecodeLimits::UNLIMITED)
    }

    /// Decode everything that remains, enforcing `limits`.
    fn decompress_all_limited(&mut self, limits: &DecodeLimits) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let mut buffer = vec![0u8; PUMP_CHUNK];

        loop {
            let (produced, status) = self.decompress(&mut buffer)?;
            output.extend_from_slice(&buffer[..produced]);
            limits.check(self.total_out())?;

            if status == DecompressStatus::Done {
                break;
            }
        }

        Ok(output)
    }
}

impl<D: Decompressor + ?Sized> Decompressor for Box<D> {
    fn decompress(&mut self, output: &mut [u8]) -> Result<(usize, DecompressStatus)> {
        (**self).decompress(output)
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }

    fn total_in(&self) -> u64 {
        (**self).total_in()
    }

    fn total_out(&self) -> u64 {
        (**self).total_out()
    }
}

/// Pass-through "decoder" for entries stored without compression.
#[derive(Debug, Clone)]
pub struct StoredDecoder<'a> {
    data: &'a [u8],
    position: usize,
    end: usize,
    expected_len: Option<u64>,
}

impl<'a> StoredDecoder<'a> {
    /// Create a pass-through decoder.
    ///
    /// With a known length the output is the first `expected_len` bytes of
    /// `data`; a shorter input is reported as truncated when reached.
    pub fn new(data: &'a [u8], expected_len: Option<u64>) -> Self {
        let end = match expected_len {
            Some(len) => data.len().min(usize::try_from(len).unwrap_or(usize::MAX)),
            None => data.len(),
        };
        Self {
            data,
            position: 0,
            end,
            expected_len,
        }
    }
}

impl Decompressor for StoredDecoder<'_> {
    fn decompress(&mut self, output: &mut [u8]) -> Result<(usize, DecompressStatus)> {
        let count = output.len().min(self.end - self.position);
        output[..count].copy_from_slice(&self.data[self.position..self.position + count]);
        self.position += count;

        if self.position < self.end {
            return Ok((count, DecompressStatus::NeedsOutput));
        }
        if let Some(len) = self.expected_len {
            if (self.position as u64) < len {
                return Err(CodecError::truncated(
                    self.position as u64,
                    self.position as u64,
                ));
            }
        }
        Ok((count, DecompressStatus::Done))
    }

    fn is_finished(&self) -> bool {
        self.position >= self.end
    }

    fn total_in(&self) -> u64 {
        self.position as u64
    }

    fn total_out(&self) -> u64 {
        self.position as u64
    }
}
