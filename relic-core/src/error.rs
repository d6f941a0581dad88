//! Error types for Relic codec operations.
//!
//! Every codec in the workspace reports failures through [`CodecError`].
//! A decode call stops at the first invalid condition and returns the
//! error; callers treat the affected entry as unreadable and move on.

use std::io;
use thiserror::Error;

/// The error type shared by all Relic codecs.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The byte source ran out before the decoded stream was complete.
    #[error("Truncated input at offset {offset}: {produced} bytes decoded")]
    TruncatedInput {
        /// Input offset (in bytes) where the source was exhausted.
        offset: u64,
        /// Number of decoded bytes produced before the failure.
        produced: u64,
    },

    /// A control code (Huffman code, flag pattern) did not resolve.
    #[error("Invalid control code at bit position {bit_position}")]
    InvalidControlCode {
        /// Bit position where the invalid code was found.
        bit_position: u64,
    },

    /// A back-reference pointed outside the available history.
    #[error("Back-reference distance {distance} out of range (history holds {available} bytes)")]
    BackReferenceOutOfRange {
        /// The offending distance.
        distance: u64,
        /// Number of history bytes that could be referenced.
        available: usize,
    },

    /// Decoding would exceed the caller-supplied output limit.
    #[error("Decoded output exceeds limit of {limit} bytes")]
    OutputOverflow {
        /// The configured maximum output size.
        limit: u64,
    },

    /// The requested codec or cipher variant is not implemented.
    #[error("Unsupported variant: {variant}")]
    UnsupportedVariant {
        /// Description of the variant.
        variant: String,
    },

    /// The codec cannot decode without knowing the decoded length.
    #[error("{codec} decoding requires a known decoded length")]
    LengthRequired {
        /// Name of the codec.
        codec: &'static str,
    },

    /// I/O error while opening a byte source.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for Relic operations.
pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    /// Create a truncated input error.
    pub fn truncated(offset: u64, produced: u64) -> Self {
        Self::TruncatedInput { offset, produced }
    }

    /// Create an invalid control code error.
    pub fn invalid_code(bit_position: u64) -> Self {
        Self::InvalidControlCode { bit_position }
    }

    /// Create a back-reference range error.
    pub fn out_of_range(distance: u64, available: usize) -> Self {
        Self::BackReferenceOutOfRange {
            distance,
            available,
        }
    }

    /// Create an output overflow error.
    pub fn overflow(limit: u64) -> Self {
        Self::OutputOverflow { limit }
    }

    /// Create an unsupported variant error.
    pub fn unsupported(variant: impl Into<String>) -> Self {
        Self::UnsupportedVariant {
            variant: variant.into(),
        }
    }

    /// Create a length required error.
    pub fn length_required(codec: &'static str) -> Self {
        Self::LengthRequired { codec }
    }

    /// Record how many bytes were decoded when input ran out.
    ///
    /// Low-level readers do not know the decoder's output count; decoders
    /// attach it with this on the way out. Other variants pass through.
    pub fn with_produced(self, produced: u64) -> Self {
        match self {
            Self::TruncatedInput { offset, .. } => Self::TruncatedInput { offset, produced },
            other => other,
        }
    }
}

impl Clone for CodecError {
    fn clone(&self) -> Self {
        match self {
            Self::TruncatedInput { offset, produced } => Self::truncated(*offset, *produced),
            Self::InvalidControlCode { bit_position } => Self::invalid_code(*bit_position),
            Self::BackReferenceOutOfRange {
                distance,
                available,
            } => Self::out_of_range(*distance, *available),
            Self::OutputOverflow { limit } => Self::overflow(*limit),
            Self::UnsupportedVariant { variant } => Self::unsupported(variant.clone()),
            Self::LengthRequired { codec } => Self::length_required(*codec),
            // io::Error is not Clone; keep the kind and message.
            Self::Io(err) => Self::Io(io::Error::new(err.kind(), err.to_string())),
        }
    }
}
