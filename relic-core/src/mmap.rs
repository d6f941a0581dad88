//! Memory-mapped archive files as decode sources.
//!
//! A [`MappedSource`] maps an archive read-only and lends byte-range views
//! of it, so an entry can be decoded straight from the mapping through a
//! [`ByteCursor`] without first copying it into a buffer.
//!
//! # Example
//!
//! ```no_run
//! use relic_core::mmap::MappedSource;
//!
//! let source = MappedSource::open("data.pak")?;
//! let entry = source.slice(0x40, 0x1000)?;
//! let mut cursor = source.cursor(0x40, 0x1000)?;
//! assert_eq!(cursor.len(), entry.len());
//! # Ok::<(), relic_core::error::CodecError>(())
//! ```
//!
//! # Safety
//!
//! Memory-mapped files can be dangerous if the underlying file is modified by
//! another process while mapped. Mappings here are read-only.

use crate::cursor::ByteCursor;
use crate::error::{CodecError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// A read-only memory-mapped file.
///
/// The mapping is held in an [`Arc`], so clones are cheap and may be sent
/// to worker threads that decode different entries of the same archive.
#[derive(Debug, Clone)]
pub struct MappedSource {
    /// The memory-mapped file data.
    mmap: Arc<Mmap>,
}

impl MappedSource {
    /// Open a file and map it read-only.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] if the file cannot be opened or mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_file(&file)
    }

    /// Map an already-open file.
    pub fn from_file(file: &File) -> Result<Self> {
        // SAFETY: We create a read-only mapping, and the caller is responsible
        // for ensuring the file is not modified while mapped.
        let mmap = unsafe { Mmap::map(file)? };
        log::debug!("mapped {} bytes", mmap.len());
        Ok(Self {
            mmap: Arc::new(mmap),
        })
    }

    /// Get the size of the mapped file.
    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Check if the mapped file is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Borrow the whole mapping.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }

    /// Borrow `len` bytes starting at `offset`.
    ///
    /// A range extending past the end of the file is
    /// [`CodecError::TruncatedInput`].
    pub fn slice(&self, offset: u64, len: u64) -> Result<&[u8]> {
        let size = self.mmap.len() as u64;
        let range = offset
            .checked_add(len)
            .filter(|&end| end <= size)
            .and_then(|end| Some((usize::try_from(offset).ok()?, usize::try_from(end).ok()?)));
        match range {
            Some((start, end)) => Ok(&self.mmap[start..end]),
            None => Err(CodecError::truncated(size, 0)),
        }
    }

    /// Create a cursor over `len` bytes starting at `offset`.
    pub fn cursor(&self, offset: u64, len: u64) -> Result<ByteCursor<'_>> {
        self.slice(offset, len).map(ByteCursor::new)
    }
}

impl AsRef<[u8]> for MappedSource {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
