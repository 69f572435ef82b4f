//! Input acquisition: the whole file as one contiguous byte slice.
//!
//! An [`InputSource`] owns either a heap buffer or a read-only shared memory
//! mapping. Dropping it releases the buffer or unmaps the file, so the
//! resource is tied to the scope of a run rather than to process exit.

pub mod factory;
pub mod validation;

pub use factory::{SourceFactory, SourceStrategy};
pub use validation::validate_input_path;

use memmap2::Mmap;
use std::ops::Deref;

/// Byte storage backing an input file
#[derive(Debug)]
pub enum InputSource {
    /// Content read entirely into memory
    InMemory(Vec<u8>),
    /// Content accessed via a read-only shared memory mapping
    MemoryMapped(Mmap),
}

impl InputSource {
    /// Get the underlying bytes regardless of storage strategy
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            InputSource::InMemory(vec) => vec.as_slice(),
            InputSource::MemoryMapped(mmap) => &mmap[..],
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_memory_mapped(&self) -> bool {
        matches!(self, InputSource::MemoryMapped(_))
    }
}

impl Deref for InputSource {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl From<Vec<u8>> for InputSource {
    fn from(bytes: Vec<u8>) -> Self {
        InputSource::InMemory(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_source_exposes_bytes() {
        let source = InputSource::from(b"Oslo;-5.0\n".to_vec());
        assert_eq!(source.len(), 10);
        assert!(!source.is_empty());
        assert!(!source.is_memory_mapped());
        assert_eq!(&source[..4], b"Oslo");
    }

    #[test]
    fn test_empty_source() {
        let source = InputSource::from(Vec::new());
        assert!(source.is_empty());
        assert_eq!(source.as_bytes(), b"");
    }
}
