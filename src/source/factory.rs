//! Factory for opening [`InputSource`] instances.
//!
//! The factory validates the path, then picks between reading the file into a
//! buffer and memory-mapping it.

use crate::error::{RbrcError, Result};
use crate::source::validation::validate_input_path;
use crate::source::InputSource;
use log::{debug, warn};
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// How the input file is brought into memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum SourceStrategy {
    /// Buffer small files, map large ones
    #[default]
    Auto,
    /// Always memory-map (empty files still use an empty buffer)
    #[cfg_attr(feature = "config", serde(rename = "mmap"))]
    MemoryMapped,
    /// Always read into a heap buffer
    Buffered,
}

impl FromStr for SourceStrategy {
    type Err = RbrcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "mmap" => Ok(Self::MemoryMapped),
            "buffered" => Ok(Self::Buffered),
            other => Err(RbrcError::invalid_argument(format!(
                "unknown source strategy '{}' (expected auto, mmap or buffered)",
                other
            ))),
        }
    }
}

/// Factory for creating [`InputSource`] instances
///
/// # Strategy Selection
/// - Empty files: empty buffer, regardless of strategy
/// - `Auto`, files < 50MB: read into memory
/// - `Auto`, files ≥ 50MB: memory mapping
pub struct SourceFactory;

impl SourceFactory {
    /// Size threshold between buffered and memory-mapped reads under `Auto`
    pub const MEMORY_THRESHOLD: u64 = 50 * 1024 * 1024; // 50MB

    /// Open a file with the strategy selected for it
    ///
    /// # Errors
    /// * Validation errors (missing, not a regular file, unreadable)
    /// * Read or mapping failures
    pub fn open(path: &Path, strategy: SourceStrategy) -> Result<InputSource> {
        validate_input_path(path)?;

        let file = File::open(path).map_err(|e| {
            RbrcError::file_error(format!("Failed to open file: {}", path.display()), e)
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| RbrcError::file_error("Failed to get file metadata", e))?
            .len();

        if file_size == 0 {
            debug!("{} is empty, nothing to map", path.display());
            return Ok(InputSource::InMemory(Vec::new()));
        }

        let map = match strategy {
            SourceStrategy::Auto => file_size >= Self::MEMORY_THRESHOLD,
            SourceStrategy::MemoryMapped => true,
            SourceStrategy::Buffered => false,
        };

        if map {
            debug!("memory-mapping {} ({} bytes)", path.display(), file_size);
            Self::map_file(path, &file)
        } else {
            debug!("buffering {} ({} bytes)", path.display(), file_size);
            let mut content = Vec::with_capacity(file_size as usize);
            let mut file = file;
            file.read_to_end(&mut content)
                .map_err(|e| RbrcError::file_error("Failed to read file", e))?;
            Ok(InputSource::InMemory(content))
        }
    }

    fn map_file(path: &Path, file: &File) -> Result<InputSource> {
        // Mmap::map creates a read-only MAP_SHARED mapping; no private copy is made.
        // The file must not be modified while the mapping is alive.
        let mmap = unsafe {
            Mmap::map(file).map_err(|e| RbrcError::MemoryMappingError {
                path: path.to_path_buf(),
                source: e,
            })?
        };

        #[cfg(unix)]
        {
            if let Err(e) = mmap.advise(memmap2::Advice::Sequential) {
                // Non-fatal
                warn!("failed to set mmap advice: {}", e);
            }
        }

        Ok(InputSource::MemoryMapped(mmap))
    }
}
