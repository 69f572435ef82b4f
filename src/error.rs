//! Error types and handling infrastructure for rbrc.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! the library error type. The binary wraps these in `anyhow` for reporting.
//!
//! ## Design Principles
//!
//! - **User-friendly messages**: Errors point at the offending file or record
//! - **Context preservation**: Record errors carry the absolute byte offset
//! - **Consistency**: Standardized Result type across all modules

use bstr::ByteSlice;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rbrc operations.
///
/// Every variant is fatal for a run: no partial summary is produced.
#[derive(Error, Debug)]
pub enum RbrcError {
    /// File system related errors (stat failure, read failure, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File not found specifically (common case for user feedback)
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Path exists but is not a regular file
    #[error("Path is not a regular file: {path}")]
    NotAFile { path: PathBuf },

    /// Permission denied accessing file
    #[error("Permission denied accessing file: {path}")]
    PermissionDenied { path: PathBuf },

    /// Memory mapping related errors
    #[error("Memory mapping failed for {path}")]
    MemoryMappingError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line that cannot be split into key and value
    #[error("Malformed record at byte {offset}: {reason}: {line:?}")]
    MalformedRecord {
        offset: usize,
        line: String,
        reason: &'static str,
    },

    /// The value part of a record is not a decimal number
    #[error("Unparsable value at byte {offset}: {value:?}")]
    UnparsableValue { offset: usize, value: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Worker pool could not be set up
    #[error("Execution failed: {message}")]
    ExecutionError { message: String },
}

/// Standard Result type for rbrc operations.
pub type Result<T> = std::result::Result<T, RbrcError>;

impl RbrcError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a MalformedRecord error, rendering the raw line lossily
    pub fn malformed(offset: usize, line: &[u8], reason: &'static str) -> Self {
        Self::MalformedRecord {
            offset,
            line: line.to_str_lossy().into_owned(),
            reason,
        }
    }

    /// Create an UnparsableValue error, rendering the raw value lossily
    pub fn unparsable(offset: usize, value: &[u8]) -> Self {
        Self::UnparsableValue {
            offset,
            value: value.to_str_lossy().into_owned(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error with a descriptive message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an ExecutionError with a descriptive message
    pub fn execution(message: impl Into<String>) -> Self {
        Self::ExecutionError {
            message: message.into(),
        }
    }

    /// Whether this error was caused by the content of the input rather than by I/O
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::UnparsableValue { .. }
        )
    }

    /// Byte offset into the input for record errors
    pub fn record_offset(&self) -> Option<usize> {
        match self {
            Self::MalformedRecord { offset, .. } | Self::UnparsableValue { offset, .. } => {
                Some(*offset)
            }
            _ => None,
        }
    }
}

// Automatic conversion from io::Error to RbrcError
impl From<std::io::Error> for RbrcError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileError {
                message: "File not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::FileError {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::FileError {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}
