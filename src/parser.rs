//! Record parsing: one line into a key and a [`Measurement`].
//!
//! A line is split at the *last* delimiter, so keys may contain the delimiter
//! while values never do.

use crate::error::{RbrcError, Result};
use crate::measurement::Measurement;
use crate::tokenizer::Line;
use memchr::memrchr;

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b';';

/// A parsed record, borrowing its key from the input buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub key: &'a [u8],
    pub value: Measurement,
}

/// What the fold does with a line that fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordPolicy {
    /// Abort the run on the first bad record
    #[default]
    Strict,
    /// Skip bad records and count them
    Lenient,
}

/// Parsing options shared by every line of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub delimiter: u8,
    pub policy: RecordPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            policy: RecordPolicy::Strict,
        }
    }
}

/// Split a line into key and value
///
/// # Errors
/// * `MalformedRecord` when the delimiter is missing or the key is not valid
///   UTF-8. An empty key is a key like any other.
/// * `UnparsableValue` when the value is not a decimal number
pub fn parse_record(line: Line<'_>, delimiter: u8) -> Result<Record<'_>> {
    let bytes = line.bytes;
    let split = memrchr(delimiter, bytes)
        .ok_or_else(|| RbrcError::malformed(line.offset, bytes, "missing delimiter"))?;

    let key = &bytes[..split];
    let value = &bytes[split + 1..];

    if std::str::from_utf8(key).is_err() {
        return Err(RbrcError::malformed(
            line.offset,
            bytes,
            "key is not valid UTF-8",
        ));
    }

    let value = Measurement::parse(value)
        .ok_or_else(|| RbrcError::unparsable(line.offset + split + 1, value))?;

    Ok(Record { key, value })
}
