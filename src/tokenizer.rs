//! Newline tokenizer over a byte buffer.
//!
//! [`Lines`] walks the buffer with `memchr`, yielding one [`Line`] per record.
//! Empty lines are skipped. A trailing `\r` is stripped so CRLF files read the
//! same as LF files. The final line is yielded even without a terminator.

use memchr::memchr;
use std::ops::Range;

/// One record's bytes, without the line terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Absolute byte position of the first byte of the line in the input
    pub offset: usize,
    pub bytes: &'a [u8],
}

/// Lazy iterator over the non-empty lines of a buffer
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    data: &'a [u8],
    pos: usize,
    base_offset: usize,
}

impl<'a> Lines<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base_offset(data, 0)
    }

    /// Tokenize a slice that starts at `base_offset` within a larger input
    ///
    /// Reported offsets are absolute, which keeps error positions correct when
    /// a shard of the input is tokenized on its own.
    pub fn with_base_offset(data: &'a [u8], base_offset: usize) -> Self {
        Self {
            data,
            pos: 0,
            base_offset,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.data.len() {
            let start = self.pos;
            let end = memchr(b'\n', &self.data[start..])
                .map(|p| start + p)
                .unwrap_or(self.data.len());
            self.pos = end + 1;

            let mut bytes = &self.data[start..end];
            if let [rest @ .., b'\r'] = bytes {
                bytes = rest;
            }
            if !bytes.is_empty() {
                return Some(Line {
                    offset: self.base_offset + start,
                    bytes,
                });
            }
        }
        None
    }
}

/// Split `data` into at most `shards` contiguous ranges aligned to line starts
///
/// Each boundary sits just after a `\n`, so no line straddles two ranges. The
/// ranges cover `data` exactly, in order. Fewer ranges are returned when the
/// buffer holds fewer lines than requested shards; an empty buffer yields none.
pub fn aligned_ranges(data: &[u8], shards: usize) -> Vec<Range<usize>> {
    let shards = shards.max(1);
    let target = data.len().div_ceil(shards).max(1);

    let mut ranges = Vec::with_capacity(shards);
    let mut start = 0;
    while start < data.len() {
        let probe = start + target;
        let end = if probe >= data.len() {
            data.len()
        } else {
            // Extend the range up to and including the next newline
            match memchr(b'\n', &data[probe - 1..]) {
                Some(p) => probe + p,
                None => data.len(),
            }
        };
        ranges.push(start..end);
        start = end;
    }
    ranges
}
