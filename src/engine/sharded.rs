//! Parallel fold: line-aligned shards folded on a rayon pool, then merged.

use crate::aggregate::AggregationTable;
use crate::engine::sequential::{fold_slice, SequentialFold};
use crate::engine::FoldStrategy;
use crate::error::{RbrcError, Result};
use crate::parser::ParseOptions;
use crate::tokenizer::aligned_ranges;
use log::debug;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

/// Folds independent shards of the input in parallel
///
/// Each shard is folded into a private [`AggregationTable`]; partial tables are
/// combined with [`AggregationTable::merge`] in a parallel reduction. There is
/// no shared mutable state between workers.
///
/// In strict mode every shard stops at its own first bad record, and the error
/// with the smallest offset wins, so the reported error is the one a
/// sequential fold would report.
#[derive(Debug, Clone, Copy)]
pub struct ShardedFold {
    threads: usize,
    min_shard_bytes: usize,
}

impl ShardedFold {
    /// Inputs are not split below this many bytes per shard by default
    pub const DEFAULT_MIN_SHARD_BYTES: usize = 1024 * 1024;

    /// Create a fold running on `threads` workers
    ///
    /// # Panics
    ///
    /// Panics if `threads == 0`.
    pub fn new(threads: usize) -> Self {
        assert!(threads > 0, "threads must be > 0");
        Self {
            threads,
            min_shard_bytes: Self::DEFAULT_MIN_SHARD_BYTES,
        }
    }

    /// Override the smallest shard size worth handing to a worker
    pub fn with_min_shard_bytes(mut self, min_shard_bytes: usize) -> Self {
        self.min_shard_bytes = min_shard_bytes.max(1);
        self
    }

    fn shard_count(&self, len: usize) -> usize {
        (len / self.min_shard_bytes).clamp(1, self.threads)
    }
}

impl FoldStrategy for ShardedFold {
    fn fold<'a>(&self, data: &'a [u8], options: &ParseOptions) -> Result<AggregationTable<'a>> {
        let ranges = aligned_ranges(data, self.shard_count(data.len()));
        if ranges.len() <= 1 {
            return SequentialFold.fold(data, options);
        }

        debug!(
            "folding {} bytes in {} shards on {} threads",
            data.len(),
            ranges.len(),
            self.threads
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| RbrcError::execution(format!("failed to build worker pool: {}", e)))?;

        pool.install(|| {
            ranges
                .into_par_iter()
                .map(|range| fold_slice(&data[range.clone()], range.start, options))
                .reduce(|| Ok(AggregationTable::new()), combine)
        })
    }
}

fn combine<'a>(
    left: Result<AggregationTable<'a>>,
    right: Result<AggregationTable<'a>>,
) -> Result<AggregationTable<'a>> {
    match (left, right) {
        (Ok(mut acc), Ok(part)) => {
            acc.merge(part);
            Ok(acc)
        }
        (Err(err), Ok(_)) | (Ok(_), Err(err)) => Err(err),
        (Err(a), Err(b)) => {
            if b.record_offset() < a.record_offset() {
                Err(b)
            } else {
                Err(a)
            }
        }
    }
}
