//! # rbrc - Single-Pass Station Statistics
//!
//! Computes the minimum, mean and maximum value per key over large text files
//! of `key;value` records, and renders a deterministic summary:
//!
//! ```text
//! {Berlin=20.0/22.5/25.0, Hamburg=8.0/10.0/12.0}
//! ```
//!
//! ## Features
//!
//! - **Zero-copy input**: Memory-mapped access for large files, keys borrowed from the mapping
//! - **Exact arithmetic**: Fixed-point values, integer sums, mean computed only at output time
//! - **Parallel fold**: Line-aligned shards folded on a rayon pool and merged
//! - **Deterministic output**: Byte-ordered keys, round-half-to-even to one digit
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`source`] - Input acquisition (buffered or memory-mapped)
//! - [`tokenizer`] - Newline splitting and line-aligned sharding
//! - [`parser`] - Record splitting and value parsing
//! - [`aggregate`] - Per-key statistics and the aggregation table
//! - [`engine`] - Sequential and sharded folds, end-to-end run
//! - [`format`] - Summary rendering
//! - [`config`] - Run configuration

pub mod error;
pub mod source;
pub mod tokenizer;

pub mod measurement;
pub mod parser;

pub mod aggregate;
pub mod engine;
pub mod format;

pub mod config;

// Re-export commonly used types for convenience
pub use error::{RbrcError, Result};

pub use aggregate::{Aggregate, AggregationTable};
pub use config::Config;
pub use engine::{run, summarize, FoldStrategy, Report, SequentialFold, ShardedFold};
pub use format::format_summary;
pub use measurement::Measurement;
pub use source::{InputSource, SourceFactory, SourceStrategy};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
