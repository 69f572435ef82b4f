//! Aggregation engine: fold strategies and the end-to-end run.
//!
//! A run opens the input through [`SourceFactory`], folds it with the strategy
//! chosen by the [`Config`], renders the summary, and releases the input before
//! returning. Any error aborts the run with no partial output.

pub mod sequential;
pub mod sharded;

pub use sequential::SequentialFold;
pub use sharded::ShardedFold;

use crate::aggregate::AggregationTable;
use crate::config::Config;
use crate::error::Result;
use crate::format::format_summary;
use crate::parser::ParseOptions;
use crate::source::SourceFactory;
use log::info;
use std::time::Instant;

/// Builds an [`AggregationTable`] from a whole input buffer
///
/// Implementations must produce the same table for the same input; they differ
/// only in how the work is scheduled.
pub trait FoldStrategy {
    fn fold<'a>(&self, data: &'a [u8], options: &ParseOptions) -> Result<AggregationTable<'a>>;
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Rendered `{Key=min/mean/max, ...}` string
    pub summary: String,
    /// Number of distinct keys
    pub stations: usize,
    /// Records folded into the summary
    pub records: u64,
    /// Records skipped under the lenient policy
    pub rejected: u64,
}

/// Pick the fold strategy for a configuration
pub fn strategy_for(config: &Config) -> Box<dyn FoldStrategy> {
    match config.effective_threads() {
        1 => Box::new(SequentialFold),
        n => Box::new(ShardedFold::new(n)),
    }
}

/// Aggregate an in-memory buffer and render it
pub fn summarize(data: &[u8], config: &Config) -> Result<Report> {
    config.validate()?;
    let table = strategy_for(config).fold(data, &config.parse_options())?;
    Ok(report_from(table))
}

/// Aggregate the configured input file and render it
pub fn run(config: &Config) -> Result<Report> {
    let started = Instant::now();

    let source = SourceFactory::open(&config.input, config.strategy)?;
    let report = summarize(&source, config)?;
    drop(source);

    info!(
        "aggregated {} records into {} stations in {:?}",
        report.records,
        report.stations,
        started.elapsed()
    );
    Ok(report)
}

fn report_from(table: AggregationTable<'_>) -> Report {
    let stations = table.len();
    let records = table.records();
    let rejected = table.rejected();
    Report {
        summary: format_summary(table),
        stations,
        records,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RbrcError;
    use crate::parser::RecordPolicy;

    fn config_with_threads(threads: usize) -> Config {
        Config {
            threads: Some(threads),
            ..Config::default()
        }
    }

    #[test]
    fn test_summarize_example() {
        let data = b"Hamburg;12.0\nBerlin;20.0\nHamburg;8.0\nBerlin;25.0\n";
        let report = summarize(data, &config_with_threads(1)).unwrap();
        assert_eq!(
            report.summary,
            "{Berlin=20.0/22.5/25.0, Hamburg=8.0/10.0/12.0}"
        );
        assert_eq!(report.stations, 2);
        assert_eq!(report.records, 4);
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn test_summarize_empty() {
        let report = summarize(b"", &config_with_threads(4)).unwrap();
        assert_eq!(report.summary, "{}");
        assert_eq!(report.stations, 0);
    }

    #[test]
    fn test_lenient_report_counts_rejects() {
        let config = Config {
            policy: RecordPolicy::Lenient,
            threads: Some(1),
            ..Config::default()
        };
        let report = summarize(b"A;1.0\noops\nA;2.0\n", &config).unwrap();
        assert_eq!(report.summary, "{A=1.0/1.5/2.0}");
        assert_eq!(report.rejected, 1);
    }

    #[test]
    fn test_custom_delimiter() {
        let config = Config {
            delimiter: b'|',
            threads: Some(1),
            ..Config::default()
        };
        let report = summarize(b"A|1.0\nA;B|3.0\n", &config).unwrap();
        assert_eq!(report.summary, "{A=1.0/1.0/1.0, A;B=3.0/3.0/3.0}");
    }

    #[test]
    fn test_summarize_rejects_zero_threads() {
        assert!(matches!(
            summarize(b"A;1.0\n", &config_with_threads(0)),
            Err(RbrcError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_summarize_empty_key() {
        let report = summarize(b";1.0\n", &config_with_threads(1)).unwrap();
        assert_eq!(report.summary, "{=1.0/1.0/1.0}");
    }

    #[test]
    fn test_summarize_precise_and_large_values() {
        let report = summarize(b"A;0.1234567\n", &config_with_threads(1)).unwrap();
        assert_eq!(report.summary, "{A=0.1/0.1/0.1}");

        let report = summarize(b"A;10000000000000.0\n", &config_with_threads(1)).unwrap();
        assert_eq!(
            report.summary,
            "{A=10000000000000.0/10000000000000.0/10000000000000.0}"
        );
    }
}
