//! Single-threaded fold over one contiguous slice.

use crate::aggregate::AggregationTable;
use crate::engine::FoldStrategy;
use crate::error::Result;
use crate::parser::{parse_record, ParseOptions, RecordPolicy};
use crate::tokenizer::Lines;
use log::debug;

/// Folds every record in order into one table
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialFold;

impl FoldStrategy for SequentialFold {
    fn fold<'a>(&self, data: &'a [u8], options: &ParseOptions) -> Result<AggregationTable<'a>> {
        fold_slice(data, 0, options)
    }
}

/// Fold the records of `data`, a slice starting at `base_offset` in the input
pub(crate) fn fold_slice<'a>(
    data: &'a [u8],
    base_offset: usize,
    options: &ParseOptions,
) -> Result<AggregationTable<'a>> {
    let mut table = AggregationTable::new();

    for line in Lines::with_base_offset(data, base_offset) {
        match parse_record(line, options.delimiter) {
            Ok(record) => table.observe(record.key, record.value),
            Err(err) if options.policy == RecordPolicy::Lenient && err.is_record_error() => {
                debug!("skipping record: {}", err);
                table.reject();
            }
            Err(err) => return Err(err),
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RbrcError;
    use crate::measurement::Measurement;

    fn lenient() -> ParseOptions {
        ParseOptions {
            policy: RecordPolicy::Lenient,
            ..ParseOptions::default()
        }
    }

    #[test]
    fn test_fold_groups_by_key() {
        let data = b"Hamburg;12.0\nBerlin;20.0\nHamburg;8.0\nBerlin;25.0\n";
        let table = SequentialFold.fold(data, &ParseOptions::default()).unwrap();

        assert_eq!(table.len(), 2);
        let hamburg = table.get(b"Hamburg").unwrap();
        assert_eq!(hamburg.min, Measurement::from_tenths(80));
        assert_eq!(hamburg.max, Measurement::from_tenths(120));
        assert_eq!(hamburg.count, 2);
        let berlin = table.get(b"Berlin").unwrap();
        assert_eq!(berlin.sum, 45_000_000);
    }

    #[test]
    fn test_fold_skips_blank_lines_and_reads_unterminated_tail() {
        let data = b"A;1.0\n\n\nA;3.0\n\nB;2.0";
        let table = SequentialFold.fold(data, &ParseOptions::default()).unwrap();
        assert_eq!(table.records(), 3);
        assert_eq!(table.get(b"A").unwrap().count, 2);
        assert_eq!(table.get(b"B").unwrap().count, 1);
    }

    #[test]
    fn test_strict_fold_aborts_on_missing_delimiter() {
        let data = b"A;1.0\nbroken line\nB;2.0\n";
        match SequentialFold.fold(data, &ParseOptions::default()) {
            Err(RbrcError::MalformedRecord { offset, .. }) => assert_eq!(offset, 6),
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_fold_aborts_on_bad_value() {
        let data = b"A;1.0\nB;two\n";
        assert!(matches!(
            SequentialFold.fold(data, &ParseOptions::default()),
            Err(RbrcError::UnparsableValue { .. })
        ));
    }

    #[test]
    fn test_lenient_fold_counts_rejects() {
        let data = b"A;1.0\nbroken line\nB;two\n;3.0\nA;3.0\n";
        let table = SequentialFold.fold(data, &lenient()).unwrap();
        assert_eq!(table.rejected(), 2);
        assert_eq!(table.records(), 3);
        assert_eq!(table.get(b"A").unwrap().sum, 4_000_000);
        assert_eq!(table.get(b"").unwrap().sum, 3_000_000);
        assert!(table.get(b"B").is_none());
    }

    #[test]
    fn test_fold_slice_reports_absolute_offsets() {
        let data = b"bad";
        match fold_slice(data, 1000, &ParseOptions::default()) {
            Err(RbrcError::MalformedRecord { offset, .. }) => assert_eq!(offset, 1000),
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }
}
