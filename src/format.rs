//! Summary rendering.
//!
//! Output has the shape `{Key1=min/mean/max, Key2=min/mean/max}` with keys in
//! ascending byte order and every number printed with one fractional digit.
//! Rounding is round-half-to-even on the exact decimal value, done in integer
//! arithmetic. Zero is always printed as `0.0`, never `-0.0`.

use crate::aggregate::{Aggregate, AggregationTable};
use crate::measurement::UNITS_PER_WHOLE;
use bstr::ByteSlice;

const UNITS_PER_TENTH: i128 = UNITS_PER_WHOLE / 10;

/// Render `micros / divisor` rounded to one fractional digit
///
/// `divisor` is the observation count when rendering a mean, and 1 otherwise.
pub fn format_tenths(micros: i128, divisor: u64) -> String {
    let mut out = String::new();
    push_tenths(&mut out, micros, divisor);
    out
}

fn push_tenths(out: &mut String, micros: i128, divisor: u64) {
    debug_assert!(divisor > 0);
    let tenths = round_half_even(micros, i128::from(divisor) * UNITS_PER_TENTH);
    let sign = if tenths < 0 { "-" } else { "" };
    let magnitude = tenths.unsigned_abs();
    out.push_str(&format!("{}{}.{}", sign, magnitude / 10, magnitude % 10));
}

/// Divide, rounding ties to the even quotient
fn round_half_even(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator.div_euclid(denominator);
    let remainder = numerator.rem_euclid(denominator);
    match (2 * remainder).cmp(&denominator) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient.rem_euclid(2) == 0 => quotient,
        std::cmp::Ordering::Equal => quotient + 1,
    }
}

fn push_entry(out: &mut String, key: &[u8], aggregate: &Aggregate) {
    // Keys are checked to be UTF-8 by the parser, so this never substitutes
    out.push_str(&key.to_str_lossy());
    out.push('=');
    push_tenths(out, aggregate.min.micros(), 1);
    out.push('/');
    push_tenths(out, aggregate.sum, aggregate.count);
    out.push('/');
    push_tenths(out, aggregate.max.micros(), 1);
}

/// Render a finished table
pub fn format_summary(table: AggregationTable<'_>) -> String {
    let entries = table.into_sorted();

    let mut out = String::with_capacity(2 + entries.len() * 32);
    out.push('{');
    for (i, (key, aggregate)) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        push_entry(&mut out, key, aggregate);
    }
    out.push('}');
    out
}
