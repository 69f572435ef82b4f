//! Fixed-point decimal values.
//!
//! A [`Measurement`] stores a value as a signed count of micro-units (10⁻⁶)
//! in an `i128`, so whole parts up to about 1.7e32 are representable. Digits
//! past the sixth fractional place are rounded half-to-even into the last
//! micro-unit; everything else is parsed exactly. Sums over measurements are
//! plain integer additions, so accumulation is associative and free of
//! rounding drift.

use std::cmp::Ordering;
use std::fmt;

/// Fractional digits kept by a [`Measurement`]
pub const FRACTION_DIGITS: usize = 6;

/// Micro-units per whole unit
pub const UNITS_PER_WHOLE: i128 = 1_000_000;

/// A decimal value with six fractional digits of precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Measurement(i128);

impl Measurement {
    pub const fn from_micros(micros: i128) -> Self {
        Self(micros)
    }

    /// Value in tenths, e.g. `Measurement::from_tenths(-57)` is `-5.7`
    pub const fn from_tenths(tenths: i64) -> Self {
        Self(tenths as i128 * (UNITS_PER_WHOLE / 10))
    }

    pub const fn micros(self) -> i128 {
        self.0
    }

    /// Parse `-?[0-9]+(\.[0-9]+)?`
    ///
    /// Returns `None` for anything outside that grammar and for whole parts
    /// too large for an `i128` count of micro-units. Fractional digits past
    /// the sixth round half-to-even on the magnitude, so `-x` always parses
    /// to the negation of `x`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let (negative, digits) = match bytes {
            [b'-', rest @ ..] => (true, rest),
            _ => (false, bytes),
        };

        let (whole, fraction) = match memchr::memchr(b'.', digits) {
            Some(dot) => (&digits[..dot], Some(&digits[dot + 1..])),
            None => (digits, None),
        };

        if whole.is_empty() || !whole.iter().all(u8::is_ascii_digit) {
            return None;
        }

        let mut micros: i128 = 0;
        for &b in whole {
            micros = micros.checked_mul(10)?.checked_add(i128::from(b - b'0'))?;
        }
        micros = micros.checked_mul(UNITS_PER_WHOLE)?;

        if let Some(fraction) = fraction {
            if fraction.is_empty() || !fraction.iter().all(u8::is_ascii_digit) {
                return None;
            }
            let (kept, dropped) = fraction.split_at(fraction.len().min(FRACTION_DIGITS));
            let mut place = UNITS_PER_WHOLE;
            for &b in kept {
                place /= 10;
                micros = micros.checked_add(i128::from(b - b'0') * place)?;
            }
            if let Some((&first, rest)) = dropped.split_first() {
                let round_up = match first.cmp(&b'5') {
                    Ordering::Less => false,
                    Ordering::Greater => true,
                    Ordering::Equal => rest.iter().any(|&b| b != b'0') || micros % 2 == 1,
                };
                if round_up {
                    micros = micros.checked_add(1)?;
                }
            }
        }

        Some(Self(if negative { -micros } else { micros }))
    }
}

impl fmt::Display for Measurement {
    /// Renders with one fractional digit, see [`crate::format::format_tenths`]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_tenths(self.0, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Option<i128> {
        Measurement::parse(s.as_bytes()).map(Measurement::micros)
    }

    #[test]
    fn test_parse_typical_values() {
        assert_eq!(parse("12.0"), Some(12_000_000));
        assert_eq!(parse("-5.7"), Some(-5_700_000));
        assert_eq!(parse("0.0"), Some(0));
        assert_eq!(parse("-0.0"), Some(0));
        assert_eq!(parse("99.9"), Some(99_900_000));
    }

    #[test]
    fn test_parse_integers_and_long_fractions() {
        assert_eq!(parse("7"), Some(7_000_000));
        assert_eq!(parse("-12"), Some(-12_000_000));
        assert_eq!(parse("0.123456"), Some(123_456));
        assert_eq!(parse("1.50000000"), Some(1_500_000));
    }

    #[test]
    fn test_parse_rounds_excess_precision() {
        assert_eq!(parse("0.1234567"), Some(123_457));
        assert_eq!(parse("0.1234564"), Some(123_456));
        assert_eq!(parse("0.12345650001"), Some(123_457));
        assert_eq!(parse("1.9999995"), Some(2_000_000));
        assert_eq!(parse("-0.1234567"), Some(-123_457));
    }

    #[test]
    fn test_parse_excess_precision_ties_go_to_even() {
        assert_eq!(parse("0.1234565"), Some(123_456));
        assert_eq!(parse("0.1234575"), Some(123_458));
        assert_eq!(parse("0.0000005"), Some(0));
        assert_eq!(parse("0.00000050"), Some(0));
        assert_eq!(parse("0.0000015"), Some(2));
        assert_eq!(parse("-0.1234565"), Some(-123_456));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "", "-", ".5", "5.", "1.2.3", "+1.0", "1e3", "inf", "NaN", " 1.0", "1.0 ", "--1",
            "1,5", "abc",
        ] {
            assert_eq!(parse(bad), None, "expected {:?} to be rejected", bad);
        }
    }

    #[test]
    fn test_parse_large_magnitudes() {
        assert_eq!(parse("10000000000000.0"), Some(10_000_000_000_000_000_000));
        assert_eq!(
            parse("-99999999999999999999"),
            Some(-99_999_999_999_999_999_999_000_000)
        );
        assert!(parse("170141183460469231731687303715884").is_some());
    }

    #[test]
    fn test_parse_rejects_magnitudes_beyond_i128() {
        assert_eq!(parse("170141183460469231731687303715885"), None);
        assert_eq!(parse(&format!("1{}", "0".repeat(40))), None);
    }

    #[test]
    fn test_ordering_follows_value() {
        let mut values: Vec<Measurement> = ["3.5", "-10.0", "0.0", "-0.5"]
            .iter()
            .filter_map(|s| Measurement::parse(s.as_bytes()))
            .collect();
        values.sort();
        assert_eq!(
            values,
            vec![
                Measurement::from_tenths(-100),
                Measurement::from_tenths(-5),
                Measurement::from_tenths(0),
                Measurement::from_tenths(35),
            ]
        );
    }

    #[test]
    fn test_display_uses_one_fraction_digit() {
        assert_eq!(Measurement::from_tenths(-57).to_string(), "-5.7");
        assert_eq!(Measurement::from_micros(1_250_000).to_string(), "1.2");
    }
}
