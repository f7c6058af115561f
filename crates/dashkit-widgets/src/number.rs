//! Number-to-text conversions with browser semantics.
//!
//! Dashboard values arrive from JSON feeds and were historically displayed by
//! a browser, so fixed-point output follows `Number.prototype.toFixed` and
//! plain output follows `Number.prototype.toString`. The two differ from
//! Rust's `{:.N}` / `{}` formatting on ties (`2.5` rounds to `"3"`, not
//! `"2"`), on large magnitudes and on non-finite values.
//!
//! Exponential output (below `1e-6` or from `1e21`) keeps Rust's shortest
//! digits, which may differ from a browser in the last digit on exact ties.

/// Largest digit count `toFixed` accepts.
pub const MAX_FRACTION_DIGITS: usize = 100;

/// Magnitudes at or above this print in exponential form.
const EXPONENTIAL_THRESHOLD: f64 = 1e21;

/// Format `value` with exactly `digits` fraction digits.
///
/// Ties round away from zero, decided on the exact binary value. `digits`
/// above [`MAX_FRACTION_DIGITS`] is clamped.
#[must_use]
pub fn to_fixed(value: f64, digits: usize) -> String {
    let digits = digits.min(MAX_FRACTION_DIGITS);
    if !value.is_finite() || value.abs() >= EXPONENTIAL_THRESHOLD {
        return number_to_string(value);
    }

    let rounded = round_half_up(value.abs(), digits);
    // -0.0 is not below zero, so it prints as "0"
    if value < 0.0 {
        format!("-{rounded}")
    } else {
        rounded
    }
}

/// Format `value` the way string interpolation of a number does.
#[must_use]
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..EXPONENTIAL_THRESHOLD).contains(&magnitude) {
        let plain = shortest_plain(magnitude);
        return if value < 0.0 { format!("-{plain}") } else { plain };
    }

    let exponential = format!("{value:e}");
    match exponential.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => exponential,
    }
}

/// Shortest round-trip decimal for a positive finite value.
///
/// Rust and ECMAScript agree on the digit count but not on ties: when the
/// exact value sits halfway between two shortest candidates, Rust rounds
/// up while ECMAScript keeps the even digit.
fn shortest_plain(magnitude: f64) -> String {
    let rust = format!("{magnitude}");
    let significant = rust
        .bytes()
        .filter(u8::is_ascii_digit)
        .skip_while(|d| *d == b'0')
        .collect::<Vec<u8>>();
    let count = significant.len() - significant.iter().rev().take_while(|d| **d == b'0').count();

    match round_significant_half_even(magnitude, count) {
        Some(even) if even.parse::<f64>() == Ok(magnitude) => even,
        _ => rust,
    }
}

/// Round the exact expansion of a positive finite value to `count`
/// significant digits, ties to even. `None` when nothing needs rounding.
fn round_significant_half_even(magnitude: f64, count: usize) -> Option<String> {
    let precision = exact_fraction_digits(magnitude);
    let exact = format!("{magnitude:.precision$}");
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut point = int_part.len();
    let mut digits: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).collect();

    let first = digits.iter().position(|d| *d != b'0')?;
    let cut = first + count.max(1);
    let next = *digits.get(cut)?;
    let sticky = digits[cut + 1..].iter().any(|d| *d != b'0');
    let odd = digits[cut - 1] % 2 == 1;
    digits.truncate(cut);
    if next > b'5' || (next == b'5' && (sticky || odd)) {
        let before = digits.len();
        increment_decimal(&mut digits);
        point += digits.len() - before;
    }
    if digits.len() < point {
        digits.resize(point, b'0');
    }

    let (int_digits, frac_digits) = digits.split_at(point);
    let int_digits = std::str::from_utf8(int_digits).ok()?.trim_start_matches('0');
    let frac_digits = std::str::from_utf8(frac_digits).ok()?.trim_end_matches('0');
    let int_digits = if int_digits.is_empty() { "0" } else { int_digits };
    Some(if frac_digits.is_empty() {
        int_digits.to_string()
    } else {
        format!("{int_digits}.{frac_digits}")
    })
}

/// Number of fraction digits in the exact decimal expansion of `value`.
fn exact_fraction_digits(value: f64) -> usize {
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let mantissa = bits & ((1_u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (mantissa, -1074)
    } else {
        (mantissa | (1_u64 << 52), biased - 1075)
    };
    if mantissa == 0 {
        return 0;
    }
    let exponent = exponent + mantissa.trailing_zeros() as i32;
    if exponent < 0 {
        exponent.unsigned_abs() as usize
    } else {
        0
    }
}

/// Round a non-negative finite value to `digits` fraction digits, ties up.
fn round_half_up(value: f64, digits: usize) -> String {
    // Enough digits that the expansion is exact, so no rounding happens here.
    let precision = exact_fraction_digits(value).max(digits + 1);
    let exact = format!("{value:.precision$}");
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .collect();
    let round_up = frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5');
    if round_up {
        increment_decimal(&mut kept);
    }

    let split = kept.len() - digits;
    let (int_digits, frac_digits) = kept.split_at(split);
    let int_digits = String::from_utf8_lossy(int_digits);
    if digits == 0 {
        int_digits.into_owned()
    } else {
        format!("{int_digits}.{}", String::from_utf8_lossy(frac_digits))
    }
}

/// Add one unit in the last place to an ASCII decimal digit string.
fn increment_decimal(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ===== to_fixed =====

    #[test]
    fn test_to_fixed_integers() {
        assert_eq!(to_fixed(0.0, 0), "0");
        assert_eq!(to_fixed(1000.0, 0), "1000");
        assert_eq!(to_fixed(42.0, 2), "42.00");
    }

    #[test]
    fn test_to_fixed_ties_round_up() {
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(1.25, 1), "1.3");
        assert_eq!(to_fixed(1.005, 2), "1.00"); // 1.005 is stored below the tie
    }

    #[test]
    fn test_to_fixed_carry_propagates() {
        assert_eq!(to_fixed(9.99, 1), "10.0");
        assert_eq!(to_fixed(999.5, 0), "1000");
        assert_eq!(to_fixed(0.96, 1), "1.0");
    }

    #[test]
    fn test_to_fixed_negative() {
        assert_eq!(to_fixed(-2.5, 0), "-3");
        assert_eq!(to_fixed(-1.234, 2), "-1.23");
        assert_eq!(to_fixed(-0.4, 0), "-0");
        assert_eq!(to_fixed(-0.0, 1), "0.0");
    }

    #[test]
    fn test_to_fixed_small_values() {
        assert_eq!(to_fixed(0.000_1, 2), "0.00");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(f64::MIN_POSITIVE, 3), "0.000");
    }

    #[test]
    fn test_to_fixed_non_finite() {
        assert_eq!(to_fixed(f64::NAN, 2), "NaN");
        assert_eq!(to_fixed(f64::INFINITY, 0), "Infinity");
        assert_eq!(to_fixed(f64::NEG_INFINITY, 0), "-Infinity");
    }

    #[test]
    fn test_to_fixed_huge_values_use_exponent() {
        assert_eq!(to_fixed(1e21, 2), "1e+21");
        assert_eq!(to_fixed(1e20, 0), "100000000000000000000");
    }

    #[test]
    fn test_to_fixed_clamps_digits() {
        let s = to_fixed(1.0, 500);
        assert_eq!(s.len(), 2 + MAX_FRACTION_DIGITS);
    }

    // ===== number_to_string =====

    #[test]
    fn test_number_to_string_plain() {
        assert_eq!(number_to_string(2_500_000.0), "2500000");
        assert_eq!(number_to_string(0.1), "0.1");
        assert_eq!(number_to_string(-12.75), "-12.75");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.000_001), "0.000001");
    }

    #[test]
    fn test_number_to_string_exponential() {
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(-2.5e30), "-2.5e+30");
    }

    #[test]
    fn test_number_to_string_ties_keep_even_digit() {
        // 1e15 + 0.25 is exact; both .2 and .3 round-trip.
        assert_eq!(number_to_string(1e15 + 0.25), "1000000000000000.2");
        assert_eq!(number_to_string(-(1e15 + 0.25)), "-1000000000000000.2");
        assert_eq!(number_to_string(-169_446_301_460_266.12), "-169446301460266.12");
        assert_eq!(number_to_string(1e15 + 0.375), "1000000000000000.4");
    }

    #[test]
    fn test_round_significant_half_even() {
        assert_eq!(round_significant_half_even(2.5, 1).as_deref(), Some("2"));
        assert_eq!(round_significant_half_even(3.5, 1).as_deref(), Some("4"));
        assert_eq!(round_significant_half_even(0.125, 2).as_deref(), Some("0.12"));
        assert_eq!(round_significant_half_even(99.5, 2).as_deref(), Some("100"));
        assert_eq!(round_significant_half_even(2.5, 2), None);
    }

    #[test]
    fn test_number_to_string_non_finite() {
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }

    // ===== helpers =====

    #[test]
    fn test_exact_fraction_digits() {
        assert_eq!(exact_fraction_digits(0.0), 0);
        assert_eq!(exact_fraction_digits(3.0), 0);
        assert_eq!(exact_fraction_digits(2.5), 1);
        assert_eq!(exact_fraction_digits(0.125), 3);
        assert_eq!(exact_fraction_digits(f64::from_bits(1)), 1074);
    }

    #[test]
    fn test_increment_decimal() {
        let mut d = b"129".to_vec();
        increment_decimal(&mut d);
        assert_eq!(d, b"130");

        let mut d = b"99".to_vec();
        increment_decimal(&mut d);
        assert_eq!(d, b"100");
    }

    proptest! {
        #[test]
        fn prop_to_fixed_has_requested_digits(v in -1e15f64..1e15, digits in 0usize..8) {
            let s = to_fixed(v, digits);
            match s.split_once('.') {
                Some((_, frac)) => prop_assert_eq!(frac.len(), digits),
                None => prop_assert_eq!(digits, 0),
            }
        }

        #[test]
        fn prop_number_to_string_round_trips(v in -1e20f64..1e20) {
            let s = number_to_string(v);
            let parsed: f64 = s.parse().unwrap();
            prop_assert_eq!(parsed, v);
            let display_len = format!("{v}").len();
            prop_assert!(s.len() <= display_len);
        }

        #[test]
        fn prop_to_fixed_is_close(v in -1e9f64..1e9, digits in 0usize..6) {
            let parsed: f64 = to_fixed(v, digits).parse().unwrap();
            let tolerance = 0.5 * 10f64.powi(-(digits as i32)) + 1e-6;
            prop_assert!((parsed - v).abs() <= tolerance);
        }

        #[test]
        fn prop_to_fixed_matches_rust_off_ties(v in 0.0f64..1e6, digits in 0usize..6) {
            // Outside exact ties both roundings agree.
            let ours = to_fixed(v, digits);
            let rust = format!("{v:.digits$}");
            let scaled = v * 10f64.powi(digits as i32);
            if (scaled.fract() - 0.5).abs() > 1e-6 {
                prop_assert_eq!(ours, rust);
            }
        }
    }
}
