//! Duration literals: a sequence of decimal numbers with unit suffixes, such as
//! `300ms`, `1.5h` or `2h45m`. A bare `0` is also accepted.

use std::time::Duration;

const NANOSECOND: u128 = 1;
const MICROSECOND: u128 = 1_000 * NANOSECOND;
const MILLISECOND: u128 = 1_000 * MICROSECOND;
const SECOND: u128 = 1_000 * MILLISECOND;
const MINUTE: u128 = 60 * SECOND;
const HOUR: u128 = 60 * MINUTE;

// Fraction digits beyond this are dropped; they are below nanosecond precision anyway.
const MAX_FRACTION_DIGITS: u32 = 18;

pub(crate) fn parse_duration(literal: &str) -> Result<Duration, String> {
    let invalid = || format!("invalid duration literal {literal:?}");

    let rest = match literal.as_bytes().first() {
        Some(b'-') => return Err(format!("negative duration {literal:?} is not supported")),
        Some(b'+') => &literal[1..],
        _ => literal,
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    let mut rest = rest;

    while !rest.is_empty() {
        let (whole, after_whole) = split_digits(rest);
        let (fraction, after_fraction) = match after_whole.strip_prefix('.') {
            Some(after_dot) => split_digits(after_dot),
            None => ("", after_whole),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let unit_len = after_fraction
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_fraction.len());
        let (unit, next) = after_fraction.split_at(unit_len);
        let scale = match unit {
            "ns" => NANOSECOND,
            "us" | "µs" | "μs" => MICROSECOND,
            "ms" => MILLISECOND,
            "s" => SECOND,
            "m" => MINUTE,
            "h" => HOUR,
            "" => return Err(format!("missing unit in duration {literal:?}")),
            other => return Err(format!("unknown unit {other:?} in duration {literal:?}")),
        };

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            // Only digits reach here, so a failed parse means the run overflowed.
            whole.parse().map_err(|_| out_of_range(literal))?
        };
        let mut component = whole.checked_mul(scale).ok_or_else(|| out_of_range(literal))?;

        let mut numerator: u128 = 0;
        let mut denominator: u128 = 1;
        for digit in fraction.bytes().take(MAX_FRACTION_DIGITS as usize) {
            numerator = numerator * 10 + u128::from(digit - b'0');
            denominator *= 10;
        }
        component = component
            .checked_add(numerator * scale / denominator)
            .ok_or_else(|| out_of_range(literal))?;

        total = total
            .checked_add(component)
            .filter(|total| *total <= u128::from(u64::MAX))
            .ok_or_else(|| out_of_range(literal))?;
        rest = next;
    }

    // Bounded by u64::MAX above.
    Ok(Duration::from_nanos(total as u64))
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn out_of_range(literal: &str) -> String {
    format!("duration {literal:?} is out of range")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_units() {
        assert_eq!(parse_duration("15ns").unwrap(), Duration::from_nanos(15));
        assert_eq!(parse_duration("15us").unwrap(), Duration::from_micros(15));
        assert_eq!(parse_duration("15µs").unwrap(), Duration::from_micros(15));
        assert_eq!(parse_duration("15ms").unwrap(), Duration::from_millis(15));
        assert_eq!(parse_duration("15s").unwrap(), Duration::from_secs(15));
        assert_eq!(parse_duration("15m").unwrap(), Duration::from_secs(15 * 60));
        assert_eq!(parse_duration("15h").unwrap(), Duration::from_secs(15 * 3600));
    }

    #[test]
    fn test_compound_and_fraction() {
        assert_eq!(
            parse_duration("2h45m30s").unwrap(),
            Duration::from_secs(2 * 3600 + 45 * 60 + 30)
        );
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("1.s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("+3ms").unwrap(), Duration::from_millis(3));
    }

    #[test]
    fn test_zero() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_literals() {
        for literal in ["", "10", "s", "1x", "1.2.3s", ".s", "1s2", "ten seconds", " 1s"] {
            assert!(parse_duration(literal).is_err(), "{literal:?} should be rejected");
        }
    }

    #[test]
    fn test_negative_rejected() {
        let err = parse_duration("-1s").unwrap_err();
        assert!(err.contains("negative"));
    }

    #[test]
    fn test_out_of_range() {
        assert!(parse_duration("9999999999999h").is_err());
        assert!(parse_duration("18446744073709551615ns").is_ok());
        assert!(parse_duration("18446744073709551616ns").is_err());
    }

    #[test]
    fn test_fraction_near_u128_limit() {
        let err = parse_duration("94522879700260684295381835.999999h").unwrap_err();
        assert!(err.contains("out of range"), "{err}");
    }

    #[test]
    fn test_overlong_whole_is_out_of_range() {
        let literal = format!("{}s", "9".repeat(60));
        let err = parse_duration(&literal).unwrap_err();
        assert!(err.contains("out of range"), "{err}");
    }
}
