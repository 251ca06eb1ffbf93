//! Parsing of relative interval strings such as `5m`, `1h30m` or `1.5h`.

use std::time::Duration;

use super::ReportError;

const NANOS_PER_UNIT: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("us", 1e3),
    ("µs", 1e3),
    ("μs", 1e3),
    ("ms", 1e6),
    ("s", 1e9),
    ("m", 60e9),
    ("h", 3600e9),
];

/// Parse a duration string made of `<number><unit>` terms.
///
/// Units: `ns`, `us` (`µs`), `ms`, `s`, `m`, `h`. Terms add up, fractions are
/// allowed (`1.5h`), and the bare string `0` means zero. Negative values
/// are rejected.
pub fn parse_interval(input: &str) -> Result<Duration, ReportError> {
    let invalid = || ReportError::InvalidInterval(input.to_string());

    let mut rest = input.strip_prefix('+').unwrap_or(input);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_nanos = 0.0_f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() || number == "." {
            return Err(invalid());
        }
        let value: f64 = number.parse().map_err(|_| invalid())?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let scale = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(invalid)?;

        total_nanos += value * scale;
        rest = tail;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(invalid());
    }

    Ok(Duration::from_nanos(total_nanos.round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_units() {
        assert_eq!(parse_interval("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_interval("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_interval("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_interval("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_interval("10us").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_interval("10µs").unwrap(), Duration::from_micros(10));
        assert_eq!(parse_interval("7ns").unwrap(), Duration::from_nanos(7));
    }

    #[test]
    fn test_compound_and_fractional() {
        assert_eq!(parse_interval("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_interval("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_interval("2m30s").unwrap(), Duration::from_secs(150));
        assert_eq!(parse_interval(".5m").unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_and_sign() {
        assert_eq!(parse_interval("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_interval("+15m").unwrap(), Duration::from_secs(900));
    }

    #[test]
    fn test_invalid() {
        for input in ["", "5", "m", "5x", "five minutes", "-5m", "1h-", "5 m", ".m", "1..5m", "+"] {
            assert!(
                matches!(parse_interval(input), Err(ReportError::InvalidInterval(_))),
                "expected '{}' to be rejected",
                input
            );
        }
    }
}
