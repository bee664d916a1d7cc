//! Helpers for amounts kept in minor units (cents).

/// Format minor units as a decimal amount, e.g. `123456` as `1234.56`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Parse a decimal amount such as `12.5` or `-3.05` into minor units.
///
/// Amounts with up to two fractional digits are read exactly. Any other
/// finite number (`1.999`, `1e2`) is rounded half away from zero to cents.
pub fn parse_money_cents(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    exact_cents(trimmed).or_else(|| rounded_cents(trimmed))
}

fn rounded_cents(input: &str) -> Option<i64> {
    let value: f64 = input.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let cents = (value * 100.0).round();
    // i64::MAX is not representable as f64; the bound below is the first value past it.
    if cents < i64::MIN as f64 || cents >= i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}

fn exact_cents(trimmed: &str) -> Option<i64> {
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > 2
        || !whole.chars().all(|ch| ch.is_ascii_digit())
        || !fraction.chars().all(|ch| ch.is_ascii_digit())
    {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    let cents = whole.checked_mul(100)?.checked_add(fraction)?;
    Some(if negative { -cents } else { cents })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minor_units() {
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(123456), "1234.56");
        assert_eq!(format_cents(-250), "-2.50");
    }

    #[test]
    fn parses_decimal_money() {
        assert_eq!(parse_money_cents("12"), Some(1200));
        assert_eq!(parse_money_cents("12.5"), Some(1250));
        assert_eq!(parse_money_cents(" 0.07 "), Some(7));
        assert_eq!(parse_money_cents(".5"), Some(50));
        assert_eq!(parse_money_cents("-3.05"), Some(-305));
        assert_eq!(parse_money_cents("abc"), None);
        assert_eq!(parse_money_cents(""), None);
        assert_eq!(parse_money_cents("."), None);
    }

    #[test]
    fn rounds_other_finite_numbers_to_cents() {
        assert_eq!(parse_money_cents("1.234"), Some(123));
        assert_eq!(parse_money_cents("1.999"), Some(200));
        assert_eq!(parse_money_cents("1e2"), Some(10000));
        assert_eq!(parse_money_cents("-0.125"), Some(-13));
        assert_eq!(parse_money_cents("inf"), None);
        assert_eq!(parse_money_cents("NaN"), None);
        assert_eq!(parse_money_cents("1e300"), None);
    }
}
