//! Numeric literal parsing and canonical rendering.
//!
//! Literals reaching this module have already been shaped by the lexer, so
//! the checks here only guard the invariants that the lexer relies on.

/// True if every `_` in `digits` sits between two digits of the given radix.
fn valid_separators(digits: &str, radix: u32) -> bool {
    let chars: Vec<char> = digits.chars().collect();
    chars.iter().enumerate().all(|(i, ch)| {
        *ch != '_'
            || (i > 0
                && i + 1 < chars.len()
                && chars[i - 1].is_digit(radix)
                && chars[i + 1].is_digit(radix))
    })
}

fn split_sign(literal: &str) -> (bool, &str) {
    if let Some(rest) = literal.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = literal.strip_prefix('+') {
        (false, rest)
    } else {
        (false, literal)
    }
}

fn split_radix(literal: &str) -> (u32, &str) {
    let prefix = literal.get(..2).map(|p| p.to_ascii_lowercase());
    match prefix.as_deref() {
        Some("0b") => (2, &literal[2..]),
        Some("0o") => (8, &literal[2..]),
        Some("0x") => (16, &literal[2..]),
        _ => (10, literal),
    }
}

/// Parse an integer literal, with optional sign, radix prefix and `_`
/// separators, into an `i64`.
pub fn parse_integer(literal: &str) -> Option<i64> {
    let (negative, rest) = split_sign(literal);
    let (radix, digits) = split_radix(rest);

    if digits.is_empty()
        || !digits.chars().all(|c| c == '_' || c.is_digit(radix))
        || !valid_separators(digits, radix)
    {
        return None;
    }

    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    let magnitude = u64::from_str_radix(&digits, radix).ok()?;

    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// Parse a decimal float literal (`1.5`, `.5`, `1.`, `1e3`, `1_000.0_1`)
/// into a finite `f64`. Nonzero digits that underflow to zero are out of
/// range too.
pub fn parse_float(literal: &str) -> Option<f64> {
    let (negative, rest) = split_sign(literal);

    if !rest.chars().any(|c| c.is_ascii_digit())
        || !rest
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '_' | '.' | 'e' | 'E' | '+' | '-'))
        || !valid_separators(rest, 10)
    {
        return None;
    }

    let cleaned: String = rest.chars().filter(|c| *c != '_').collect();
    let value = cleaned.parse::<f64>().ok()?;

    if !value.is_finite() {
        return None;
    }

    if value == 0.0 && split_exponent(&cleaned).0.chars().any(|c| matches!(c, '1'..='9')) {
        return None;
    }

    Some(if negative { -value } else { value })
}

fn split_exponent(literal: &str) -> (&str, Option<&str>) {
    match literal.find(|c: char| matches!(c, 'e' | 'E')) {
        Some(i) => (&literal[..i], Some(&literal[i + 1..])),
        None => (literal, None),
    }
}

/// The canonical text of a decimal literal: its exact value written without
/// separators, exponent, leading or trailing zeros. Zero, signed or not,
/// renders as `0`. `None` if `literal` is not a valid float literal.
pub fn format_decimal(literal: &str) -> Option<String> {
    parse_float(literal)?;

    let (negative, rest) = split_sign(literal);
    let cleaned: String = rest.chars().filter(|c| *c != '_').collect();
    let (mantissa, exponent) = split_exponent(&cleaned);
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let digits = format!("{whole}{fraction}");
    let significant = digits.trim_start_matches('0');
    let skipped = (digits.len() - significant.len()) as i64;
    let significant = significant.trim_end_matches('0');

    if significant.is_empty() {
        return Some(String::from("0"));
    }

    let exponent = match exponent {
        Some(e) => e.parse::<i64>().ok()?,
        None => 0,
    };

    // position of the decimal point, counted from the first significant digit
    let point = whole.len() as i64 + exponent - skipped;
    let len = significant.len() as i64;
    let mut text = String::with_capacity(significant.len() + 2);

    if negative {
        text.push('-');
    }

    if point <= 0 {
        text.push_str("0.");
        text.extend(std::iter::repeat('0').take((-point) as usize));
        text.push_str(significant);
    } else if point >= len {
        text.push_str(significant);
        text.extend(std::iter::repeat('0').take((point - len) as usize));
    } else {
        let (head, tail) = significant.split_at(point as usize);
        text.push_str(head);
        text.push('.');
        text.push_str(tail);
    }

    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_integers() {
        assert_eq!(parse_integer("0"), Some(0));
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-42"), Some(-42));
        assert_eq!(parse_integer("+42"), Some(42));
        assert_eq!(parse_integer("1_000_000"), Some(1_000_000));
    }

    #[test]
    fn radix_integers() {
        assert_eq!(parse_integer("0b100101"), Some(37));
        assert_eq!(parse_integer("0B1_1"), Some(3));
        assert_eq!(parse_integer("0o777"), Some(511));
        assert_eq!(parse_integer("0x2A"), Some(42));
        assert_eq!(parse_integer("-0xff_ff"), Some(-65535));
    }

    #[test]
    fn integer_limits() {
        assert_eq!(parse_integer("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_integer("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_integer("9223372036854775808"), None);
        assert_eq!(parse_integer("0x8000000000000000"), None);
    }

    #[test]
    fn malformed_integers() {
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("0x"), None);
        assert_eq!(parse_integer("0x_1"), None);
        assert_eq!(parse_integer("1__0"), None);
        assert_eq!(parse_integer("10_"), None);
        assert_eq!(parse_integer("0b102"), None);
        assert_eq!(parse_integer("--1"), None);
        assert_eq!(parse_integer("1.5"), None);
    }

    #[test]
    fn floats() {
        assert_eq!(parse_float("1.5"), Some(1.5));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("1."), Some(1.0));
        assert_eq!(parse_float("1.e1"), Some(10.0));
        assert_eq!(parse_float(".0010e+2"), Some(0.1));
        assert_eq!(parse_float("-2.5E-1"), Some(-0.25));
        assert_eq!(parse_float("1_000.000_5"), Some(1000.0005));
    }

    #[test]
    fn malformed_floats() {
        assert_eq!(parse_float("."), None);
        assert_eq!(parse_float("inf"), None);
        assert_eq!(parse_float("nan"), None);
        assert_eq!(parse_float("1e400"), None);
        assert_eq!(parse_float("1_.5"), None);
        assert_eq!(parse_float("0x1p3"), None);
    }

    #[test]
    fn underflow_is_out_of_range() {
        assert_eq!(parse_float("1e-400"), None);
        assert_eq!(parse_float("0e-400"), Some(0.0));
    }

    #[test]
    fn canonical_decimals() {
        assert_eq!(format_decimal("0.0").as_deref(), Some("0"));
        assert_eq!(format_decimal("-0.0").as_deref(), Some("0"));
        assert_eq!(format_decimal("1.e1").as_deref(), Some("10"));
        assert_eq!(format_decimal(".0010e+2").as_deref(), Some("0.1"));
        assert_eq!(format_decimal("-1.250").as_deref(), Some("-1.25"));
        assert_eq!(format_decimal("1e-7").as_deref(), Some("0.0000001"));
        assert_eq!(format_decimal("1_000.000_5").as_deref(), Some("1000.0005"));
        assert_eq!(format_decimal("0012.5e-1").as_deref(), Some("1.25"));
        assert_eq!(format_decimal("1e400"), None);
    }

    #[test]
    fn canonical_decimals_are_exact() {
        assert_eq!(
            format_decimal("12345678901234567890").as_deref(),
            Some("12345678901234567890")
        );
        assert_eq!(
            format_decimal("0.1234567890123456789").as_deref(),
            Some("0.1234567890123456789")
        );
        assert_eq!(
            format_decimal("1.00000000000000001").as_deref(),
            Some("1.00000000000000001")
        );
        assert_eq!(
            format_decimal("9223372036854775808").as_deref(),
            Some("9223372036854775808")
        );
    }
}
