//! # Lenient Numeric Parsing
//!
//! Numbers in loosely-typed input show up as JSON numbers, as numeric
//! strings, or as strings with trailing garbage (`"12px"`). Both parsers
//! here read the longest numeric prefix of the value's text form and fall
//! back to `0` when there is none. They never fail.
//!
//! [`parse_int`] returns an `f64` holding an integral value because
//! [`Value`] has a single number type.

use crate::value::Value;

/// Parse a value as a float.
///
/// Numbers pass through unchanged (NaN becomes `0`). Everything else is
/// converted to text and its longest float prefix is read: optional sign,
/// digits, optional fraction, optional exponent.
pub fn parse_float(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => *n,
        Value::Deferred(d) => return parse_float(&d.resolve()),
        other => float_prefix(&other.to_text()).unwrap_or(0.0),
    };
    if parsed.is_nan() {
        0.0
    } else {
        parsed
    }
}

/// Parse a value as an integer, truncating toward zero.
///
/// Numbers are truncated. Text is read up to the first character that
/// cannot continue an optionally signed run of decimal digits, so
/// `"4.9"` yields `4` and `"x"` yields `0`.
pub fn parse_int(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) if n.is_finite() => n.trunc(),
        Value::Number(_) => 0.0,
        Value::Deferred(d) => return parse_int(&d.resolve()),
        other => int_prefix(&other.to_text()).unwrap_or(0.0),
    };
    // Normalize -0.
    if parsed == 0.0 {
        0.0
    } else {
        parsed
    }
}

/// Length in bytes of an optional leading `+`/`-`.
fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')))
}

fn digits_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn int_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let sign = sign_len(bytes);
    let digits = digits_len(&bytes[sign..]);
    if digits == 0 {
        return None;
    }
    text[..sign + digits].parse::<f64>().ok()
}

fn float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = sign_len(bytes);

    let int_digits = digits_len(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_len(&bytes[end + 1..]);
        if frac_digits > 0 || int_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let exp_start = end + 1;
        let exp_sign = sign_len(&bytes[exp_start..]);
        let exp_digits = digits_len(&bytes[exp_start + exp_sign..]);
        if exp_digits > 0 {
            end = exp_start + exp_sign + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::String(s.to_string())
    }

    #[test]
    fn test_float_from_numbers_and_text() {
        assert_eq!(parse_float(&Value::Number(4.5)), 4.5);
        assert_eq!(parse_float(&text("42")), 42.0);
        assert_eq!(parse_float(&text("  -3.25kg")), -3.25);
        assert_eq!(parse_float(&text(".5")), 0.5);
        assert_eq!(parse_float(&text("5.")), 5.0);
        assert_eq!(parse_float(&text("1e3")), 1000.0);
        assert_eq!(parse_float(&text("2E-2x")), 0.02);
        assert_eq!(parse_float(&text("7e")), 7.0);
    }

    #[test]
    fn test_float_fallbacks_to_zero() {
        assert_eq!(parse_float(&text("")), 0.0);
        assert_eq!(parse_float(&text("abc")), 0.0);
        assert_eq!(parse_float(&text(".")), 0.0);
        assert_eq!(parse_float(&text("-")), 0.0);
        assert_eq!(parse_float(&Value::Null), 0.0);
        assert_eq!(parse_float(&Value::Bool(true)), 0.0);
        assert_eq!(parse_float(&Value::Number(f64::NAN)), 0.0);
    }

    #[test]
    fn test_int_truncates() {
        assert_eq!(parse_int(&text("3")), 3.0);
        assert_eq!(parse_int(&text("4.9")), 4.0);
        assert_eq!(parse_int(&text("-12px")), -12.0);
        assert_eq!(parse_int(&Value::Number(7.8)), 7.0);
        assert_eq!(parse_int(&Value::Number(-7.8)), -7.0);
    }

    #[test]
    fn test_int_fallbacks_to_zero() {
        assert_eq!(parse_int(&text("x")), 0.0);
        assert_eq!(parse_int(&text(".9")), 0.0);
        assert_eq!(parse_int(&Value::Null), 0.0);
        assert_eq!(parse_int(&Value::Number(f64::INFINITY)), 0.0);
        assert!(parse_int(&text("-0")).is_sign_positive());
    }

    #[test]
    fn test_single_element_array_reads_its_text() {
        let arr = Value::Array(vec![Value::Number(8.0)]);
        assert_eq!(parse_int(&arr), 8.0);
    }

    #[test]
    fn test_deferred_is_resolved() {
        let lazy = Value::deferred(|| Value::String("19".into()));
        assert_eq!(parse_int(&lazy), 19.0);
        assert_eq!(parse_float(&lazy), 19.0);
    }
}
