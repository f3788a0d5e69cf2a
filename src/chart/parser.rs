//! Locale value parsing
//!
//! Values arrive formatted with a comma decimal separator ("21,5"), possibly followed
//! by a unit ("12,5 °C"). Only the leading number is read.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value {raw:?} is not a valid number")]
pub struct ValueError {
    pub raw: String,
}

/// Parses the leading comma-decimal number of a string into a finite number.
///
/// Trailing text is ignored. Input without a leading number, and values that
/// overflow to infinity, are rejected.
pub fn parse_value(raw: &str) -> Result<f64, ValueError> {
    let normalized = raw.trim_start().replacen(',', ".", 1);
    match numeric_prefix(&normalized).parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValueError {
            raw: raw.to_string(),
        }),
    }
}

/// Longest prefix of `s` shaped like a decimal float: sign, digits, fraction, exponent.
///
/// Returns an empty string when `s` does not start with a number.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+') | Some(b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        // An exponent marker without digits is trailing text
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_is_decimal_separator() {
        for (raw, expected) in [
            ("1,0", 1.0),
            ("2,5", 2.5),
            ("-0,125", -0.125),
            (" 42 ", 42.0),
            ("3.7", 3.7),
            ("1000,75", 1000.75),
            (",5", 0.5),
            ("1,5e2", 150.0),
        ] {
            assert_eq!(parse_value(raw), Ok(expected), "parsing {raw:?}");
        }
    }

    #[test]
    fn test_matches_period_substitution() {
        for raw in ["0,1", "12,34", "99,999", "-7,5", "5"] {
            let expected: f64 = raw.replace(',', ".").parse().unwrap();
            assert_eq!(parse_value(raw).unwrap(), expected);
        }
    }

    #[test]
    fn test_reads_leading_number_before_unit() {
        for (raw, expected) in [
            ("12,5 °C", 12.5),
            ("7,25kg", 7.25),
            ("12 kg", 12.0),
            ("1,2,3", 1.2),
            ("4e", 4.0),
            ("3,0e+x", 3.0),
        ] {
            assert_eq!(parse_value(raw), Ok(expected), "parsing {raw:?}");
        }
    }

    #[test]
    fn test_rejects_non_numeric() {
        for raw in ["", "abc", "NaN", "inf", "Infinity", ",", "-", "kg 12", "1e999"] {
            assert_eq!(
                parse_value(raw),
                Err(ValueError {
                    raw: raw.to_string()
                }),
                "accepted {raw:?}"
            );
        }
    }
}
