//! Locale-independent decimal parsing and formatting.
//!
//! The parser works character by character over the raw span of a number
//! token, so it never consults the process locale and never allocates. The
//! formatters go through `ryu`/`itoa` for shortest-round-trip output.

use crate::error::Error;
use crate::Result;

/// Parse an ASCII decimal literal into an `f64`.
///
/// Accepts an optional leading `-`, an optional fractional part, and an
/// optional case-insensitive exponent with its own optional sign:
/// `14.452e23`, `14.452E-23`, `-1234.54321e+21`.
///
/// `base_offset` is the position of `span` inside the whole document and is
/// only used to report error offsets.
pub fn parse_double(span: &str, base_offset: usize) -> Result<f64> {
    let bytes = span.as_bytes();
    if bytes.is_empty() {
        return Err(Error::UnexpectedEnd {
            offset: base_offset,
        });
    }

    let mut start = 0usize;
    let mut len = bytes.len();
    let negative = bytes[0] == b'-';
    if negative {
        start += 1;
        len -= 1;
    }

    // Exponent suffix: parsed first so the working span can be truncated to
    // the mantissa before the digit walks below.
    let mut exponent = 0i32;
    for i in start..start + len {
        if bytes[i] == b'e' || bytes[i] == b'E' {
            let e_index = i;
            let mut digits_start = i + 1;
            let mut exp_negative = false;
            match bytes.get(i + 1) {
                Some(b'+') => digits_start += 1,
                Some(b'-') => {
                    exp_negative = true;
                    digits_start += 1;
                }
                _ => {}
            }

            let mut tens_slot = 1i32;
            for j in (digits_start..start + len).rev() {
                let b = bytes[j];
                if !b.is_ascii_digit() {
                    return Err(Error::MalformedNumber {
                        found: b as char,
                        offset: base_offset + j,
                    });
                }
                exponent += (b - b'0') as i32 * tens_slot;
                tens_slot *= 10;
            }
            if exp_negative {
                exponent = -exponent;
            }

            len = e_index - start;
            break;
        }
    }

    if len == 0 || !bytes[start].is_ascii_digit() {
        let (found, offset) = match bytes.get(start) {
            Some(&b) => (b as char, base_offset + start),
            None => {
                return Err(Error::UnexpectedEnd {
                    offset: base_offset + start,
                })
            }
        };
        return Err(Error::MalformedNumber { found, offset });
    }

    let mut decimal_point = start + len;
    for (i, &b) in bytes.iter().enumerate().take(start + len).skip(start) {
        if b == b'.' {
            decimal_point = i;
            break;
        }
    }

    let mut value = 0f64;

    // Integer part, right to left with ascending powers of ten.
    let mut tens_slot = 1f64;
    for i in (start..decimal_point).rev() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return Err(Error::MalformedNumber {
                found: b as char,
                offset: base_offset + i,
            });
        }
        value += tens_slot * (b - b'0') as f64;
        tens_slot *= 10.0;
    }

    // Fractional part, left to right with descending powers of ten.
    let mut tens_slot = 0.1f64;
    for i in decimal_point + 1..start + len {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return Err(Error::MalformedNumber {
                found: b as char,
                offset: base_offset + i,
            });
        }
        value += tens_slot * (b - b'0') as f64;
        tens_slot /= 10.0;
    }

    value *= 10f64.powi(exponent);
    if negative {
        value = -value;
    }
    Ok(value)
}

/// Parse an integer literal exactly, preserving all 64 signed bits.
///
/// Spans carrying a fraction or an exponent, and spans whose magnitude
/// overflows an `i64`, fall back to [`parse_double`] and truncate.
pub fn parse_long(span: &str, base_offset: usize) -> Result<i64> {
    let bytes = span.as_bytes();
    if bytes.is_empty() {
        return Err(Error::UnexpectedEnd {
            offset: base_offset,
        });
    }

    let negative = bytes[0] == b'-';
    let start = usize::from(negative);
    if has_float_syntax(bytes) {
        return Ok(parse_double(span, base_offset)? as i64);
    }
    if bytes.len() == start || !bytes[start].is_ascii_digit() {
        return Err(Error::MalformedNumber {
            found: bytes[start.min(bytes.len() - 1)] as char,
            offset: base_offset + start,
        });
    }

    let mut value = 0i64;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if !b.is_ascii_digit() {
            return Err(Error::MalformedNumber {
                found: b as char,
                offset: base_offset + i,
            });
        }
        let digit = (b - b'0') as i64;
        value = match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
            Some(v) => v,
            None => return Ok(parse_double(span, base_offset)? as i64),
        };
    }
    Ok(if negative { -value } else { value })
}

/// Unsigned variant of [`parse_long`], covering the span above `i64::MAX`.
pub fn parse_unsigned(span: &str, base_offset: usize) -> Result<u64> {
    let bytes = span.as_bytes();
    if bytes.is_empty() {
        return Err(Error::UnexpectedEnd {
            offset: base_offset,
        });
    }
    if bytes[0] == b'-' || has_float_syntax(bytes) {
        return Ok(parse_double(span, base_offset)? as u64);
    }
    if !bytes[0].is_ascii_digit() {
        return Err(Error::MalformedNumber {
            found: bytes[0] as char,
            offset: base_offset,
        });
    }

    let mut value = 0u64;
    for (i, &b) in bytes.iter().enumerate() {
        if !b.is_ascii_digit() {
            return Err(Error::MalformedNumber {
                found: b as char,
                offset: base_offset + i,
            });
        }
        let digit = (b - b'0') as u64;
        value = match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
            Some(v) => v,
            None => return Ok(parse_double(span, base_offset)? as u64),
        };
    }
    Ok(value)
}

fn has_float_syntax(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .any(|&b| b == b'.' || b == b'e' || b == b'E' || b == b'+')
}

/// Format an `f64` in the shortest form that round-trips, with integer-valued
/// floats emitted without a fractional part. Non-finite floats emit `0`,
/// which the grammar has no spelling for otherwise.
pub fn write_double_into(f: f64, out: &mut String) {
    if !f.is_finite() {
        out.push('0');
        return;
    }
    if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 {
        write_long_into(f as i64, out);
        return;
    }

    let mut buf = ryu::Buffer::new();
    out.push_str(buf.format(f));
}

pub fn write_long_into(value: i64, out: &mut String) {
    let mut buf = itoa::Buffer::new();
    out.push_str(buf.format(value));
}

pub fn write_unsigned_into(value: u64, out: &mut String) {
    let mut buf = itoa::Buffer::new();
    out.push_str(buf.format(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_against_std(literal: &str) {
        let actual = parse_double(literal, 0).unwrap();
        let expected: f64 = literal.parse().unwrap();
        assert!(
            (actual - expected).abs() < 0.01,
            "{literal}: {actual} does not match {expected}"
        );
    }

    #[rstest::rstest]
    fn test_plain_decimals() {
        check_against_std("1234.54321");
        check_against_std("-1234.54321");
        check_against_std("0.00000123");
        check_against_std("142.010");
        check_against_std("142");
    }

    #[rstest::rstest]
    fn test_exponent_forms() {
        check_against_std("1234.54321e21");
        check_against_std("1234.54321e+21");
        check_against_std("1234.54321e-21");
        check_against_std("-1234.54321e21");
        check_against_std("-1234.54321e+21");
        check_against_std("-1234.54321e-21");
        check_against_std("14.452E-23");
        check_against_std("14.452E+23");
        check_against_std("14.452E23");
        check_against_std("14.452e23");
    }

    #[rstest::rstest]
    fn test_leading_non_digit_is_rejected() {
        let err = parse_double(".5", 10).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedNumber {
                found: '.',
                offset: 10
            }
        );

        let err = parse_double("-.5", 0).unwrap_err();
        assert!(matches!(err, Error::MalformedNumber { found: '.', .. }));
    }

    #[rstest::rstest]
    fn test_interior_garbage_is_rejected() {
        let err = parse_double("1.2.3", 0).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedNumber {
                found: '.',
                offset: 3
            }
        );

        let err = parse_double("1-2", 0).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedNumber {
                found: '-',
                offset: 1
            }
        );

        let err = parse_double("1e2.5", 0).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedNumber {
                found: '.',
                offset: 3
            }
        );

        let err = parse_long("1-2", 0).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedNumber {
                found: '-',
                offset: 1
            }
        );

        // The base offset shifts reported positions into document space.
        let err = parse_unsigned("1.2.3", 5).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedNumber {
                found: '.',
                offset: 8
            }
        );
    }

    #[rstest::rstest]
    fn test_parse_long_is_exact() {
        assert_eq!(parse_long("9007199254740993", 0).unwrap(), 9007199254740993);
        assert_eq!(
            parse_long("-9223372036854775807", 0).unwrap(),
            -9223372036854775807
        );
        assert_eq!(parse_long("0", 0).unwrap(), 0);
    }

    #[rstest::rstest]
    fn test_parse_long_falls_back_on_float_syntax() {
        assert_eq!(parse_long("1.5", 0).unwrap(), 1);
        assert_eq!(parse_long("1e3", 0).unwrap(), 1000);
    }

    #[rstest::rstest]
    fn test_parse_unsigned_above_i64_max() {
        assert_eq!(
            parse_unsigned("18446744073709551615", 0).unwrap(),
            u64::MAX
        );
    }

    #[rstest::rstest]
    fn test_write_double() {
        let mut out = String::new();
        write_double_into(142.5, &mut out);
        assert_eq!(out, "142.5");

        let mut out = String::new();
        write_double_into(142.0, &mut out);
        assert_eq!(out, "142");

        let mut out = String::new();
        write_double_into(-3.0, &mut out);
        assert_eq!(out, "-3");

        let mut out = String::new();
        write_double_into(f64::NAN, &mut out);
        assert_eq!(out, "0");
    }
}
