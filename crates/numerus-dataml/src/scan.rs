//! Numeric text scanning.
//!
//! Tokens are runs of non-whitespace separated by runs of ASCII
//! whitespace. A token is `[+-]?` followed by `Inf`, `NaN`, or a decimal
//! with at least one digit, an optional fraction and an optional
//! exponent. Pure integer tokens are kept exact so wide integer kinds
//! do not lose precision through a float.

use numerus_core::Element;

use crate::error::DataMlError;

/// A scanned numeric token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// An integer literal that fits `i128`.
    Int(i128),
    /// Any other number, including `Inf` and `NaN`.
    Float(f64),
}

/// Parse one token. `None` if the token is malformed.
pub fn parse_number(token: &str) -> Option<Number> {
    let bytes = token.as_bytes();
    let (negative, body) = match bytes.first()? {
        b'-' => (true, &token[1..]),
        b'+' => (false, &token[1..]),
        _ => (false, token),
    };
    match body {
        "Inf" => {
            return Some(Number::Float(if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }))
        }
        "NaN" => return Some(Number::Float(f64::NAN)),
        _ => {}
    }

    let b = body.as_bytes();
    let mut i = 0;
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    let mut integral = true;
    if i < b.len() && b[i] == b'.' {
        integral = false;
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return None;
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        integral = false;
        i += 1;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }
    if i != b.len() {
        return None;
    }

    if integral {
        if let Ok(n) = token.parse::<i128>() {
            return Some(Number::Int(n));
        }
    }
    token.parse::<f64>().ok().map(Number::Float)
}

/// Cursor over whitespace-separated tokens.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    /// Start scanning `text`.
    pub fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    /// The next token, if any.
    pub fn next_token(&mut self) -> Option<&'a str> {
        let t = self.rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if t.is_empty() {
            self.rest = t;
            return None;
        }
        let end = t
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(t.len());
        let (token, rest) = t.split_at(end);
        self.rest = rest;
        Some(token)
    }

    /// Unscanned text with surrounding whitespace removed.
    pub fn remaining(&self) -> &'a str {
        self.rest.trim_matches(|c: char| c.is_ascii_whitespace())
    }
}

/// Fill `out` with `T` values scanned from `scanner`.
///
/// `index` is the element number of the first value, and `expected`
/// the total the caller will read; both only feed error messages.
pub(crate) fn fill<T: Element>(
    scanner: &mut Scanner<'_>,
    out: &mut [u8],
    node: &str,
    index: usize,
    expected: usize,
) -> Result<(), DataMlError> {
    for (i, chunk) in out.chunks_exact_mut(T::WIDTH).enumerate() {
        let token = scanner.next_token().ok_or_else(|| DataMlError::TooFewValues {
            node: node.to_string(),
            expected,
            found: index + i,
        })?;
        let value = match parse_number(token) {
            Some(Number::Int(n)) => T::from_i128(n),
            Some(Number::Float(v)) => T::from_f64(v),
            None => {
                return Err(DataMlError::MalformedToken {
                    node: node.to_string(),
                    token: token.to_string(),
                    index: index + i,
                })
            }
        };
        value.write_ne(chunk);
    }
    Ok(())
}

/// Fail if anything other than whitespace is left.
pub(crate) fn finish(scanner: &Scanner<'_>, node: &str) -> Result<(), DataMlError> {
    let rest = scanner.remaining();
    if rest.is_empty() {
        return Ok(());
    }
    let context: String = rest.chars().take(32).collect();
    Err(DataMlError::TrailingContent {
        node: node.to_string(),
        context,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_forms() {
        assert_eq!(parse_number("42"), Some(Number::Int(42)));
        assert_eq!(parse_number("-7"), Some(Number::Int(-7)));
        assert_eq!(parse_number("+3"), Some(Number::Int(3)));
        assert_eq!(parse_number("1.5"), Some(Number::Float(1.5)));
        assert_eq!(parse_number(".5"), Some(Number::Float(0.5)));
        assert_eq!(parse_number("5."), Some(Number::Float(5.0)));
        assert_eq!(parse_number("1e3"), Some(Number::Float(1000.0)));
        assert_eq!(parse_number("-2.5E-1"), Some(Number::Float(-0.25)));
        assert_eq!(parse_number("-Inf"), Some(Number::Float(f64::NEG_INFINITY)));
        assert!(matches!(parse_number("NaN"), Some(Number::Float(v)) if v.is_nan()));
        assert_eq!(
            parse_number("18446744073709551615"),
            Some(Number::Int(u64::MAX as i128))
        );
    }

    #[test]
    fn rejected_forms() {
        for bad in ["-", "+", ".", "1e", "1e+", "1.2.3", "abc", "1x", "--1", "inf", "0x10", ""] {
            assert_eq!(parse_number(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn scanner_splits_whitespace_runs() {
        let mut s = Scanner::new("  1\t2\n\n 3  ");
        assert_eq!(s.next_token(), Some("1"));
        assert_eq!(s.next_token(), Some("2"));
        assert_eq!(s.next_token(), Some("3"));
        assert_eq!(s.next_token(), None);
        assert_eq!(s.remaining(), "");
    }

    #[test]
    fn fill_reports_token_and_trailing() {
        let mut out = [0u8; 16];
        let mut s = Scanner::new("1 2 3");
        fill::<f64>(&mut s, &mut out, "n", 0, 2).unwrap();
        let e = finish(&s, "n").unwrap_err();
        assert!(e.to_string().contains("\"3\""), "{e}");

        let mut s = Scanner::new("1 q");
        let e = fill::<i64>(&mut s, &mut out, "n", 0, 2).unwrap_err();
        assert!(matches!(e, DataMlError::MalformedToken { index: 1, .. }));

        let mut s = Scanner::new("1");
        let e = fill::<i64>(&mut s, &mut out, "n", 0, 2).unwrap_err();
        assert!(matches!(e, DataMlError::TooFewValues { found: 1, .. }));
    }
}
