//! Numeric text formatting.
//!
//! Floats use C `%.{p}g` semantics: `p` significant digits, fixed
//! notation when the decimal exponent `x` satisfies `-4 <= x < p`,
//! exponential otherwise, trailing zeros removed. With no explicit
//! precision, [`FULL_PRECISION`] digits are written so every finite
//! `f64` reads back bit-exact. Special values are written as `Inf`,
//! `-Inf` and `NaN`.

use std::borrow::Cow;

use numerus_core::Scalar;

use crate::context::{Precision, FULL_PRECISION};

/// Format a float.
pub fn format_float(v: f64, precision: Precision) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v < 0.0 { "-Inf" } else { "Inf" }.to_string();
    }
    let p = precision
        .significant_digits()
        .unwrap_or(FULL_PRECISION)
        .max(1) as usize;

    let sci = format!("{:.*e}", p - 1, v);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let x: i32 = exp.parse().unwrap_or(0);
    if x < -4 || x >= p as i32 {
        let sign = if x < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", strip_zeros(mantissa), x.unsigned_abs())
    } else {
        let decimals = (p as i32 - 1 - x) as usize;
        strip_zeros(&format!("{v:.decimals$}")).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Format an integer. An explicit precision zero-pads the digits to at
/// least that many (at least one digit is always written).
pub fn format_int(v: i128, precision: Precision) -> String {
    match precision.significant_digits() {
        None => v.to_string(),
        Some(p) => {
            let width = p.max(1) as usize;
            let sign = if v < 0 { "-" } else { "" };
            format!("{sign}{:0width$}", v.unsigned_abs())
        }
    }
}

/// Format a widened element value.
pub fn format_scalar(v: Scalar, precision: Precision) -> String {
    match v {
        Scalar::Float(f) => format_float(f, precision),
        Scalar::Int(n) => format_int(n, precision),
    }
}

/// Rewrite legacy platform spellings of special values as canonical
/// tokens.
pub fn normalize_legacy_specials(text: &str) -> Cow<'_, str> {
    if !text.contains('#') {
        return Cow::Borrowed(text);
    }
    let mut s = text.replace("-1.#INF", "-Inf");
    s = s.replace("1.#INF", "Inf");
    for nan in ["-1.#QNAN", "1.#QNAN", "-1.#IND", "1.#IND"] {
        s = s.replace(nan, "NaN");
    }
    Cow::Owned(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(d: u8) -> Precision {
        Precision::Digits(d)
    }

    #[test]
    fn matches_printf_g() {
        assert_eq!(format_float(0.0, p(6)), "0");
        assert_eq!(format_float(-0.0, p(6)), "-0");
        assert_eq!(format_float(1.5, p(6)), "1.5");
        assert_eq!(format_float(100000.0, p(6)), "100000");
        assert_eq!(format_float(1000000.0, p(6)), "1e+06");
        assert_eq!(format_float(0.0001, p(6)), "0.0001");
        assert_eq!(format_float(0.00001234, p(6)), "1.234e-05");
        assert_eq!(format_float(3.14159265, p(3)), "3.14");
        assert_eq!(format_float(9.9999, p(2)), "10");
        assert_eq!(format_float(123.0, p(0)), "1e+02");
        assert_eq!(format_float(1e300, p(3)), "1e+300");
    }

    #[test]
    fn full_precision_digits() {
        assert_eq!(format_float(0.1, Precision::NotSet), "0.10000000000000000555");
        assert_eq!(format_float(2.0, Precision::NotSet), "2");
    }

    #[test]
    fn specials() {
        assert_eq!(format_float(f64::INFINITY, Precision::NotSet), "Inf");
        assert_eq!(format_float(f64::NEG_INFINITY, p(4)), "-Inf");
        assert_eq!(format_float(f64::NAN, Precision::NotSet), "NaN");
    }

    #[test]
    fn integers() {
        assert_eq!(format_int(-42, Precision::NotSet), "-42");
        assert_eq!(format_int(42, p(5)), "00042");
        assert_eq!(format_int(-42, p(5)), "-00042");
        assert_eq!(format_int(0, p(0)), "0");
        assert_eq!(format_int(u64::MAX as i128, Precision::NotSet), "18446744073709551615");
    }

    #[test]
    fn legacy_specials_normalised() {
        assert_eq!(
            normalize_legacy_specials("1 1.#INF -1.#INF 1.#QNAN -1.#IND"),
            "1 Inf -Inf NaN NaN"
        );
        assert!(matches!(normalize_legacy_specials("1 2"), Cow::Borrowed(_)));
    }

    proptest! {
        #[test]
        fn full_precision_is_lossless(bits in any::<u64>()) {
            let v = f64::from_bits(bits);
            prop_assume!(v.is_finite());
            let text = format_float(v, Precision::NotSet);
            let back: f64 = text.parse().unwrap();
            prop_assert_eq!(back.to_bits(), bits);
        }

        #[test]
        fn single_precision_is_lossless(bits in any::<u32>()) {
            let v = f32::from_bits(bits);
            prop_assume!(v.is_finite());
            let text = format_float(v as f64, Precision::NotSet);
            let back = text.parse::<f64>().unwrap() as f32;
            prop_assert_eq!(back.to_bits(), bits);
        }
    }
}
