//! Primitive number conversions.
//!
//! These are the pure, object-free halves of the ECMAScript conversion
//! operations. The realm-aware versions (which may call `valueOf` or
//! `Symbol.toPrimitive`) are built on top of these in `object_model`.

use num_traits::ToPrimitive;

use crate::JsString;

/// 2^53 - 1, the largest integer index
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// 2^32 - 2, the largest array index
pub const MAX_ARRAY_INDEX: u32 = u32::MAX - 1;

/// `Number::sameValue`
pub fn same_value(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    a == b && a.is_sign_negative() == b.is_sign_negative()
}

/// `Number::toString(x, 10)`
///
/// # Examples
///
/// ```
/// use core_types::number::number_to_string;
///
/// assert_eq!(number_to_string(1.0), "1");
/// assert_eq!(number_to_string(-0.0), "0");
/// assert_eq!(number_to_string(1.5), "1.5");
/// assert_eq!(number_to_string(1e21), "1e+21");
/// assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
/// ```
pub fn number_to_string(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let mut buffer = ryu_js::Buffer::new();
    buffer.format(x).to_string()
}

/// `Number::toString` producing a [`JsString`]
pub fn number_to_js_string(x: f64) -> JsString {
    JsString::from(number_to_string(x))
}

fn is_js_whitespace(unit: u16) -> bool {
    matches!(
        unit,
        0x0009 | 0x000A | 0x000B | 0x000C | 0x000D | 0x0020 | 0x00A0 | 0x1680
            | 0x2000..=0x200A
            | 0x2028 | 0x2029 | 0x202F | 0x205F | 0x3000 | 0xFEFF
    )
}

fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut digits = i - int_start;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }
    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let exp_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut acc = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => acc = acc * f64::from(radix) + f64::from(d),
            None => return f64::NAN,
        }
    }
    acc
}

/// `StringToNumber(str)`
///
/// # Examples
///
/// ```
/// use core_types::number::string_to_number;
/// use core_types::JsString;
///
/// assert_eq!(string_to_number(&JsString::from("  42 ")), 42.0);
/// assert_eq!(string_to_number(&JsString::from("")), 0.0);
/// assert_eq!(string_to_number(&JsString::from("0x1F")), 31.0);
/// assert!(string_to_number(&JsString::from("1_000")).is_nan());
/// assert!(string_to_number(&JsString::from("inf")).is_nan());
/// ```
pub fn string_to_number(s: &JsString) -> f64 {
    let units = s.as_code_units();
    let start = units.iter().position(|&u| !is_js_whitespace(u));
    let Some(start) = start else {
        return 0.0;
    };
    let end = units
        .iter()
        .rposition(|&u| !is_js_whitespace(u))
        .map_or(start, |e| e + 1);
    let Some(trimmed) = units.get(start..end) else {
        return f64::NAN;
    };
    let Ok(text) = String::from_utf16(trimmed) else {
        return f64::NAN;
    };
    match text.as_str() {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let lower_prefix = text.get(..2).map(str::to_ascii_lowercase);
    match lower_prefix.as_deref() {
        Some("0x") => return parse_radix(text.get(2..).unwrap_or(""), 16),
        Some("0o") => return parse_radix(text.get(2..).unwrap_or(""), 8),
        Some("0b") => return parse_radix(text.get(2..).unwrap_or(""), 2),
        _ => {}
    }
    if !is_decimal_literal(&text) {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

/// `ToIntegerOrInfinity` on an already-numeric value
pub fn to_integer_or_infinity(n: f64) -> f64 {
    if n.is_nan() || n == 0.0 {
        return 0.0;
    }
    if n.is_infinite() {
        return n;
    }
    n.trunc()
}

/// `ToUint32` on an already-numeric value
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() || n == 0.0 {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0).to_u32().unwrap_or(0)
}

/// `ToInt32` on an already-numeric value
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// `ToLength` on an already-numeric value
pub fn to_length(n: f64) -> u64 {
    let len = to_integer_or_infinity(n);
    if len <= 0.0 {
        return 0;
    }
    len.min(MAX_SAFE_INTEGER as f64).to_u64().unwrap_or(MAX_SAFE_INTEGER)
}

/// Whether `n` is an integral number (`IsIntegralNumber`)
pub fn is_integral(n: f64) -> bool {
    n.is_finite() && n.trunc() == n
}

/// Interpret a number as an integer index (0 ..= 2^53-1), if it is one.
/// `-0` is not an integer index.
pub fn number_to_integer_index(n: f64) -> Option<u64> {
    if !is_integral(n) || n < 0.0 || (n == 0.0 && n.is_sign_negative()) {
        return None;
    }
    n.to_u64().filter(|&i| i <= MAX_SAFE_INTEGER)
}

/// Parse a canonical integer-index string (`"0"`, `"17"`; never `"017"` or `"-1"`).
pub fn parse_integer_index(units: &[u16]) -> Option<u64> {
    let (&first, rest) = units.split_first()?;
    if first == u16::from(b'0') {
        return rest.is_empty().then_some(0);
    }
    if units.len() > 16 {
        return None;
    }
    let mut acc: u64 = 0;
    for &u in units {
        let digit = u.checked_sub(u16::from(b'0')).filter(|d| *d <= 9)?;
        acc = acc * 10 + u64::from(digit);
    }
    (acc <= MAX_SAFE_INTEGER).then_some(acc)
}

/// `CanonicalNumericIndexString(argument)`
///
/// Returns the numeric value when the string is the canonical rendering of
/// a number (including `"-0"`, `"NaN"`, `"Infinity"`, `"1.5"`).
///
/// # Examples
///
/// ```
/// use core_types::number::canonical_numeric_index_string;
/// use core_types::JsString;
///
/// assert_eq!(canonical_numeric_index_string(&JsString::from("1.5")), Some(1.5));
/// assert!(canonical_numeric_index_string(&JsString::from("-0")).is_some());
/// assert_eq!(canonical_numeric_index_string(&JsString::from("01")), None);
/// assert_eq!(canonical_numeric_index_string(&JsString::from("foo")), None);
/// ```
pub fn canonical_numeric_index_string(s: &JsString) -> Option<f64> {
    if s.eq_str("-0") {
        return Some(-0.0);
    }
    let n = string_to_number(s);
    s.eq_str(&number_to_string(n)).then_some(n)
}
