//! Unit tests for JsString and the number conversions that produce it

use core_types::number::{canonical_numeric_index_string, number_to_js_string};
use core_types::JsString;

#[test]
fn test_substring_clamps() {
    let s = JsString::from("abcdef");
    assert_eq!(s.substring(2, 4), JsString::from("cd"));
    assert_eq!(s.substring(4, 100), JsString::from("ef"));
    assert_eq!(s.substring(5, 2), JsString::empty());
}

#[test]
fn test_concat_and_eq_str() {
    let s = JsString::from("ab").concat(&JsString::from("cd"));
    assert!(s.eq_str("abcd"));
    assert!(!s.eq_str("abc"));
}

#[test]
fn test_number_rendering_is_canonical() {
    for s in ["0", "1", "-1", "1.5", "1e+21", "Infinity", "-Infinity", "NaN"] {
        let js = JsString::from(s);
        let n = canonical_numeric_index_string(&js);
        assert!(n.is_some(), "{s} should be canonical");
    }
    assert_eq!(number_to_js_string(0.1 + 0.2), JsString::from("0.30000000000000004"));
}

#[test]
fn test_non_canonical_strings() {
    for s in ["01", "1.0", "+1", " 1", "0x10", ""] {
        assert_eq!(canonical_numeric_index_string(&JsString::from(s)), None, "{s}");
    }
}
