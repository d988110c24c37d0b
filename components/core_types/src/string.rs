//! JavaScript string representation.
//!
//! JavaScript strings are sequences of UTF-16 code units. Lone surrogates are
//! representable, so the storage is `[u16]` rather than a Rust `str`.

use std::fmt;
use std::rc::Rc;

/// An immutable, cheaply clonable sequence of UTF-16 code units.
///
/// Equality, hashing and ordering compare code units, which is the order
/// JavaScript uses for sorting module export names.
///
/// # Examples
///
/// ```
/// use core_types::JsString;
///
/// let s = JsString::from("héllo");
/// assert_eq!(s.len(), 5);
/// assert_eq!(s.code_unit_at(1), Some(0xE9));
/// assert_eq!(s.to_string(), "héllo");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsString(Rc<[u16]>);

impl JsString {
    /// Build a string from raw code units
    pub fn from_code_units(units: Vec<u16>) -> Self {
        JsString(units.into())
    }

    /// The empty string
    pub fn empty() -> Self {
        JsString(Rc::from(Vec::new()))
    }

    /// Number of UTF-16 code units
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the string has no code units
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Code unit at `index`, if in range
    pub fn code_unit_at(&self, index: usize) -> Option<u16> {
        self.0.get(index).copied()
    }

    /// The raw code units
    pub fn as_code_units(&self) -> &[u16] {
        &self.0
    }

    /// Single code unit string at `index`, if in range
    pub fn char_at(&self, index: usize) -> Option<JsString> {
        self.code_unit_at(index)
            .map(|unit| JsString::from_code_units(vec![unit]))
    }

    /// Substring over the code unit range `[start, end)`, clamped to bounds
    pub fn substring(&self, start: usize, end: usize) -> JsString {
        let end = end.min(self.len());
        let start = start.min(end);
        JsString::from_code_units(self.0.get(start..end).map(<[u16]>::to_vec).unwrap_or_default())
    }

    /// Concatenate two strings
    pub fn concat(&self, other: &JsString) -> JsString {
        let mut units = Vec::with_capacity(self.len() + other.len());
        units.extend_from_slice(&self.0);
        units.extend_from_slice(&other.0);
        JsString::from_code_units(units)
    }

    /// Index of the first occurrence of `needle` at or after `from`
    pub fn index_of(&self, needle: &JsString, from: usize) -> Option<usize> {
        let haystack = self.as_code_units();
        let needle = needle.as_code_units();
        if needle.is_empty() {
            return (from <= haystack.len()).then_some(from);
        }
        if needle.len() > haystack.len() {
            return None;
        }
        (from..=haystack.len() - needle.len())
            .find(|&i| haystack.get(i..i + needle.len()) == Some(needle))
    }

    /// Lossy conversion to a Rust string (lone surrogates become U+FFFD)
    pub fn to_std_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }

    /// Whether the string equals the given ASCII/UTF-8 literal
    pub fn eq_str(&self, other: &str) -> bool {
        self.0.iter().copied().eq(other.encode_utf16())
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString(s.encode_utf16().collect::<Vec<_>>().into())
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString::from(s.as_str())
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_std_string_lossy())
    }
}

impl fmt::Debug for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_std_string_lossy())
    }
}
