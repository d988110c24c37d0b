//! Normalized property keys.

use std::fmt;

use core_types::number::{
    canonical_numeric_index_string, number_to_js_string, parse_integer_index, MAX_ARRAY_INDEX,
};
use core_types::{JsString, Symbol, Value};

/// A property key: an integer index, any other string, or a symbol.
///
/// Keys are normalized on construction: a string that is the canonical
/// rendering of an integer in `0..=2^53-1` always becomes [`PropertyKey::Index`],
/// so `"5"` and `5` name the same property. Only `0..=2^32-2` are array
/// indices; larger integer indices enumerate with the string keys.
///
/// # Examples
///
/// ```
/// use object_model::PropertyKey;
///
/// assert_eq!(PropertyKey::from("5"), PropertyKey::Index(5));
/// assert!(matches!(PropertyKey::from("05"), PropertyKey::String(_)));
/// assert_eq!(PropertyKey::Index(4294967294).as_array_index(), Some(4294967294));
/// assert_eq!(PropertyKey::Index(4294967295).as_array_index(), None);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// Canonical integer index in `0..=2^53-1`
    Index(u64),
    /// Any string that is not a canonical integer index
    String(JsString),
    /// Symbol key
    Symbol(Symbol),
}

impl PropertyKey {
    /// Normalize a string into a key
    pub fn from_string(s: JsString) -> Self {
        match parse_integer_index(s.as_code_units()) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::String(s),
        }
    }

    /// The array index (`0..=2^32-2`) this key names, if any
    pub fn as_array_index(&self) -> Option<u32> {
        match self {
            PropertyKey::Index(i) => u32::try_from(*i).ok().filter(|i| *i <= MAX_ARRAY_INDEX),
            _ => None,
        }
    }

    /// The integer index this key names, if any
    pub fn as_integer_index(&self) -> Option<u64> {
        match self {
            PropertyKey::Index(i) => Some(*i),
            _ => None,
        }
    }

    /// `CanonicalNumericIndexString` applied to this key.
    ///
    /// Symbols never are numeric; integer indices always are; other strings
    /// are numeric when they are the canonical rendering of some number
    /// (`"-0"`, `"1.5"`, `"NaN"`, `"-1"` ...).
    pub fn canonical_numeric_index(&self) -> Option<f64> {
        match self {
            PropertyKey::Index(i) => Some(*i as f64),
            PropertyKey::String(s) => canonical_numeric_index_string(s),
            PropertyKey::Symbol(_) => None,
        }
    }

    /// Whether this is a symbol key
    pub fn is_symbol(&self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }

    /// Whether this key is the string `name`
    pub fn is_named(&self, name: &str) -> bool {
        match self {
            PropertyKey::String(s) => s.eq_str(name),
            _ => false,
        }
    }

    /// The string form of a non-symbol key
    pub fn to_js_string(&self) -> Option<JsString> {
        match self {
            PropertyKey::Index(i) => Some(number_to_js_string(*i as f64)),
            PropertyKey::String(s) => Some(s.clone()),
            PropertyKey::Symbol(_) => None,
        }
    }

    /// The key as a JavaScript value (integer indices become strings)
    pub fn to_value(&self) -> Value {
        match self {
            PropertyKey::Symbol(s) => Value::Symbol(s.clone()),
            other => Value::String(other.to_js_string().unwrap_or_else(JsString::empty)),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::from_string(JsString::from(s))
    }
}

impl From<JsString> for PropertyKey {
    fn from(s: JsString) -> Self {
        PropertyKey::from_string(s)
    }
}

impl From<u32> for PropertyKey {
    fn from(i: u32) -> Self {
        PropertyKey::Index(u64::from(i))
    }
}

impl From<u64> for PropertyKey {
    fn from(i: u64) -> Self {
        if i <= core_types::number::MAX_SAFE_INTEGER {
            PropertyKey::Index(i)
        } else {
            PropertyKey::String(number_to_js_string(i as f64))
        }
    }
}

impl From<Symbol> for PropertyKey {
    fn from(s: Symbol) -> Self {
        PropertyKey::Symbol(s)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Index(i) => write!(f, "{}", i),
            PropertyKey::String(s) => write!(f, "{}", s),
            PropertyKey::Symbol(s) => f.write_str(&s.descriptive_string()),
        }
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Index(i) => write!(f, "{}", i),
            PropertyKey::String(s) => write!(f, "{:?}", s),
            PropertyKey::Symbol(s) => write!(f, "{:?}", s),
        }
    }
}
