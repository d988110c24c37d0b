//! Symbol values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::JsString;

#[derive(Debug)]
struct SymbolData {
    description: Option<JsString>,
    private: bool,
}

/// A unique identity token.
///
/// Two symbols are equal only if they are the same allocation, regardless of
/// description. Private symbols name private class elements and are never
/// visible through property enumeration or proxy traps.
///
/// # Examples
///
/// ```
/// use core_types::Symbol;
///
/// let a = Symbol::new(Some("tag".into()));
/// let b = Symbol::new(Some("tag".into()));
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// assert!(!a.is_private());
/// ```
#[derive(Clone)]
pub struct Symbol(Rc<SymbolData>);

impl Symbol {
    /// Create a fresh public symbol
    pub fn new(description: Option<JsString>) -> Self {
        Symbol(Rc::new(SymbolData {
            description,
            private: false,
        }))
    }

    /// Create a fresh private name
    pub fn new_private(description: JsString) -> Self {
        Symbol(Rc::new(SymbolData {
            description: Some(description),
            private: true,
        }))
    }

    /// The `[[Description]]` of the symbol
    pub fn description(&self) -> Option<&JsString> {
        self.0.description.as_ref()
    }

    /// Whether this symbol is a private name
    pub fn is_private(&self) -> bool {
        self.0.private
    }

    /// `SymbolDescriptiveString`: `Symbol(desc)`
    pub fn descriptive_string(&self) -> String {
        match self.description() {
            Some(d) => format!("Symbol({})", d),
            None => "Symbol()".to_string(),
        }
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_private() {
            write!(f, "#{}", self.description().map(|d| d.to_string()).unwrap_or_default())
        } else {
            f.write_str(&self.descriptive_string())
        }
    }
}
