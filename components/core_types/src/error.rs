//! JavaScript error types and error handling.
//!
//! The object model only ever originates TypeError and RangeError. A
//! ReferenceError can surface from an uninitialized module binding, and any
//! value thrown by a user callback travels unchanged as [`JsError::Thrown`].

use std::fmt;

use thiserror::Error;

use crate::Value;

/// The kind of JavaScript error.
///
/// These correspond to JavaScript's built-in error constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Type error (e.g., calling a non-function, proxy invariant violation)
    TypeError,
    /// Value out of allowed range (e.g., invalid array length)
    RangeError,
    /// Unresolvable identifier or uninitialized binding
    ReferenceError,
    /// An arbitrary value thrown by user code
    Thrown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::Thrown => "Thrown",
        };
        f.write_str(name)
    }
}

/// An abrupt completion: either an engine-originated error or a thrown value.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, JsError};
///
/// let error = JsError::range_error("Invalid array length");
/// assert_eq!(error.kind(), ErrorKind::RangeError);
/// assert_eq!(error.to_string(), "RangeError: Invalid array length");
/// ```
#[derive(Debug, Clone, Error)]
pub enum JsError {
    /// TypeError with its message
    #[error("TypeError: {0}")]
    TypeError(String),
    /// RangeError with its message
    #[error("RangeError: {0}")]
    RangeError(String),
    /// ReferenceError with its message
    #[error("ReferenceError: {0}")]
    ReferenceError(String),
    /// A value thrown by user code
    #[error("Uncaught {0:?}")]
    Thrown(Value),
}

impl JsError {
    /// Create a TypeError
    pub fn type_error(message: impl Into<String>) -> Self {
        JsError::TypeError(message.into())
    }

    /// Create a RangeError
    pub fn range_error(message: impl Into<String>) -> Self {
        JsError::RangeError(message.into())
    }

    /// Create a ReferenceError
    pub fn reference_error(message: impl Into<String>) -> Self {
        JsError::ReferenceError(message.into())
    }

    /// Wrap a thrown value
    pub fn thrown(value: Value) -> Self {
        JsError::Thrown(value)
    }

    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            JsError::TypeError(_) => ErrorKind::TypeError,
            JsError::RangeError(_) => ErrorKind::RangeError,
            JsError::ReferenceError(_) => ErrorKind::ReferenceError,
            JsError::Thrown(_) => ErrorKind::Thrown,
        }
    }

    /// The message of an engine-originated error, `None` for thrown values
    pub fn message(&self) -> Option<&str> {
        match self {
            JsError::TypeError(m) | JsError::RangeError(m) | JsError::ReferenceError(m) => Some(m),
            JsError::Thrown(_) => None,
        }
    }

    /// The thrown value, if this error carries one
    pub fn thrown_value(&self) -> Option<&Value> {
        match self {
            JsError::Thrown(v) => Some(v),
            _ => None,
        }
    }
}

/// Result type for JavaScript operations
pub type JsResult<T> = Result<T, JsError>;
