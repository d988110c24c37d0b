//! Core JavaScript value types and error handling.
//!
//! This crate provides the foundational types shared by every component of
//! the object model: value representation, strings as UTF-16 code units,
//! symbols, error types, and the primitive number conversions.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of JavaScript values
//! - [`ObjectHandle`] - Non-owning handle into a realm's object heap
//! - [`JsString`] - Immutable sequence of UTF-16 code units
//! - [`Symbol`] - Unique identity token, optionally private
//! - [`JsError`] - JavaScript errors and thrown values
//! - [`ErrorKind`] - Types of JavaScript errors
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, JsError, Value};
//!
//! let num = Value::Number(42.0);
//! assert!(num.is_truthy());
//! assert_eq!(num.type_of(), "number");
//!
//! let error = JsError::type_error("undefined is not a function");
//! assert_eq!(error.kind(), ErrorKind::TypeError);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
pub mod number;
mod string;
mod symbol;
mod value;

pub use error::{ErrorKind, JsError, JsResult};
pub use string::JsString;
pub use symbol::Symbol;
pub use value::{ObjectHandle, Value};
