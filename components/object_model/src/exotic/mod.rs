//! Exotic object variants.
//!
//! Each module overrides only the internal methods its variant redefines and
//! delegates everything else to [`crate::ordinary`] on the same storage.

pub mod arguments;
pub mod array;
pub mod module_namespace;
pub mod string;
pub mod typed_array;
